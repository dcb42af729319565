//! # kb-retrieval
//!
//! Nearest-dialog search with a similarity threshold, and the gate that
//! decides whether the best match may be sent without a human.

pub mod gate;
pub mod search;

pub use gate::{AutoAnswerDecision, ConfidenceGate, GateOutcome};
pub use search::{percent, RankedDialog, SearchOptions, SimilaritySearch};
