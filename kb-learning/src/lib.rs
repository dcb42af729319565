//! # kb-learning
//!
//! How the corpus changes over time: feedback adjusts trust in stored
//! answers, and new answers are recorded with deduplication against
//! existing questions.

pub mod feedback;
pub mod recorder;

pub use feedback::{mutation_for, FeedbackAdapter, FeedbackOutcome};
pub use recorder::{DialogRecorder, RecordOutcome};
