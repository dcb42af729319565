//! # kb-core
//!
//! Foundation crate for the helpdesk knowledge engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod automation;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod text;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::KbConfig;
pub use errors::{KbError, KbResult};
pub use models::{AnswerType, Confidence, Dialog, Feedback, Rating, Solution, UsageVote};
