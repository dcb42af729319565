//! # kb-observability
//!
//! Subscriber installation, span macros for each engine operation, structured
//! events, and a tracker for degraded-mode episodes.

pub mod degradation;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use tracing_setup::init_tracing;
