mod confidence;
mod degradation_event;
mod dialog;
mod feedback;
mod side_effect;
mod solution;

pub use confidence::Confidence;
pub use degradation_event::DegradationEvent;
pub use dialog::{AnswerType, Dialog, DialogMutation, NewDialog, ResolvedCase};
pub use feedback::{DailyFeedbackStat, Feedback, Rating};
pub use side_effect::SideEffect;
pub use solution::{Solution, UsageVote};
