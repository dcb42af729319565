use serde::{Deserialize, Serialize};

/// Status of a best-effort side call made after the primary operation
/// committed. A failure here never fails the primary operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum SideEffect {
    Recorded,
    Failed(String),
}

impl SideEffect {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded)
    }
}
