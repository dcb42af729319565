//! Request and result types of the service surface.

use serde::Serialize;

use kb_core::automation::Action;
use kb_core::models::SideEffect;
use kb_retrieval::AutoAnswerDecision;
use kb_solutions::ScoredSolution;

/// Per-call overrides of the configured search defaults.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub limit: Option<usize>,
    pub min_similarity: Option<f64>,
    pub category: Option<String>,
    pub helpful_only: Option<bool>,
}

/// What the caller knows about the conversation a question came from.
#[derive(Debug, Clone, Default)]
pub struct AnswerContext {
    pub category: Option<String>,
    pub company: Option<String>,
    pub lead: Option<String>,
}

impl AnswerContext {
    pub fn with_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerRoute {
    /// Send `decision.answer` to the client.
    AutoAnswer,
    /// Show `decision.answer` to an agent for confirmation.
    SuggestToAgent,
    /// No trusted match; `solutions` may still help the agent.
    Escalate,
    /// Embeddings were unavailable; `solutions` came from keyword scoring.
    KeywordFallback,
}

/// An automation action selected for this outcome.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedAction {
    pub rule: String,
    pub action: Action,
    /// Rendered text of a `Notify` action.
    pub message: Option<String>,
    /// `Failed` when the notification template could not be rendered.
    pub status: SideEffect,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerPlan {
    pub route: AnswerRoute,
    /// Absent on the keyword fallback route.
    pub decision: Option<AutoAnswerDecision>,
    pub solutions: Vec<ScoredSolution>,
    pub actions: Vec<PlannedAction>,
}

impl AnswerPlan {
    pub fn answer(&self) -> Option<&str> {
        self.decision.as_ref().and_then(|d| d.answer.as_deref())
    }

    pub fn is_degraded(&self) -> bool {
        self.route == AnswerRoute::KeywordFallback
    }
}
