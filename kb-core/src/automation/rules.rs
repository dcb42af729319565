use serde::{Deserialize, Serialize};

use crate::models::Rating;

/// Outcome produced by the engine that rules can react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    AutoAnswered { dialog_id: String, similarity: f64 },
    SuggestedToAgent { dialog_id: String, similarity: f64 },
    Escalated { reason: String },
    KeywordFallback { solution_count: usize },
    FeedbackReceived { dialog_id: String, rating: Rating, requires_review: bool },
}

/// The closed set of trigger kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// An answer was sent automatically, optionally only above a similarity.
    AutoAnswered {
        #[serde(default)]
        min_similarity: Option<f64>,
    },
    SuggestedToAgent,
    Escalated,
    /// Embedding search was unavailable and keyword scoring was used.
    KeywordFallback,
    /// Feedback of the given rating arrived.
    Feedback { rating: Rating },
    /// Feedback left the dialog flagged for human review.
    ReviewRequired,
}

impl Trigger {
    pub fn matches(&self, event: &EngineEvent) -> bool {
        match (self, event) {
            (Self::AutoAnswered { min_similarity }, EngineEvent::AutoAnswered { similarity, .. }) => {
                min_similarity.map_or(true, |min| *similarity >= min)
            }
            (Self::SuggestedToAgent, EngineEvent::SuggestedToAgent { .. }) => true,
            (Self::Escalated, EngineEvent::Escalated { .. }) => true,
            (Self::KeywordFallback, EngineEvent::KeywordFallback { .. }) => true,
            (Self::Feedback { rating }, EngineEvent::FeedbackReceived { rating: got, .. }) => {
                rating == got
            }
            (Self::ReviewRequired, EngineEvent::FeedbackReceived { requires_review, .. }) => {
                *requires_review
            }
            _ => false,
        }
    }
}

/// The closed set of action kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Send a notification rendered from `template`.
    Notify { channel: String, template: String },
    AssignToAgent { agent_id: String },
    SetPriority { priority: String },
    AddTag { tag: String },
}

/// A named trigger → actions rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    pub name: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    pub trigger: Trigger,
    pub actions: Vec<Action>,
}

fn enabled_default() -> bool {
    true
}

impl AutomationRule {
    /// Actions of every enabled rule whose trigger matches, in rule order.
    pub fn evaluate<'a>(rules: &'a [AutomationRule], event: &EngineEvent) -> Vec<(&'a str, &'a Action)> {
        rules
            .iter()
            .filter(|r| r.enabled && r.trigger.matches(event))
            .flat_map(|r| r.actions.iter().map(move |a| (r.name.as_str(), a)))
            .collect()
    }
}
