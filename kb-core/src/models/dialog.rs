use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::confidence::Confidence;
use crate::text;

/// Who produced the stored answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    Manual,
    Automatic,
}

impl AnswerType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Automatic => "automatic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(Self::Manual),
            "automatic" => Some(Self::Automatic),
            _ => None,
        }
    }
}

/// A stored question/answer unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dialog {
    /// UUID v4 identifier.
    pub id: String,
    pub question_text: String,
    /// `None` when embedding failed at write time; such dialogs are never searchable.
    pub question_embedding: Option<Vec<f32>>,
    pub question_category: Option<String>,
    /// blake3 hash of the normalized question text.
    pub question_hash: String,
    pub answer_text: String,
    pub answered_by: String,
    pub answer_type: AnswerType,
    /// Tri-state: unknown, helpful, not helpful.
    pub was_helpful: Option<bool>,
    pub confidence_score: Confidence,
    /// Times this dialog was surfaced as an answer.
    pub used_count: u64,
    pub requires_human_review: bool,
    pub version: u32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    /// Canonical dialog this one was merged into.
    pub is_duplicate_of: Option<String>,
    /// Case this dialog was synthesized from, if any.
    pub source_case_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Dialog {
    /// Build a fresh dialog with default quality metadata.
    pub fn from_new(new: &NewDialog, embedding: Option<Vec<f32>>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            question_text: new.question_text.clone(),
            question_embedding: embedding,
            question_category: new.category.clone(),
            question_hash: text::question_hash(&new.question_text),
            answer_text: new.answer_text.clone(),
            answered_by: new.answered_by.clone(),
            answer_type: new.answer_type,
            was_helpful: None,
            confidence_score: Confidence::default(),
            used_count: 0,
            requires_human_review: false,
            version: 1,
            is_active: true,
            expires_at: new.expires_at,
            is_duplicate_of: None,
            source_case_id: new.source_case_id.clone(),
            created_at: now,
            updated_at: now,
            last_used_at: None,
        }
    }

    /// Whether similarity search may return this dialog at `now`.
    pub fn is_searchable(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.is_duplicate_of.is_none()
            && self.question_embedding.is_some()
            && self.expires_at.map_or(true, |t| t > now)
    }
}

/// Input for recording an answered question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDialog {
    pub question_text: String,
    pub answer_text: String,
    pub answered_by: String,
    pub answer_type: AnswerType,
    pub category: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub source_case_id: Option<String>,
}

impl NewDialog {
    /// A dialog answered by a human operator.
    pub fn manual(
        question: impl Into<String>,
        answer: impl Into<String>,
        answered_by: impl Into<String>,
    ) -> Self {
        Self {
            question_text: question.into(),
            answer_text: answer.into(),
            answered_by: answered_by.into(),
            answer_type: AnswerType::Manual,
            category: None,
            expires_at: None,
            source_case_id: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A resolved support case handed over by the case-management layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedCase {
    pub case_id: String,
    pub problem_text: String,
    pub resolution_text: String,
    pub resolved_by: String,
    pub category: Option<String>,
}

impl From<&ResolvedCase> for NewDialog {
    fn from(case: &ResolvedCase) -> Self {
        Self {
            question_text: case.problem_text.clone(),
            answer_text: case.resolution_text.clone(),
            answered_by: case.resolved_by.clone(),
            answer_type: AnswerType::Automatic,
            category: case.category.clone(),
            expires_at: None,
            source_case_id: Some(case.case_id.clone()),
        }
    }
}

/// A single atomic change to a dialog's quality metadata.
///
/// Storage applies it as one read-modify-write statement, so concurrent
/// mutations compose instead of overwriting each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogMutation {
    /// Signed adjustment; the result is clamped to [0, 1].
    pub confidence_delta: f64,
    /// `Some` overwrites `was_helpful`, `None` leaves it unchanged.
    pub set_was_helpful: Option<bool>,
    pub increment_used: bool,
    /// Set only ever raises the flag.
    pub require_review: bool,
}
