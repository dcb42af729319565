use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A keyword-indexed entry of the solutions catalog. Carries no embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub id: String,
    pub category: String,
    pub subcategory: Option<String>,
    /// Keyword tags, compared case-insensitively.
    pub problem_keywords: Vec<String>,
    pub problem_pattern: String,
    pub solution_text: String,
    pub solution_steps: Vec<String>,
    /// 1–5.
    pub success_score: u8,
    pub used_count: u64,
    pub helpful_votes: u64,
    pub not_helpful_votes: u64,
    pub is_verified: bool,
    pub is_active: bool,
    /// Historical mean time to resolution when this solution was applied.
    pub avg_resolution_minutes: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Solution {
    /// A new, unverified catalog entry with neutral statistics.
    pub fn new(
        category: impl Into<String>,
        problem_pattern: impl Into<String>,
        solution_text: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            category: category.into(),
            subcategory: None,
            problem_keywords: Vec::new(),
            problem_pattern: problem_pattern.into(),
            solution_text: solution_text.into(),
            solution_steps: Vec::new(),
            success_score: 3,
            used_count: 0,
            helpful_votes: 0,
            not_helpful_votes: 0,
            is_verified: false,
            is_active: true,
            avg_resolution_minutes: None,
            created_at: now,
            updated_at: now,
            last_used_at: None,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for kw in keywords {
            let kw = kw.into().to_lowercase();
            if !self.problem_keywords.contains(&kw) {
                self.problem_keywords.push(kw);
            }
        }
        self
    }
}

/// Usage signal recorded against a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageVote {
    Helpful,
    NotHelpful,
    Used,
}
