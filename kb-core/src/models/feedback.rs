use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A client or operator judgment on an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Helpful,
    NotHelpful,
    Partially,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Helpful, Rating::NotHelpful, Rating::Partially];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Helpful => "helpful",
            Self::NotHelpful => "not_helpful",
            Self::Partially => "partially",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "helpful" => Some(Self::Helpful),
            "not_helpful" => Some(Self::NotHelpful),
            "partially" => Some(Self::Partially),
            _ => None,
        }
    }
}

/// One immutable feedback event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    pub dialog_id: String,
    pub rating: Rating,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(dialog_id: impl Into<String>, rating: Rating, comment: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            dialog_id: dialog_id.into(),
            rating,
            comment,
            created_at: Utc::now(),
        }
    }
}

/// Per-day tally of one rating type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFeedbackStat {
    pub date: NaiveDate,
    pub rating: Rating,
    pub count: u64,
}
