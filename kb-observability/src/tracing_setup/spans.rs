//! Span definitions per operation: search, gate, feedback, solutions, embedding.

/// Create a similarity search span.
#[macro_export]
macro_rules! search_span {
    ($limit:expr, $category:expr) => {
        tracing::info_span!("kb.search", limit = $limit, category = ?$category)
    };
}

/// Create an auto-answer gate span.
#[macro_export]
macro_rules! gate_span {
    ($question_chars:expr) => {
        tracing::info_span!("kb.gate", question_chars = $question_chars)
    };
}

/// Create a feedback span.
#[macro_export]
macro_rules! feedback_span {
    ($dialog_id:expr, $rating:expr) => {
        tracing::info_span!("kb.feedback", dialog_id = %$dialog_id, rating = %$rating)
    };
}

/// Create a solution recommendation span.
#[macro_export]
macro_rules! solutions_span {
    ($category:expr) => {
        tracing::info_span!("kb.solutions", category = ?$category)
    };
}

/// Create an embedding span.
#[macro_export]
macro_rules! embedding_span {
    ($provider:expr, $dimension:expr) => {
        tracing::info_span!("kb.embedding", provider = %$provider, dimension = $dimension)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const SEARCH: &str = "kb.search";
    pub const GATE: &str = "kb.gate";
    pub const FEEDBACK: &str = "kb.feedback";
    pub const SOLUTIONS: &str = "kb.solutions";
    pub const EMBEDDING: &str = "kb.embedding";
}
