/// Engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Confidence assigned to a freshly recorded dialog.
pub const DEFAULT_DIALOG_CONFIDENCE: f64 = 0.5;

/// Maximum accepted question length (characters) at the service boundary.
pub const MAX_QUESTION_CHARS: usize = 10_000;

/// Default number of results returned by similarity search.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Default similarity floor for suggestion search.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.70;

/// Similarity floor for the auto-answer gate.
pub const AUTO_ANSWER_MIN_SIMILARITY: f64 = 0.92;

/// Minimum confidence score for auto-answering.
pub const AUTO_ANSWER_MIN_CONFIDENCE: f64 = 0.5;

/// Minimum usage count before a dialog may be auto-answered.
pub const AUTO_ANSWER_MIN_USED_COUNT: u64 = 2;

/// Search fetches this many times the requested limit before thresholding.
pub const SEARCH_OVERFETCH_FACTOR: usize = 2;

/// Keyword scorer: candidates at or below this raw score are discarded.
pub const SOLUTION_MIN_SCORE: f64 = 20.0;

/// Keyword scorer: relative confidence ceiling.
pub const SOLUTION_MAX_CONFIDENCE: u8 = 99;

/// Keyword scorer: fixed confidence of category-only fallback matches.
pub const SOLUTION_FALLBACK_CONFIDENCE: u8 = 40;

/// Maximum keywords extracted from a problem description.
pub const MAX_KEYWORDS: usize = 20;

/// Minimum keyword length in characters.
pub const MIN_KEYWORD_CHARS: usize = 3;
