// Storage
pub const DEFAULT_DB_PATH: &str = "knowledge.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// Embedding
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "http";
pub const DEFAULT_EMBEDDING_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_API_KEY_ENV: &str = "EMBEDDING_API_KEY";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;
pub const DEFAULT_EMBEDDING_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_EMBEDDING_MAX_INPUT_CHARS: usize = 8_000;
pub const DEFAULT_L1_CACHE_SIZE: u64 = 10_000;

// Feedback
pub const DEFAULT_HELPFUL_DELTA: f64 = 0.05;
pub const DEFAULT_NOT_HELPFUL_DELTA: f64 = 0.15;
pub const DEFAULT_PARTIALLY_DELTA: f64 = 0.05;

// Observability
pub const DEFAULT_LOG_LEVEL: &str = "info";
