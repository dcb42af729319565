//! # kb-embeddings
//!
//! Turns question text into vectors. The configured provider is wrapped by
//! [`EmbeddingEngine`], which sanitizes and truncates input, validates
//! dimensions, and caches results in memory. Provider failures surface as
//! `EmbeddingError` so callers can degrade instead of failing the request.

pub mod backfill;
pub mod cache;
pub mod engine;
pub mod providers;
pub mod sanitize;

pub use backfill::{backfill_missing, BackfillReport};
pub use engine::EmbeddingEngine;
pub use providers::{
    create_provider, DisabledProvider, HashedEmbeddingProvider, HttpEmbeddingProvider,
};
