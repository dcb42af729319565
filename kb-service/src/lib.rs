//! # kb-service
//!
//! The operation surface the helpdesk CRUD layer calls. Everything is
//! constructed from a [`KbConfig`](kb_core::KbConfig) plus an injected store
//! and embedding provider; there is no global state.

pub mod automation;
pub mod plan;
pub mod service;

pub use plan::{AnswerContext, AnswerPlan, AnswerRoute, PlannedAction, SearchRequest};
pub use service::KnowledgeService;
