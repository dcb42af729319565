//! # kb-solutions
//!
//! Keyword path for questions the embedding corpus cannot answer: extract
//! keywords from the problem text and rank catalog solutions by a weighted
//! relevance score.

pub mod keywords;
pub mod recommender;
pub mod scorer;

pub use keywords::{extract_keywords, is_stop_word};
pub use recommender::{RecommendRequest, SolutionRecommender};
pub use scorer::{relative_confidence, score_solution, MatchType, ScoredSolution, SolutionScore};
