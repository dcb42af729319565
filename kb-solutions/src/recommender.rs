//! Ranked solution recommendations with a category fallback.

use std::cmp::Ordering;

use tracing::debug;

use kb_core::config::SolutionsConfig;
use kb_core::errors::{KbResult, RetrievalError};
use kb_core::models::UsageVote;
use kb_core::text;
use kb_core::traits::ISolutionStore;

use crate::keywords::extract_keywords;
use crate::scorer::{relative_confidence, score_solution, MatchType, ScoredSolution};

#[derive(Debug, Clone, Default)]
pub struct RecommendRequest {
    pub category: Option<String>,
    /// Falls back to `solutions.default_limit`.
    pub limit: Option<usize>,
}

pub struct SolutionRecommender<'a> {
    store: &'a dyn ISolutionStore,
    config: SolutionsConfig,
}

impl<'a> SolutionRecommender<'a> {
    pub fn new(store: &'a dyn ISolutionStore, config: SolutionsConfig) -> Self {
        Self { store, config }
    }

    /// Score every active solution against `problem` and return the best.
    ///
    /// Candidates scoring at or below `min_score` are dropped. When nothing
    /// survives and a category was given, the category's best-rated
    /// solutions are returned at a fixed confidence instead.
    pub fn recommend(&self, problem: &str, req: &RecommendRequest) -> KbResult<Vec<ScoredSolution>> {
        text::validate_question(problem)?;
        let limit = req.limit.unwrap_or(self.config.default_limit);
        if limit == 0 {
            return Err(RetrievalError::InvalidOptions {
                reason: "limit must be at least 1".into(),
            }
            .into());
        }

        let keywords = extract_keywords(problem, self.config.max_keywords);
        let category = req.category.as_deref();

        let mut scored: Vec<ScoredSolution> = self
            .store
            .active_solutions(None)?
            .into_iter()
            .filter_map(|solution| {
                let s = score_solution(&solution, &keywords, category);
                (s.score > self.config.min_score).then(|| ScoredSolution {
                    solution,
                    score: s.score,
                    confidence: 0,
                    match_type: MatchType::Keyword,
                    matched_keywords: s.matched_keywords,
                })
            })
            .collect();

        if scored.is_empty() {
            return match category {
                Some(cat) => self.category_fallback(cat, &keywords, limit),
                None => Ok(vec![]),
            };
        }

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.solution.success_score.cmp(&a.solution.success_score))
                .then_with(|| b.solution.used_count.cmp(&a.solution.used_count))
                .then_with(|| a.solution.id.cmp(&b.solution.id))
        });
        scored.truncate(limit);

        let top = scored[0].score;
        for s in &mut scored {
            s.confidence = relative_confidence(s.score, top);
        }

        debug!(
            keywords = keywords.len(),
            returned = scored.len(),
            top_score = top,
            "solutions ranked by keyword"
        );
        Ok(scored)
    }

    fn category_fallback(
        &self,
        category: &str,
        keywords: &[String],
        limit: usize,
    ) -> KbResult<Vec<ScoredSolution>> {
        let results: Vec<ScoredSolution> = self
            .store
            .active_solutions(Some(category))?
            .into_iter()
            .take(limit)
            .map(|solution| {
                let s = score_solution(&solution, keywords, Some(category));
                ScoredSolution {
                    solution,
                    score: s.score,
                    confidence: self.config.fallback_confidence,
                    match_type: MatchType::CategoryFallback,
                    matched_keywords: s.matched_keywords,
                }
            })
            .collect();
        debug!(category, returned = results.len(), "solutions from category fallback");
        Ok(results)
    }

    pub fn record_usage(&self, solution_id: &str, vote: UsageVote) -> KbResult<()> {
        self.store.record_solution_usage(solution_id, vote)
    }
}
