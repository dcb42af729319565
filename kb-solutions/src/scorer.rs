//! Weighted keyword relevance of a catalog solution.
//!
//! | term                                   | points                      |
//! |----------------------------------------|-----------------------------|
//! | category equals the requested category | +30                         |
//! | keyword overlaps a solution tag        | +10 per keyword             |
//! | keyword overlaps a pattern word        | +5 per keyword              |
//! | success score                          | +5 × success_score          |
//! | usage                                  | +0.5 × min(used_count, 50)  |
//! | helpful ratio                          | +20 × helpful / max(votes,1)|
//! | verified                               | +15                         |
//! | resolved in under 30 minutes on average| +10                         |

use serde::Serialize;

use kb_core::constants::SOLUTION_MAX_CONFIDENCE;
use kb_core::models::Solution;

const CATEGORY_POINTS: f64 = 30.0;
const TAG_POINTS: f64 = 10.0;
const PATTERN_POINTS: f64 = 5.0;
const SUCCESS_POINTS: f64 = 5.0;
const USAGE_POINTS: f64 = 0.5;
const USAGE_CAP: u64 = 50;
const HELPFUL_POINTS: f64 = 20.0;
const VERIFIED_POINTS: f64 = 15.0;
const FAST_RESOLUTION_POINTS: f64 = 10.0;
const FAST_RESOLUTION_MINUTES: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Keyword,
    CategoryFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolutionScore {
    pub score: f64,
    /// Keywords that hit a tag or a pattern word.
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredSolution {
    pub solution: Solution,
    pub score: f64,
    /// 0–99, relative to the best candidate in the same result set.
    pub confidence: u8,
    pub match_type: MatchType,
    pub matched_keywords: Vec<String>,
}

fn overlaps(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

pub fn score_solution(solution: &Solution, keywords: &[String], category: Option<&str>) -> SolutionScore {
    let mut score = 0.0;
    let mut matched: Vec<String> = Vec::new();

    if category.is_some_and(|c| c == solution.category) {
        score += CATEGORY_POINTS;
    }

    let tags: Vec<String> = solution
        .problem_keywords
        .iter()
        .map(|t| t.to_lowercase())
        .collect();
    let pattern_lower = solution.problem_pattern.to_lowercase();
    let pattern_words: Vec<&str> = pattern_lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for kw in keywords {
        let mut hit = false;
        if tags.iter().any(|t| overlaps(kw, t)) {
            score += TAG_POINTS;
            hit = true;
        }
        if pattern_words.iter().any(|w| overlaps(kw, w)) {
            score += PATTERN_POINTS;
            hit = true;
        }
        if hit {
            matched.push(kw.clone());
        }
    }

    score += SUCCESS_POINTS * f64::from(solution.success_score);
    score += USAGE_POINTS * solution.used_count.min(USAGE_CAP) as f64;

    let votes = solution.helpful_votes + solution.not_helpful_votes;
    score += HELPFUL_POINTS * solution.helpful_votes as f64 / votes.max(1) as f64;

    if solution.is_verified {
        score += VERIFIED_POINTS;
    }
    if solution
        .avg_resolution_minutes
        .is_some_and(|m| m < FAST_RESOLUTION_MINUTES)
    {
        score += FAST_RESOLUTION_POINTS;
    }

    SolutionScore {
        score,
        matched_keywords: matched,
    }
}

/// `round(min(99, score / top × 100))`.
pub fn relative_confidence(score: f64, top: f64) -> u8 {
    if top <= 0.0 {
        return 0;
    }
    let pct = (score / top * 100.0).min(f64::from(SOLUTION_MAX_CONFIDENCE));
    pct.max(0.0).round() as u8
}
