//! Category-aware reranking of scored candidates.

use std::collections::HashSet;

use coursewise_core::Course;

use crate::category::normalize;
use crate::scoring::ScoredCandidate;

/// Category relevance at or above which a course may repeat a category.
pub const DIVERSITY_RELEVANCE_THRESHOLD: f32 = 0.5;

/// Selects the top candidates while limiting category repetition.
///
/// The first pass walks the ranking and takes a candidate when its category
/// has not been taken yet, or when its category relevance reaches the
/// threshold. A second pass backfills from the ranking in order, ignoring
/// categories, so the output is never shorter than
/// `min(top_n, candidates.len())`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiversityRanker {
    relevance_threshold: f32,
}

impl DiversityRanker {
    /// Create a ranker letting candidates at or above `relevance_threshold`
    /// repeat categories.
    #[must_use]
    pub const fn new(relevance_threshold: f32) -> Self {
        Self {
            relevance_threshold,
        }
    }

    /// Pick up to `top_n` courses from a ranking sorted best first.
    #[must_use]
    pub fn diversify<'a>(&self, ranked: &[ScoredCandidate<'a>], top_n: usize) -> Vec<&'a Course> {
        let mut taken = vec![false; ranked.len()];
        let mut selected: Vec<&'a Course> = Vec::with_capacity(top_n.min(ranked.len()));
        let mut seen_categories = HashSet::new();

        for (candidate, slot) in ranked.iter().zip(taken.iter_mut()) {
            if selected.len() >= top_n {
                break;
            }
            let category = normalize(&candidate.course.category);
            let repeats = seen_categories.contains(&category);
            if !repeats || candidate.category_relevance >= self.relevance_threshold {
                seen_categories.insert(category);
                selected.push(candidate.course);
                *slot = true;
            }
        }

        for (candidate, already) in ranked.iter().zip(&taken) {
            if selected.len() >= top_n {
                break;
            }
            if !already {
                selected.push(candidate.course);
            }
        }
        selected
    }
}

impl Default for DiversityRanker {
    fn default() -> Self {
        Self::new(DIVERSITY_RELEVANCE_THRESHOLD)
    }
}
