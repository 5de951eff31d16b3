//! Weighted scoring of candidate courses against a learner's enrollments.
//!
//! Each candidate receives three signals: mean semantic similarity to the
//! enrolled courses, enrollment count normalised across the candidates, and
//! category relevance. The combined score is their weighted sum.

use coursewise_core::{CandidateScore, Clock, Course, EmbeddingModel, EmbeddingVector};
use log::debug;

use crate::cache::EmbeddingCache;
use crate::category::EnrolledCategories;
use crate::error::{ConfigError, ScoringError};
use crate::fallback::distinct_candidates;
use crate::relations::{CategoryRelationGraph, category_relevance};

/// Relative weighting of the scoring signals.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScoreWeights {
    /// Multiplier for mean cosine similarity to enrolled courses.
    pub semantic: f32,
    /// Multiplier for normalised enrollment count.
    pub popularity: f32,
    /// Multiplier for category relevance.
    pub category: f32,
}

impl ScoreWeights {
    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidWeights`] when any value is negative or
    /// not finite, or the total weight is zero.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(ConfigError::InvalidWeights)
        }
    }

    fn is_valid(self) -> bool {
        let values = [self.semantic, self.popularity, self.category];
        values
            .iter()
            .all(|value| value.is_finite() && *value >= 0.0_f32)
            && values.iter().any(|value| *value > 0.0_f32)
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "score blending requires a weighted sum"
    )]
    fn combine(self, semantic: f32, popularity: f32, category: f32) -> f32 {
        self.semantic * semantic + self.popularity * popularity + self.category * category
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            semantic: 0.5_f32,
            popularity: 0.2_f32,
            category: 0.3_f32,
        }
    }
}

/// A candidate with its score breakdown, valid for one scoring pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<'a> {
    /// Candidate course.
    pub course: &'a Course,
    /// Weighted combination of the components.
    pub combined_score: f32,
    /// Mean cosine similarity to the enrolled courses.
    pub semantic_score: f32,
    /// Normalised enrollment count.
    pub popularity_score: f32,
    /// Category relevance in `0.0..=1.0`.
    pub category_relevance: f32,
}

impl ScoredCandidate<'_> {
    /// Project the breakdown into an owned explanation.
    #[must_use]
    pub fn explain(&self) -> CandidateScore {
        CandidateScore {
            course_id: self.course.id.clone(),
            combined: self.combined_score,
            semantic: self.semantic_score,
            popularity: self.popularity_score,
            category_relevance: self.category_relevance,
        }
    }
}

/// Min-max normalise enrollment counts across `candidates`.
///
/// Scores follow input order. When every candidate has the same count the
/// signal carries no information and each score is exactly `0.5`.
///
/// # Examples
/// ```
/// use coursewise_core::{Course, CourseId};
/// use coursewise_scorer::popularity_scores;
///
/// let courses: Vec<Course> = [10, 10, 10]
///     .into_iter()
///     .enumerate()
///     .map(|(idx, count)| Course::new(CourseId::new(idx.to_string()).unwrap(), "x", "", count))
///     .collect();
/// let refs: Vec<&Course> = courses.iter().collect();
/// assert_eq!(popularity_scores(&refs), vec![0.5, 0.5, 0.5]);
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "min-max scaling divides offsets by the observed range; ratios stay in 0.0..=1.0"
)]
#[must_use]
pub fn popularity_scores(candidates: &[&Course]) -> Vec<f32> {
    let counts = candidates.iter().map(|course| course.enrollment_count);
    let (Some(min), Some(max)) = (counts.clone().min(), counts.max()) else {
        return Vec::new();
    };
    if max == min {
        return vec![0.5_f32; candidates.len()];
    }
    let range = (max - min) as f64;
    candidates
        .iter()
        .map(|course| {
            let offset = (course.enrollment_count - min) as f64;
            (offset / range) as f32
        })
        .collect()
}

/// Non-finite similarities carry no signal.
const fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0_f32 }
}

/// Scores candidates using embeddings, popularity and category relations.
///
/// Borrowing every collaborator keeps the engine cheap to assemble per
/// request while the cache and graph outlive it.
#[derive(Debug)]
pub struct ScoringEngine<'a, M: ?Sized, C> {
    model: &'a M,
    cache: &'a EmbeddingCache<C>,
    graph: &'a CategoryRelationGraph,
    weights: ScoreWeights,
}

impl<'a, M, C> ScoringEngine<'a, M, C>
where
    M: EmbeddingModel + ?Sized,
    C: Clock,
{
    /// Assemble an engine from its collaborators.
    #[must_use]
    pub const fn new(
        model: &'a M,
        cache: &'a EmbeddingCache<C>,
        graph: &'a CategoryRelationGraph,
        weights: ScoreWeights,
    ) -> Self {
        Self {
            model,
            cache,
            graph,
            weights,
        }
    }

    /// Score every non-enrolled catalog course and sort best first.
    ///
    /// Candidates whose embedding is unavailable are left out rather than
    /// scored as zero. The sort is stable, so ties keep catalog order.
    ///
    /// # Errors
    /// Returns [`ScoringError`] when embeddings cannot be obtained or
    /// compared; callers are expected to fall back to an embedding-free
    /// ranking.
    pub fn rank<'c>(
        &self,
        enrolled: &'c [Course],
        catalog: &'c [Course],
    ) -> Result<Vec<ScoredCandidate<'c>>, ScoringError> {
        let categories = EnrolledCategories::from_courses(enrolled);
        let related = self.graph.related_with_scores(&categories);
        debug!(
            "enrolled categories {:?} relate to {} categories",
            categories.normalized().collect::<Vec<_>>(),
            related.len()
        );

        let candidates = distinct_candidates(enrolled, catalog);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let batch: Vec<&Course> = enrolled.iter().chain(candidates.iter().copied()).collect();
        let embeddings = self.cache.embeddings_for(self.model, &batch)?;
        let enrolled_embeddings: Vec<&EmbeddingVector> = enrolled
            .iter()
            .filter_map(|course| embeddings.get(&course.id))
            .collect();
        if enrolled_embeddings.is_empty() {
            return Err(ScoringError::MissingEnrolledEmbeddings);
        }

        let popularity = popularity_scores(&candidates);
        let mut scored = Vec::with_capacity(candidates.len());
        for (course, popularity_score) in candidates.into_iter().zip(popularity) {
            let Some(embedding) = embeddings.get(&course.id) else {
                debug!("skipping course {} without an embedding", course.id);
                continue;
            };
            let semantic_score = mean_similarity(embedding, &enrolled_embeddings)?;
            let relevance = category_relevance(&course.category, &categories, &related);
            scored.push(ScoredCandidate {
                course,
                combined_score: self.weights.combine(semantic_score, popularity_score, relevance),
                semantic_score,
                popularity_score,
                category_relevance: relevance,
            });
        }

        scored.sort_by(|left, right| right.combined_score.total_cmp(&left.combined_score));
        Ok(scored)
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "the semantic score is an arithmetic mean of similarities"
)]
fn mean_similarity(
    candidate: &EmbeddingVector,
    enrolled: &[&EmbeddingVector],
) -> Result<f32, ScoringError> {
    let mut total = 0.0_f32;
    for reference in enrolled {
        let similarity = reference.cosine_similarity(candidate).ok_or(
            ScoringError::DimensionMismatch {
                expected: reference.dimension(),
                actual: candidate.dimension(),
            },
        )?;
        total += finite_or_zero(similarity);
    }
    Ok(total / enrolled.len() as f32)
}

#[cfg(test)]
mod tests {
    use coursewise_core::test_support::{FailingModel, LookupModel};
    use coursewise_core::{CourseId, EmbeddingError};
    use rstest::{fixture, rstest};

    use super::*;

    fn course(id: &str, category: &str, description: &str, count: u64) -> Course {
        Course::new(CourseId::new(id).expect("valid id"), category, description, count)
    }

    #[fixture]
    fn graph() -> CategoryRelationGraph {
        CategoryRelationGraph::default()
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "tests compare floating point values"
    )]
    fn assert_near(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 0.000_1_f32,
            "expected {expected}, got {actual}"
        );
    }

    #[rstest]
    fn identical_counts_score_one_half() {
        let courses = [
            course("a", "x", "", 10),
            course("b", "x", "", 10),
            course("c", "x", "", 10),
        ];
        let refs: Vec<&Course> = courses.iter().collect();
        assert_eq!(popularity_scores(&refs), vec![0.5_f32; 3]);
    }

    #[rstest]
    fn counts_are_min_max_scaled() {
        let courses = [
            course("a", "x", "", 10),
            course("b", "x", "", 30),
            course("c", "x", "", 20),
        ];
        let refs: Vec<&Course> = courses.iter().collect();
        let scores = popularity_scores(&refs);
        assert_eq!(scores.len(), 3);
        assert_near(scores.first().copied().unwrap_or(-1.0), 0.0);
        assert_near(scores.get(1).copied().unwrap_or(-1.0), 1.0);
        assert_near(scores.get(2).copied().unwrap_or(-1.0), 0.5);
    }

    #[rstest]
    fn no_candidates_no_scores() {
        assert!(popularity_scores(&[]).is_empty());
    }

    #[rstest]
    #[case(ScoreWeights { semantic: 0.0, popularity: 0.0, category: 0.0 })]
    #[case(ScoreWeights { semantic: -0.1, popularity: 0.5, category: 0.5 })]
    #[case(ScoreWeights { semantic: f32::INFINITY, popularity: 0.5, category: 0.5 })]
    fn weights_reject_unusable_values(#[case] weights: ScoreWeights) {
        assert_eq!(weights.validate(), Err(ConfigError::InvalidWeights));
    }

    #[rstest]
    fn default_weights_are_valid() {
        assert!(ScoreWeights::default().validate().is_ok());
    }

    #[rstest]
    fn components_combine_with_default_weights(graph: CategoryRelationGraph) {
        let model = LookupModel::new(vec![1.0, 0.0]);
        let cache = EmbeddingCache::new();
        let engine = ScoringEngine::new(&model, &cache, &graph, ScoreWeights::default());
        let enrolled = [course("1", "Python", "Basics", 5)];
        let catalog = [course("2", "python", "More", 100), course("3", "Cooking", "Knives", 500)];

        let scored = engine.rank(&enrolled, &catalog).expect("scoring succeeds");

        let ids: Vec<&str> = scored.iter().map(|c| c.course.id.as_str()).collect();
        assert_eq!(ids, ["2", "3"]);
        let top = scored.first().expect("top candidate");
        assert_near(top.semantic_score, 1.0);
        assert_near(top.popularity_score, 0.0);
        assert_near(top.category_relevance, 1.0);
        assert_near(top.combined_score, 0.8);
        let other = scored.get(1).expect("second candidate");
        assert_near(other.combined_score, 0.7);
    }

    #[rstest]
    fn enrolled_courses_are_never_candidates(graph: CategoryRelationGraph) {
        let model = LookupModel::new(vec![1.0, 0.0]);
        let cache = EmbeddingCache::new();
        let engine = ScoringEngine::new(&model, &cache, &graph, ScoreWeights::default());
        let enrolled = [course("1", "Python", "Basics", 5)];
        let catalog = [course("1", "Python", "Basics", 5), course("2", "Python", "More", 1)];

        let scored = engine.rank(&enrolled, &catalog).expect("scoring succeeds");

        assert_eq!(scored.len(), 1);
        assert!(scored.iter().all(|c| c.course.id.as_str() != "1"));
    }

    #[rstest]
    fn ties_keep_catalog_order(graph: CategoryRelationGraph) {
        let model = LookupModel::new(vec![1.0, 0.0]);
        let cache = EmbeddingCache::new();
        let engine = ScoringEngine::new(&model, &cache, &graph, ScoreWeights::default());
        let enrolled = [course("e", "Pottery", "Clay", 5)];
        let catalog = [
            course("x", "Knitting", "Wool", 7),
            course("y", "Baking", "Bread", 7),
            course("z", "Sailing", "Boats", 7),
        ];

        let scored = engine.rank(&enrolled, &catalog).expect("scoring succeeds");

        let ids: Vec<&str> = scored.iter().map(|c| c.course.id.as_str()).collect();
        assert_eq!(ids, ["x", "y", "z"]);
    }

    #[rstest]
    fn model_failure_is_reported(graph: CategoryRelationGraph) {
        let cache = EmbeddingCache::new();
        let engine = ScoringEngine::new(&FailingModel, &cache, &graph, ScoreWeights::default());
        let enrolled = [course("1", "Python", "Basics", 5)];
        let catalog = [course("2", "Python", "More", 1)];

        let err = engine.rank(&enrolled, &catalog).expect_err("model fails");

        assert!(matches!(
            err,
            ScoringError::Embedding(EmbeddingError::ModelUnavailable { .. })
        ));
    }

    #[rstest]
    fn mismatched_dimensions_are_reported(graph: CategoryRelationGraph) {
        let model = LookupModel::new(vec![1.0, 0.0]).with_vector("Odd", vec![1.0, 0.0, 0.0]);
        let cache = EmbeddingCache::new();
        let engine = ScoringEngine::new(&model, &cache, &graph, ScoreWeights::default());
        let enrolled = [course("1", "Python", "Basics", 5)];
        let catalog = [course("2", "Python", "Odd", 1)];

        let err = engine.rank(&enrolled, &catalog).expect_err("dimensions differ");

        assert_eq!(
            err,
            ScoringError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
    }
}
