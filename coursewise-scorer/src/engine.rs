//! The `recommend` entry point tying scoring, diversity and fallback together.

use std::sync::Arc;

use coursewise_core::{
    Clock, Course, EmbeddingModel, RankingSource, RecommendError, RecommendRequest,
    RecommendResponse, Recommender, SystemClock,
};
use log::{debug, warn};

use crate::cache::EmbeddingCache;
use crate::diversity::{DIVERSITY_RELEVANCE_THRESHOLD, DiversityRanker};
use crate::error::ConfigError;
use crate::fallback::{FallbackRecommender, distinct_candidates, most_popular};
use crate::relations::CategoryRelationGraph;
use crate::scoring::{ScoreWeights, ScoringEngine};

/// Tunable parameters of [`RecommendationEngine`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EngineConfig {
    /// Weights blending the scoring signals.
    pub weights: ScoreWeights,
    /// Category relevance letting a candidate repeat an already selected
    /// category.
    pub diversity_relevance_threshold: f32,
}

impl EngineConfig {
    /// Validate the configuration and return a copy.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidWeights`] for unusable weights and
    /// [`ConfigError::InvalidThreshold`] when the threshold is not a finite
    /// value in `0.0..=1.0`.
    pub fn validate(self) -> Result<Self, ConfigError> {
        self.weights.validate()?;
        if !(0.0_f32..=1.0_f32).contains(&self.diversity_relevance_threshold) {
            return Err(ConfigError::InvalidThreshold);
        }
        Ok(self)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            diversity_relevance_threshold: DIVERSITY_RELEVANCE_THRESHOLD,
        }
    }
}

/// Course recommender combining semantic similarity, popularity and
/// category relations.
///
/// Requests without enrollments are ranked by popularity. Otherwise the
/// catalog is scored and diversified; when the scoring pass fails for any
/// reason the embedding-free [`FallbackRecommender`] answers instead, so
/// model outages never reach the caller.
///
/// The cache and graph sit behind [`Arc`] so several engines, for example
/// one per model, can share them.
///
/// # Examples
/// ```
/// use coursewise_core::{Course, CourseId, RankingSource, RecommendRequest, Recommender};
/// use coursewise_scorer::{HashingEmbedder, RecommendationEngine};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = RecommendationEngine::new(HashingEmbedder::default());
/// let enrolled = vec![Course::new(CourseId::new("1")?, "Python", "Python basics", 10)];
/// let catalog = vec![
///     Course::new(CourseId::new("2")?, "Python", "Advanced Python", 100),
///     Course::new(CourseId::new("3")?, "Cooking", "Knife skills", 500),
/// ];
/// let response = engine.recommend(&RecommendRequest::new(enrolled, catalog).with_top_n(1))?;
/// assert_eq!(response.source, RankingSource::Scored);
/// assert_eq!(response.course_ids[0].as_str(), "2");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RecommendationEngine<M, C = SystemClock> {
    model: M,
    cache: Arc<EmbeddingCache<C>>,
    graph: Arc<CategoryRelationGraph>,
    config: EngineConfig,
}

impl<M: EmbeddingModel> RecommendationEngine<M> {
    /// Build an engine with a fresh system-clock cache, the built-in graph
    /// and default configuration.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            model,
            cache: Arc::new(EmbeddingCache::new()),
            graph: Arc::new(CategoryRelationGraph::default()),
            config: EngineConfig::default(),
        }
    }
}

impl<M, C> RecommendationEngine<M, C>
where
    M: EmbeddingModel,
    C: Clock,
{
    /// Replace the embedding cache.
    #[must_use]
    pub fn with_cache<D: Clock>(self, cache: Arc<EmbeddingCache<D>>) -> RecommendationEngine<M, D> {
        RecommendationEngine {
            model: self.model,
            cache,
            graph: self.graph,
            config: self.config,
        }
    }

    /// Replace the category relation graph.
    #[must_use]
    pub fn with_graph(mut self, graph: Arc<CategoryRelationGraph>) -> Self {
        self.graph = graph;
        self
    }

    /// Replace the configuration after validating it.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when `config` fails [`EngineConfig::validate`].
    pub fn with_config(mut self, config: EngineConfig) -> Result<Self, ConfigError> {
        self.config = config.validate()?;
        Ok(self)
    }

    /// Shared embedding cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<EmbeddingCache<C>> {
        &self.cache
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank with the embedding-free fallback only.
    ///
    /// Exposed so callers and tests can compare a degraded answer with the
    /// one the engine returned.
    #[must_use]
    pub fn fallback<'c>(&self, request: &'c RecommendRequest) -> Vec<&'c Course> {
        FallbackRecommender::new(&self.graph).recommend(
            &request.enrolled,
            &request.catalog,
            request.top_n,
        )
    }
}

impl<M, C> Recommender for RecommendationEngine<M, C>
where
    M: EmbeddingModel,
    C: Clock,
{
    fn recommend(&self, request: &RecommendRequest) -> Result<RecommendResponse, RecommendError> {
        request.validate()?;

        if request.enrolled.is_empty() {
            debug!("no enrollments; ranking {} courses by popularity", request.catalog.len());
            let selected = most_popular(distinct_candidates(&[], &request.catalog), request.top_n);
            return Ok(response(&selected, RankingSource::Popularity, Vec::new()));
        }

        let scorer =
            ScoringEngine::new(&self.model, &*self.cache, &self.graph, self.config.weights);
        match scorer.rank(&request.enrolled, &request.catalog) {
            Ok(ranked) => {
                let selected = DiversityRanker::new(self.config.diversity_relevance_threshold)
                    .diversify(&ranked, request.top_n);
                debug!("selected {} of {} scored candidates", selected.len(), ranked.len());
                let scores = ranked.iter().map(|candidate| candidate.explain()).collect();
                Ok(response(&selected, RankingSource::Scored, scores))
            }
            Err(err) => {
                warn!("scoring failed, using fallback ranking: {err}");
                let selected = self.fallback(request);
                Ok(response(&selected, RankingSource::Fallback, Vec::new()))
            }
        }
    }
}

fn response(
    selected: &[&Course],
    source: RankingSource,
    scores: Vec<coursewise_core::CandidateScore>,
) -> RecommendResponse {
    RecommendResponse {
        course_ids: selected.iter().map(|course| course.id.clone()).collect(),
        source,
        scores,
    }
}
