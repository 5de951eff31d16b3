//! Course scoring and recommendation.
//!
//! The pipeline for one request runs in this order:
//! 1. [`normalize`] folds enrolled and candidate category labels;
//! 2. [`CategoryRelationGraph`] expands the enrolled categories into related
//!    ones with affinities;
//! 3. [`EmbeddingCache`] supplies course embeddings from an
//!    [`EmbeddingModel`](coursewise_core::EmbeddingModel), calling the model
//!    once per request for the misses;
//! 4. [`ScoringEngine`] blends semantic similarity, popularity and category
//!    relevance;
//! 5. [`DiversityRanker`] picks the final courses while limiting category
//!    repetition.
//!
//! [`RecommendationEngine`] drives the pipeline and implements
//! [`Recommender`](coursewise_core::Recommender). When scoring fails it
//! answers with [`FallbackRecommender`] instead.
//!
//! # Examples
//!
//! ```
//! use coursewise_core::{Course, CourseId, RecommendRequest, Recommender};
//! use coursewise_scorer::{RecommendationEngine, UnavailableModel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = RecommendationEngine::new(UnavailableModel::default());
//! let enrolled = vec![Course::new(CourseId::new("1")?, "Python", "Basics", 10)];
//! let catalog = vec![
//!     Course::new(CourseId::new("2")?, "Python", "Django", 30),
//!     Course::new(CourseId::new("3")?, "Cooking", "Knives", 90),
//! ];
//! let response = engine.recommend(&RecommendRequest::new(enrolled, catalog).with_top_n(1))?;
//! assert_eq!(response.course_ids[0].as_str(), "2");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod cache;
mod category;
mod diversity;
mod engine;
mod error;
mod fallback;
mod models;
mod relations;
mod scoring;

pub use cache::{CacheStats, DEFAULT_CACHE_TTL, EMPTY_DESCRIPTION_PLACEHOLDER, EmbeddingCache};
pub use category::{EnrolledCategories, normalize};
pub use diversity::{DIVERSITY_RELEVANCE_THRESHOLD, DiversityRanker};
pub use engine::{EngineConfig, RecommendationEngine};
pub use error::{ConfigError, RelationGraphError, ScoringError};
pub use fallback::{FallbackRecommender, most_popular};
pub use models::{DEFAULT_EMBEDDING_DIMENSION, DeadlineModel, HashingEmbedder, UnavailableModel};
pub use relations::{
    CategoryRelationGraph, PARTIAL_MATCH_DISCOUNT, RelatedCategories, category_relevance,
};
pub use scoring::{ScoreWeights, ScoredCandidate, ScoringEngine, popularity_scores};
