//! Facade crate for the Coursewise recommendation engine.
//!
//! This crate re-exports the core domain types and the scoring pipeline, and
//! exposes the course-material summariser behind the `summary` feature.
//!
//! ```
//! use coursewise_engine::{
//!     Course, CourseId, RankingSource, RecommendRequest, RecommendationEngine, Recommender,
//!     UnavailableModel,
//! };
//!
//! let course = |id: &str, category: &str, count| {
//!     CourseId::new(id).map(|id| Course::new(id, category, "", count))
//! };
//! let catalog = vec![course("a", "Python", 10)?, course("b", "Cooking", 90)?];
//! let engine = RecommendationEngine::new(UnavailableModel::default());
//!
//! let response = engine.recommend(&RecommendRequest::new(Vec::new(), catalog))?;
//! assert_eq!(response.source, RankingSource::Popularity);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

pub use coursewise_core::{
    CandidateScore, Clock, Course, CourseError, CourseId, CourseRecord, DEFAULT_TOP_N,
    EmbeddingError, EmbeddingModel, EmbeddingVector, RankingSource, RawCourseId, RecommendError,
    RecommendRequest, RecommendResponse, Recommender, SystemClock,
};

#[cfg(feature = "serde")]
pub use coursewise_core::RecommendPayload;

#[cfg(feature = "test-support")]
pub use coursewise_core::test_support;

pub use coursewise_scorer::{
    CategoryRelationGraph, DeadlineModel, DiversityRanker, EmbeddingCache, EngineConfig,
    FallbackRecommender, HashingEmbedder, RecommendationEngine, ScoreWeights, ScoringEngine,
    UnavailableModel, normalize,
};

#[cfg(feature = "summary")]
pub use coursewise_summary::{
    LeadSentenceSummarizer, Summarizer, SummaryError, chunk_text, chunked_summarize,
};
