//! Core domain types for the Coursewise recommendation engine.
//!
//! These models validate at the boundary so downstream scoring can assume
//! every required field exists. Loose caller records convert into
//! [`Course`] via `TryFrom`, surfacing malformed input early as
//! [`CourseError`].
//!
//! The crate also defines the seams the engine is assembled from:
//! [`EmbeddingModel`] for the external text-embedding collaborator,
//! [`Clock`] for injectable time, and [`Recommender`] for the request-level
//! entry point.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod clock;
mod course;
mod embedding;
mod recommender;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use clock::{Clock, SystemClock};
pub use course::{Course, CourseError, CourseId, CourseRecord, RawCourseId};
pub use embedding::{EmbeddingError, EmbeddingModel, EmbeddingVector};
#[cfg(feature = "serde")]
pub use recommender::RecommendPayload;
pub use recommender::{
    CandidateScore, DEFAULT_TOP_N, RankingSource, RecommendError, RecommendRequest,
    RecommendResponse, Recommender,
};
