use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Course, CourseError, CourseId};

/// Number of recommendations returned when the caller does not ask for a
/// specific count.
pub const DEFAULT_TOP_N: usize = 5;

/// Parameters for a recommendation request.
///
/// # Examples
/// ```rust
/// use coursewise_core::{Course, CourseId, RecommendRequest};
///
/// # fn main() -> Result<(), coursewise_core::CourseError> {
/// let enrolled = vec![Course::new(CourseId::new("1")?, "Python", "Basics", 10)];
/// let catalog = vec![Course::new(CourseId::new("2")?, "Python", "Django", 30)];
/// let request = RecommendRequest::new(enrolled, catalog).with_top_n(3);
/// assert_eq!(request.top_n, 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendRequest {
    /// Courses the learner is already enrolled in.
    pub enrolled: Vec<Course>,
    /// Every course that may be recommended, enrolled ones included.
    pub catalog: Vec<Course>,
    /// Maximum number of recommendations to return.
    pub top_n: usize,
}

impl RecommendRequest {
    /// Build a request for [`DEFAULT_TOP_N`] recommendations.
    #[must_use]
    pub const fn new(enrolled: Vec<Course>, catalog: Vec<Course>) -> Self {
        Self {
            enrolled,
            catalog,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Override the number of recommendations while returning `self`.
    #[must_use]
    pub const fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Check request-level parameters.
    ///
    /// # Errors
    /// Returns [`RecommendError::ZeroTopN`] when no recommendations were
    /// requested.
    pub const fn validate(&self) -> Result<(), RecommendError> {
        if self.top_n == 0 {
            return Err(RecommendError::ZeroTopN);
        }
        Ok(())
    }
}

/// Wire shape of a recommendation request, before validation.
///
/// Field names follow the JSON contract of the web layer.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendPayload {
    /// Raw enrolled course records.
    #[serde(default)]
    pub enrolled_courses: Vec<crate::CourseRecord>,
    /// Raw catalog course records.
    #[serde(default)]
    pub all_courses: Vec<crate::CourseRecord>,
    /// Optional number of recommendations.
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[cfg(feature = "serde")]
impl TryFrom<RecommendPayload> for RecommendRequest {
    type Error = RecommendError;

    fn try_from(payload: RecommendPayload) -> Result<Self, Self::Error> {
        let enrolled = payload
            .enrolled_courses
            .into_iter()
            .map(Course::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let catalog = payload
            .all_courses
            .into_iter()
            .map(Course::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let request =
            Self::new(enrolled, catalog).with_top_n(payload.top_n.unwrap_or(DEFAULT_TOP_N));
        request.validate()?;
        Ok(request)
    }
}

/// Which strategy produced a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RankingSource {
    /// No enrollment history; candidates ordered by enrollment count.
    Popularity,
    /// Full semantic, popularity and category scoring.
    Scored,
    /// Embedding-free degraded ranking.
    Fallback,
}

/// Per-candidate score breakdown explaining a scored ranking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateScore {
    /// Candidate course.
    pub course_id: CourseId,
    /// Weighted combination of the components below.
    pub combined: f32,
    /// Mean cosine similarity to the enrolled courses.
    pub semantic: f32,
    /// Enrollment count min-max normalised over the candidates.
    pub popularity: f32,
    /// Category relevance in `0.0..=1.0`.
    pub category_relevance: f32,
}

/// Response from a successful recommendation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecommendResponse {
    /// Recommended courses, best first.
    pub course_ids: Vec<CourseId>,
    /// Strategy that produced the ranking.
    pub source: RankingSource,
    /// Score breakdown for every scored candidate, in ranked order before
    /// diversification. Empty unless `source` is [`RankingSource::Scored`].
    pub scores: Vec<CandidateScore>,
}

impl RecommendResponse {
    /// Resolve the recommended identifiers against `catalog`, preserving
    /// ranked order.
    #[must_use]
    pub fn courses<'a>(&self, catalog: &'a [Course]) -> Vec<&'a Course> {
        self.course_ids
            .iter()
            .filter_map(|id| catalog.iter().find(|course| &course.id == id))
            .collect()
    }
}

/// Errors returned by [`Recommender::recommend`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    /// A course record was malformed.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] CourseError),
    /// Zero recommendations were requested.
    #[error("top_n must be at least 1")]
    ZeroTopN,
}

/// Rank catalog courses for a learner.
///
/// Implementations never return a course the learner is enrolled in and never
/// return more than `request.top_n` identifiers. Recommenders must be
/// `Send + Sync` so one instance can serve concurrent requests.
pub trait Recommender: Send + Sync {
    /// Produce recommendations or an input error.
    ///
    /// # Errors
    /// Returns [`RecommendError`] for invalid requests only; internal scoring
    /// failures degrade to a simpler ranking instead.
    fn recommend(&self, request: &RecommendRequest) -> Result<RecommendResponse, RecommendError>;
}
