//! Courses as supplied by callers, plus the loose boundary record they are
//! validated from.

use std::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque, stable identifier for a course.
///
/// Identifiers arrive either as strings (document ids) or as integers; both
/// are kept in their textual form so comparisons stay exact.
///
/// # Examples
/// ```
/// use coursewise_core::CourseId;
///
/// let id = CourseId::new("64f1c0ffee")?;
/// assert_eq!(id.as_str(), "64f1c0ffee");
/// # Ok::<(), coursewise_core::CourseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct CourseId(String);

impl CourseId {
    /// Validate and wrap an identifier.
    ///
    /// # Errors
    /// Returns [`CourseError::BlankId`] when the identifier is empty or only
    /// whitespace.
    pub fn new(raw: impl Into<String>) -> Result<Self, CourseError> {
        let id = raw.into();
        if id.trim().is_empty() {
            return Err(CourseError::BlankId);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A course in the catalog.
///
/// Courses are owned by the caller for the duration of a request; the engine
/// never mutates them.
///
/// # Examples
/// ```
/// use coursewise_core::{Course, CourseId};
///
/// # fn main() -> Result<(), coursewise_core::CourseError> {
/// let course = Course::new(CourseId::new("1")?, "Python", "Intro to Python", 120)
///     .with_title("Python 101");
/// assert_eq!(course.title, "Python 101");
/// assert_eq!(course.enrollment_count, 120);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "CourseRecord")
)]
pub struct Course {
    /// Unique identifier.
    pub id: CourseId,
    /// Display title.
    pub title: String,
    /// Free-text category label, not normalised.
    pub category: String,
    /// Free-text description; may be empty.
    pub description: String,
    /// Number of learners enrolled, used as the popularity signal.
    pub enrollment_count: u64,
}

impl Course {
    /// Construct a course with an empty title.
    #[must_use]
    pub fn new(
        id: CourseId,
        category: impl Into<String>,
        description: impl Into<String>,
        enrollment_count: u64,
    ) -> Self {
        Self {
            id,
            title: String::new(),
            category: category.into(),
            description: description.into(),
            enrollment_count,
        }
    }

    /// Set the display title while returning `self` for chaining.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Identifier as it may appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum RawCourseId {
    /// Textual identifier, e.g. a document id.
    Text(String),
    /// Numeric identifier.
    Number(i64),
}

impl From<RawCourseId> for String {
    fn from(raw: RawCourseId) -> Self {
        match raw {
            RawCourseId::Text(text) => text,
            RawCourseId::Number(number) => number.to_string(),
        }
    }
}

/// Loosely typed course record received from callers.
///
/// Every field is optional so that decoding never fails on a missing key;
/// [`Course::try_from`] then reports exactly which required field is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CourseRecord {
    /// Course identifier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<RawCourseId>,
    /// Display title.
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    /// Category label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Option<String>,
    /// Description text.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    /// Enrollment count.
    #[cfg_attr(feature = "serde", serde(default))]
    pub enrollment_count: Option<i64>,
}

/// Errors raised when a course record is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseError {
    /// A required field was absent.
    #[error("course record is missing required field `{field}`")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
    /// The identifier was empty or whitespace.
    #[error("course identifier must not be blank")]
    BlankId,
    /// The enrollment count was negative.
    #[error("course {course_id} has negative enrollment count {value}")]
    NegativeEnrollment {
        /// Identifier of the offending course.
        course_id: CourseId,
        /// Value found in the record.
        value: i64,
    },
}

impl TryFrom<CourseRecord> for Course {
    type Error = CourseError;

    fn try_from(record: CourseRecord) -> Result<Self, Self::Error> {
        let raw_id = record
            .id
            .ok_or(CourseError::MissingField { field: "id" })?;
        let id = CourseId::new(String::from(raw_id))?;
        let category = record
            .category
            .ok_or(CourseError::MissingField { field: "category" })?;
        let description = record
            .description
            .ok_or(CourseError::MissingField {
                field: "description",
            })?;
        let raw_count = record.enrollment_count.ok_or(CourseError::MissingField {
            field: "enrollment_count",
        })?;
        let enrollment_count =
            u64::try_from(raw_count).map_err(|_| CourseError::NegativeEnrollment {
                course_id: id.clone(),
                value: raw_count,
            })?;
        Ok(Self {
            id,
            title: record.title.unwrap_or_default(),
            category,
            description,
            enrollment_count,
        })
    }
}

impl From<Course> for CourseRecord {
    fn from(course: Course) -> Self {
        Self {
            id: Some(RawCourseId::Text(course.id.0)),
            title: Some(course.title),
            category: Some(course.category),
            description: Some(course.description),
            enrollment_count: i64::try_from(course.enrollment_count).ok(),
        }
    }
}
