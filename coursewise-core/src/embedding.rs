//! Embedding vectors and the model abstraction that produces them.
//!
//! The embedding model is an external collaborator: text goes in, a
//! fixed-length vector comes out. Everything the engine needs from it is
//! captured by [`EmbeddingModel`].

use std::sync::Arc;

use thiserror::Error;

/// Fixed-dimension numeric representation of a course description.
///
/// # Examples
/// ```
/// use coursewise_core::EmbeddingVector;
///
/// let a = EmbeddingVector::new(vec![1.0, 0.0]);
/// let b = EmbeddingVector::new(vec![1.0, 0.0]);
/// assert_eq!(a.cosine_similarity(&b), Some(1.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    /// Wrap raw model output.
    #[expect(
        clippy::missing_const_for_fn,
        reason = "vectors are produced at runtime by the embedding model"
    )]
    #[must_use]
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Number of components.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Borrow the components.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Cosine of the angle between `self` and `other`.
    ///
    /// Returns `None` when the dimensions differ. A zero-length vector has no
    /// direction, so its similarity to anything is `0.0`.
    #[expect(
        clippy::float_arithmetic,
        reason = "cosine similarity is a dot product over vector norms"
    )]
    #[must_use]
    pub fn cosine_similarity(&self, other: &Self) -> Option<f32> {
        if self.dimension() != other.dimension() {
            return None;
        }
        let (dot, left, right) = self.0.iter().zip(&other.0).fold(
            (0.0_f32, 0.0_f32, 0.0_f32),
            |(dot, left, right), (a, b)| (dot + a * b, left + a * a, right + b * b),
        );
        let norm = left.sqrt() * right.sqrt();
        if norm == 0.0_f32 || !norm.is_finite() {
            return Some(0.0_f32);
        }
        Some(dot / norm)
    }
}

impl From<Vec<f32>> for EmbeddingVector {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

/// Errors returned by [`EmbeddingModel::embed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbeddingError {
    /// The model is not loaded, timed out, or inference failed.
    #[error("embedding model unavailable: {reason}")]
    ModelUnavailable {
        /// Human-readable cause.
        reason: String,
    },
    /// The model returned a different number of vectors than texts supplied.
    #[error("embedding model returned {actual} vectors for {expected} texts")]
    BatchSizeMismatch {
        /// Number of texts sent.
        expected: usize,
        /// Number of vectors received.
        actual: usize,
    },
}

impl EmbeddingError {
    /// Convenience constructor for [`EmbeddingError::ModelUnavailable`].
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            reason: reason.into(),
        }
    }
}

/// Turn texts into embedding vectors.
///
/// Implementations return exactly one vector per input text, in input order,
/// all with the same dimension. Models must be `Send + Sync` so a single
/// instance can serve concurrent requests.
///
/// # Examples
///
/// ```rust
/// use coursewise_core::{EmbeddingError, EmbeddingModel, EmbeddingVector};
///
/// struct LengthModel;
///
/// impl EmbeddingModel for LengthModel {
///     fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
///         Ok(texts
///             .iter()
///             .map(|text| EmbeddingVector::new(vec![text.len() as f32, 1.0]))
///             .collect())
///     }
/// }
///
/// let vectors = LengthModel.embed(&["abc"])?;
/// assert_eq!(vectors[0].dimension(), 2);
/// # Ok::<(), EmbeddingError>(())
/// ```
pub trait EmbeddingModel: Send + Sync {
    /// Embed a batch of texts.
    ///
    /// # Errors
    /// Returns [`EmbeddingError::ModelUnavailable`] when the model cannot
    /// serve the request.
    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError>;
}

impl<M: EmbeddingModel + ?Sized> EmbeddingModel for Arc<M> {
    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        (**self).embed(texts)
    }
}

impl<M: EmbeddingModel + ?Sized> EmbeddingModel for Box<M> {
    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        (**self).embed(texts)
    }
}

impl<M: EmbeddingModel + ?Sized> EmbeddingModel for &M {
    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        (**self).embed(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "tests compare floating point values"
    )]
    fn orthogonal_vectors_have_zero_similarity() {
        let a = EmbeddingVector::new(vec![1.0, 0.0]);
        let b = EmbeddingVector::new(vec![0.0, 3.0]);
        let similarity = a.cosine_similarity(&b).expect("same dimension");
        assert!(similarity.abs() < 0.000_1_f32);
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "tests compare floating point values"
    )]
    fn similarity_ignores_magnitude() {
        let a = EmbeddingVector::new(vec![1.0, 2.0, 2.0]);
        let b = EmbeddingVector::new(vec![2.0, 4.0, 4.0]);
        let similarity = a.cosine_similarity(&b).expect("same dimension");
        assert!((similarity - 1.0_f32).abs() < 0.000_1_f32);
    }

    #[rstest]
    fn zero_vector_scores_zero() {
        let a = EmbeddingVector::new(vec![0.0, 0.0]);
        let b = EmbeddingVector::new(vec![1.0, 1.0]);
        assert_eq!(a.cosine_similarity(&b), Some(0.0));
    }

    #[rstest]
    fn dimension_mismatch_yields_none() {
        let a = EmbeddingVector::new(vec![1.0]);
        let b = EmbeddingVector::new(vec![1.0, 0.0]);
        assert!(a.cosine_similarity(&b).is_none());
    }
}
