//! Error types raised by the scoring pipeline and its configuration.
#![forbid(unsafe_code)]

use coursewise_core::EmbeddingError;
use thiserror::Error;

/// Failures of the embedding-dependent scoring path.
///
/// These never reach callers of
/// [`RecommendationEngine`](crate::RecommendationEngine); they select the
/// fallback ranking instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// The embedding model could not produce vectors.
    #[error("embedding lookup failed")]
    Embedding(#[from] EmbeddingError),
    /// Two embeddings with different dimensions were compared.
    #[error("embedding dimension mismatch: expected {expected}, found {actual}")]
    DimensionMismatch {
        /// Dimension of the enrolled-course embedding.
        expected: usize,
        /// Dimension of the candidate embedding.
        actual: usize,
    },
    /// None of the enrolled courses received an embedding.
    #[error("no embeddings available for enrolled courses")]
    MissingEnrolledEmbeddings,
}

/// Errors raised when loading a category relation graph.
#[derive(Debug, Error)]
pub enum RelationGraphError {
    /// The JSON document could not be decoded.
    #[error("failed to decode category relation graph")]
    Decode {
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// An affinity was not a finite value in `0.0..=1.0`.
    #[error("affinity {value} from `{category}` to `{related}` must lie within 0.0..=1.0")]
    InvalidAffinity {
        /// Category the relation starts from.
        category: String,
        /// Related category.
        related: String,
        /// Offending affinity.
        value: f32,
    },
    /// A category name normalised to the empty string.
    #[error("category names must not be blank")]
    BlankCategory,
}

/// Errors raised when validating engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Score weights were unusable.
    #[error("weights must be finite, non-negative and sum to a positive value")]
    InvalidWeights,
    /// The diversity relevance threshold was outside `0.0..=1.0`.
    #[error("diversity relevance threshold must lie within 0.0..=1.0")]
    InvalidThreshold,
    /// The partial-match discount was outside `0.0..=1.0`.
    #[error("partial match discount must lie within 0.0..=1.0")]
    InvalidDiscount,
}
