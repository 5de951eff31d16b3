//! Error types emitted by the coursewise CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use coursewise_core::RecommendError;
use coursewise_scorer::RelationGraphError;
use coursewise_summary::SummaryError;
use thiserror::Error;

/// Errors emitted by the coursewise CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Argument name.
        field: &'static str,
        /// Environment variable supplying the argument.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Argument naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Argument naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Argument naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Opening or reading an input file failed.
    #[error("failed to read {path:?}: {source}")]
    ReadInput {
        /// Input path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Recommendation request JSON could not be decoded.
    #[error("failed to parse recommendation request JSON at {path:?}: {source}")]
    ParseRecommendRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The recommendation request failed validation.
    #[error("recommendation request in {path:?} failed validation: {source}")]
    InvalidRecommendRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: RecommendError,
    },
    /// Loading a custom category relation graph failed.
    #[error("failed to load category relations from {path:?}: {source}")]
    LoadRelations {
        /// Relation graph path.
        path: Utf8PathBuf,
        /// Graph error.
        #[source]
        source: RelationGraphError,
    },
    /// The recommender rejected the request.
    #[error("recommendation failed: {0}")]
    Recommend(#[source] RecommendError),
    /// Summarisation could not run with the configured chunk size.
    #[error("summarisation failed: {0}")]
    Summarize(#[from] SummaryError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
