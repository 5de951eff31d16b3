//! Command-line interface for the coursewise recommendation engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod recommend;
mod summarize;

pub use error::CliError;

use recommend::{RecommendArgs, run_recommend};
use summarize::{SummarizeArgs, run_summarize};

const ARG_RECOMMEND_REQUEST: &str = "request";
const ARG_RECOMMEND_TOP_N: &str = "top-n";
const ARG_RECOMMEND_RELATIONS: &str = "relations";
const ARG_RECOMMEND_MODEL: &str = "model";
const ARG_RECOMMEND_MODEL_TIMEOUT_MS: &str = "model-timeout-ms";
const ARG_RECOMMEND_EXPLAIN: &str = "explain";
const ENV_RECOMMEND_REQUEST: &str = "COURSEWISE_CMDS_RECOMMEND_REQUEST_PATH";

const ARG_SUMMARIZE_INPUT: &str = "input";
const ARG_SUMMARIZE_MAX_CHUNK_SIZE: &str = "max-chunk-size";
const ENV_SUMMARIZE_INPUT: &str = "COURSEWISE_CMDS_SUMMARIZE_INPUT_PATH";

/// Run the coursewise CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, inputs
/// cannot be read or decoded, or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Recommend(args) => run_recommend(args),
        Command::Summarize(args) => run_summarize(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "coursewise",
    about = "Course recommendations and summaries from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recommend catalog courses for a learner.
    Recommend(RecommendArgs),
    /// Summarise a text file.
    Summarize(SummarizeArgs),
}

/// Classify a path as an existing regular file.
fn require_file(path: &camino::Utf8Path, field: &'static str) -> Result<(), CliError> {
    match coursewise_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
