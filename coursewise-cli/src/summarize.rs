//! Summarize command implementation for the coursewise CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use coursewise_summary::{
    DEFAULT_MAX_CHUNK_SIZE, LeadSentenceSummarizer, Summarizer, chunked_summarize,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_SUMMARIZE_INPUT, ARG_SUMMARIZE_MAX_CHUNK_SIZE, CliError, ENV_SUMMARIZE_INPUT,
    require_file,
};

/// CLI arguments for the `summarize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Summarise a UTF-8 text file. Long files are split into \
                 overlapping windows that are summarised separately and then \
                 condensed.",
    about = "Summarise course material"
)]
#[ortho_config(prefix = "COURSEWISE")]
pub(crate) struct SummarizeArgs {
    /// Path to the text file.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input_path: Option<Utf8PathBuf>,
    /// Window size in characters.
    #[arg(long = ARG_SUMMARIZE_MAX_CHUNK_SIZE, value_name = "chars")]
    #[serde(default)]
    pub(crate) max_chunk_size: Option<usize>,
}

/// Resolved `summarize` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SummarizeConfig {
    /// Path to the text file.
    pub(crate) input_path: Utf8PathBuf,
    /// Window size in characters.
    pub(crate) max_chunk_size: usize,
}

impl TryFrom<SummarizeArgs> for SummarizeConfig {
    type Error = CliError;

    fn try_from(args: SummarizeArgs) -> Result<Self, Self::Error> {
        let input_path = args.input_path.ok_or(CliError::MissingArgument {
            field: ARG_SUMMARIZE_INPUT,
            env: ENV_SUMMARIZE_INPUT,
        })?;
        Ok(Self {
            input_path,
            max_chunk_size: args.max_chunk_size.unwrap_or(DEFAULT_MAX_CHUNK_SIZE),
        })
    }
}

pub(crate) fn run_summarize(args: SummarizeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_summarize_with(args, &LeadSentenceSummarizer::default(), &mut stdout)
}

pub(crate) fn run_summarize_with(
    args: SummarizeArgs,
    summarizer: &dyn Summarizer,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = SummarizeConfig::try_from(merged)?;
    require_file(&config.input_path, ARG_SUMMARIZE_INPUT)?;
    let text = read_text(&config.input_path)?;
    let summary = chunked_summarize(
        &text,
        |chunk| summarizer.summarize(chunk),
        config.max_chunk_size,
    )?;
    writeln!(writer, "{summary}").map_err(CliError::WriteOutput)
}

fn read_text(path: &Utf8Path) -> Result<String, CliError> {
    coursewise_fs::read_utf8_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}
