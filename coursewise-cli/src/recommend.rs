//! Recommend command implementation for the coursewise CLI.

use std::io::{BufReader, Write};
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use coursewise_core::{
    CandidateScore, CourseRecord, RankingSource, RecommendPayload, RecommendRequest, Recommender,
};
use coursewise_fs::open_utf8_file;
use coursewise_scorer::{
    CategoryRelationGraph, DeadlineModel, HashingEmbedder, RecommendationEngine, UnavailableModel,
};
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_RECOMMEND_EXPLAIN, ARG_RECOMMEND_MODEL, ARG_RECOMMEND_MODEL_TIMEOUT_MS,
    ARG_RECOMMEND_RELATIONS, ARG_RECOMMEND_REQUEST, ARG_RECOMMEND_TOP_N, CliError,
    ENV_RECOMMEND_REQUEST, require_file,
};

/// Embedding backend used for semantic scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ModelKind {
    /// Offline feature-hashing embedder.
    #[default]
    Hashing,
    /// No model; every request uses the fallback ranking.
    None,
}

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Recommend courses for a learner. The request is a JSON file \
                 with `enrolled_courses`, `all_courses` and an optional \
                 `top_n`. Options can come from CLI flags, configuration \
                 files, or environment variables.",
    about = "Recommend courses from a JSON request"
)]
#[ortho_config(prefix = "COURSEWISE")]
pub(crate) struct RecommendArgs {
    /// Path to a JSON file containing the recommendation request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Number of recommendations, overriding the request's `top_n`.
    #[arg(long = ARG_RECOMMEND_TOP_N, value_name = "count")]
    #[serde(default)]
    pub(crate) top_n: Option<usize>,
    /// JSON file with a custom category relation graph.
    #[arg(long = ARG_RECOMMEND_RELATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) relations: Option<Utf8PathBuf>,
    /// Embedding backend.
    #[arg(long = ARG_RECOMMEND_MODEL, value_enum)]
    #[serde(default)]
    pub(crate) model: Option<ModelKind>,
    /// Abandon embedding batches slower than this many milliseconds.
    #[arg(long = ARG_RECOMMEND_MODEL_TIMEOUT_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) model_timeout_ms: Option<u64>,
    /// Include per-candidate score breakdowns in the output.
    #[arg(long = ARG_RECOMMEND_EXPLAIN)]
    #[serde(default)]
    pub(crate) explain: bool,
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendConfig::try_from(merged)
    }
}

/// Resolved `recommend` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecommendConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Override for the request's `top_n`.
    pub(crate) top_n: Option<usize>,
    /// Custom relation graph, or the built-in one when absent.
    pub(crate) relations: Option<Utf8PathBuf>,
    /// Embedding backend.
    pub(crate) model: ModelKind,
    /// Per-batch embedding deadline.
    pub(crate) model_timeout: Option<Duration>,
    /// Whether to print score breakdowns.
    pub(crate) explain: bool,
}

impl RecommendConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_file(&self.request_path, ARG_RECOMMEND_REQUEST)?;
        if let Some(relations) = &self.relations {
            require_file(relations, ARG_RECOMMEND_RELATIONS)?;
        }
        Ok(())
    }
}

impl TryFrom<RecommendArgs> for RecommendConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_RECOMMEND_REQUEST,
            env: ENV_RECOMMEND_REQUEST,
        })?;
        Ok(Self {
            request_path,
            top_n: args.top_n,
            relations: args.relations,
            model: args.model.unwrap_or_default(),
            model_timeout: args.model_timeout_ms.map(Duration::from_millis),
            explain: args.explain,
        })
    }
}

/// Builds the recommender for the current invocation.
pub(crate) trait RecommenderBuilder {
    fn build(&self, config: &RecommendConfig) -> Result<Box<dyn Recommender>, CliError>;
}

pub(crate) struct DefaultRecommenderBuilder;

impl RecommenderBuilder for DefaultRecommenderBuilder {
    fn build(&self, config: &RecommendConfig) -> Result<Box<dyn Recommender>, CliError> {
        let graph = Arc::new(match &config.relations {
            Some(path) => load_relations(path)?,
            None => CategoryRelationGraph::default(),
        });
        let recommender: Box<dyn Recommender> = match (config.model, config.model_timeout) {
            (ModelKind::Hashing, Some(timeout)) => Box::new(
                RecommendationEngine::new(DeadlineModel::new(HashingEmbedder::default(), timeout))
                    .with_graph(graph),
            ),
            (ModelKind::Hashing, None) => {
                Box::new(RecommendationEngine::new(HashingEmbedder::default()).with_graph(graph))
            }
            (ModelKind::None, _) => Box::new(
                RecommendationEngine::new(UnavailableModel::new("embedding model disabled"))
                    .with_graph(graph),
            ),
        };
        Ok(recommender)
    }
}

/// JSON shape printed by the `recommend` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RecommendOutput {
    pub(crate) success: bool,
    /// Full course records in ranked order.
    pub(crate) recommendations: Vec<CourseRecord>,
    pub(crate) count: usize,
    pub(crate) source: RankingSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) scores: Option<Vec<CandidateScore>>,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_recommend_with(args, &DefaultRecommenderBuilder, &mut stdout)
}

pub(crate) fn run_recommend_with(
    args: RecommendArgs,
    builder: &dyn RecommenderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let output = execute_recommend(args, builder)?;
    write_output(writer, &output)
}

fn execute_recommend(
    args: RecommendArgs,
    builder: &dyn RecommenderBuilder,
) -> Result<RecommendOutput, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let request = load_recommend_request(&config.request_path, config.top_n)?;
    let recommender = builder.build(&config)?;
    let response = recommender.recommend(&request).map_err(CliError::Recommend)?;
    debug!(
        "{} recommendations from the {:?} ranking",
        response.course_ids.len(),
        response.source
    );

    let recommendations: Vec<CourseRecord> = response
        .courses(&request.catalog)
        .into_iter()
        .cloned()
        .map(CourseRecord::from)
        .collect();
    Ok(RecommendOutput {
        success: true,
        count: recommendations.len(),
        recommendations,
        source: response.source,
        scores: config.explain.then_some(response.scores),
    })
}

/// Load and validate a JSON-encoded recommendation request, applying an
/// optional `top_n` override before validation.
pub(crate) fn load_recommend_request(
    path: &Utf8Path,
    top_n: Option<usize>,
) -> Result<RecommendRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let mut payload: RecommendPayload = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| CliError::ParseRecommendRequest {
            path: path.to_path_buf(),
            source,
        })?;
    if top_n.is_some() {
        payload.top_n = top_n;
    }
    RecommendRequest::try_from(payload).map_err(|source| CliError::InvalidRecommendRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn load_relations(path: &Utf8Path) -> Result<CategoryRelationGraph, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    CategoryRelationGraph::from_json_reader(BufReader::new(file)).map_err(|source| {
        CliError::LoadRelations {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn write_output(writer: &mut dyn Write, output: &RecommendOutput) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(output).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RecommendConfig, CliError> {
    let merged = RecommendArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RecommendConfig::try_from(merged)
}
