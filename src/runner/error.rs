// ABOUTME: Error types for strategy resolution and pipeline execution.
// ABOUTME: Pipeline errors carry the phase they came from, using the SNAFU pattern.

use snafu::Snafu;
use std::fmt;

use crate::build::BuildError;
use crate::deploy::DeployError;
use crate::tag::UnknownTagPolicy;
use crate::watch::WatchError;

/// The config does not select a usable set of strategies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no build strategy configured (expected one of: local, custom)")]
    MissingBuildStrategy,

    #[error("ambiguous build strategy: {} are all set, expected exactly one", .0.join(", "))]
    AmbiguousBuildStrategy(Vec<&'static str>),

    #[error("no tag policy configured (expected one of: sha256, dateTime)")]
    MissingTagPolicy,

    #[error(transparent)]
    UnknownTagPolicy(#[from] UnknownTagPolicy),

    #[error("no deploy strategy configured (expected one of: kubectl, helm)")]
    MissingDeployStrategy,

    #[error("ambiguous deploy strategy: {} are all set, expected exactly one", .0.join(", "))]
    AmbiguousDeployStrategy(Vec<&'static str>),
}

/// Failure of one phase of a pipeline run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PipelineError {
    #[snafu(display("build failed: {source}"))]
    Build { source: BuildError },

    #[snafu(display("deploy failed: {source}"))]
    Deploy { source: DeployError },

    #[snafu(display("watch failed: {source}"))]
    Watch { source: WatchError },
}

/// Pipeline phase, for telling failures apart without inspecting their source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Build,
    Deploy,
    Watch,
}

impl PipelineError {
    pub fn phase(&self) -> Phase {
        match self {
            PipelineError::Build { .. } => Phase::Build,
            PipelineError::Deploy { .. } => Phase::Deploy,
            PipelineError::Watch { .. } => Phase::Watch,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Build => write!(f, "build"),
            Phase::Deploy => write!(f, "deploy"),
            Phase::Watch => write!(f, "watch"),
        }
    }
}
