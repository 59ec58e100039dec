// ABOUTME: Deploy strategies that apply built images to a cluster.
// ABOUTME: Exposes the Deployer trait, DeployResult and DeployError.

mod helm;
mod kubectl;
mod manifest;

pub use helm::HelmDeployer;
pub use kubectl::KubectlDeployer;
pub use manifest::render_manifests;

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use tokio::process::Command;

use crate::build::BuildResult;
use crate::output::Output;
use crate::process;

/// Applies one cycle's build result.
#[async_trait]
pub trait Deployer: Send + Sync {
    async fn run(&self, output: &mut Output, builds: &BuildResult) -> Result<DeployResult, DeployError>;
}

/// What a deploy applied. Not kept beyond the cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployResult {
    /// Manifest paths or release names, in the order they were applied.
    pub applied: Vec<String>,
}

impl DeployResult {
    pub fn new(applied: Vec<String>) -> Self {
        Self { applied }
    }
}

/// Errors from deploy strategies.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("failed to read manifest {}: {source}", path.display())]
    Manifest { path: PathBuf, source: io::Error },

    #[error("invalid manifest {}: {source}", path.display())]
    Render {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("release {release} sets image {image}, which was not built")]
    MissingImage { release: String, image: String },

    #[error("`{command}` exited with {status}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("failed to run `{command}`: {source}")]
    Spawn { command: String, source: io::Error },

    #[error("{0}")]
    Failed(String),
}

async fn run(command: Command, stdin: Option<Vec<u8>>, output: &mut Output) -> Result<(), DeployError> {
    let label = process::describe(&command);
    let status = process::stream(command, stdin, output)
        .await
        .map_err(|source| DeployError::Spawn {
            command: label.clone(),
            source,
        })?;

    if !status.success() {
        return Err(DeployError::CommandFailed {
            command: label,
            status,
        });
    }
    Ok(())
}
