// ABOUTME: Deploys plain manifests with kubectl.
// ABOUTME: Renders built image tags into the manifests and pipes them to kubectl apply.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

use super::{DeployError, DeployResult, Deployer, render_manifests, run};
use crate::build::BuildResult;
use crate::config::KubectlDeploy;
use crate::output::Output;

#[derive(Debug, Clone)]
pub struct KubectlDeployer {
    manifests: Vec<PathBuf>,
    namespace: Option<String>,
}

impl KubectlDeployer {
    pub fn new(config: &KubectlDeploy) -> Self {
        Self {
            manifests: config.manifests.iter().cloned().collect(),
            namespace: config.namespace.clone(),
        }
    }
}

#[async_trait]
impl Deployer for KubectlDeployer {
    async fn run(&self, output: &mut Output, builds: &BuildResult) -> Result<DeployResult, DeployError> {
        let mut documents = Vec::with_capacity(self.manifests.len());

        for path in &self.manifests {
            let source = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| DeployError::Manifest {
                    path: path.clone(),
                    source,
                })?;
            let rendered = render_manifests(&source, builds).map_err(|source| DeployError::Render {
                path: path.clone(),
                source,
            })?;
            if !rendered.is_empty() {
                documents.push(rendered);
            }
        }

        if documents.is_empty() {
            tracing::warn!("Manifests rendered no documents, skipping kubectl apply");
            output.warning("manifests contain no documents, nothing to apply");
            return Ok(DeployResult::default());
        }

        output.progress(&format!("Applying {} manifest(s)...", self.manifests.len()));

        let mut command = Command::new("kubectl");
        if let Some(namespace) = &self.namespace {
            command.arg("--namespace").arg(namespace);
        }
        command.args(["apply", "-f", "-"]);
        run(command, Some(documents.join("---\n").into_bytes()), output).await?;

        Ok(DeployResult::new(
            self.manifests
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        ))
    }
}
