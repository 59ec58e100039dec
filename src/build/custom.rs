// ABOUTME: Builds artifacts with a user-supplied shell command.
// ABOUTME: The command must produce $IMAGE locally; tagging is shared with local builds.

use async_trait::async_trait;
use tokio::process::Command;

use super::engine::{self, Engine};
use super::{BuildError, BuildResult, Builder};
use crate::config::{Artifact, CustomBuild};
use crate::output::Output;
use crate::tag::Tagger;

#[derive(Debug, Clone)]
pub struct CustomBuilder {
    artifacts: Vec<Artifact>,
    command: String,
    engine: Engine,
}

impl CustomBuilder {
    pub fn new(config: &CustomBuild, artifacts: Vec<Artifact>) -> Self {
        Self {
            artifacts,
            command: config.command.clone(),
            engine: Engine::new(config.runtime, config.push),
        }
    }
}

#[async_trait]
impl Builder for CustomBuilder {
    async fn run(&self, output: &mut Output, tagger: &dyn Tagger) -> Result<BuildResult, BuildError> {
        let mut builds = Vec::with_capacity(self.artifacts.len());

        for artifact in &self.artifacts {
            let image_name = artifact.image_name();
            output.progress(&format!("Building {} with `{}`...", image_name, self.command));

            let context = std::path::absolute(&artifact.context).map_err(|source| {
                BuildError::Path {
                    image: image_name.clone(),
                    source,
                }
            })?;

            let mut command = Command::new("sh");
            command
                .arg("-c")
                .arg(&self.command)
                .current_dir(&context)
                .env("IMAGE", &image_name)
                .env("BUILD_CONTEXT", &context);

            engine::run(command, output).await?;
            builds.push(self.engine.finish(artifact, tagger, output).await?);
        }

        Ok(BuildResult::new(builds))
    }
}
