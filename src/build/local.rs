// ABOUTME: Builds artifacts with the local docker or podman CLI.
// ABOUTME: build, inspect, tag and optionally push, one artifact at a time.

use async_trait::async_trait;

use super::engine::{self, Engine};
use super::{BuildError, BuildResult, Builder};
use crate::config::{Artifact, LocalBuild};
use crate::output::Output;
use crate::tag::Tagger;

#[derive(Debug, Clone)]
pub struct LocalBuilder {
    artifacts: Vec<Artifact>,
    engine: Engine,
}

impl LocalBuilder {
    pub fn new(config: &LocalBuild, artifacts: Vec<Artifact>) -> Self {
        Self {
            artifacts,
            engine: Engine::new(config.runtime, config.push),
        }
    }
}

#[async_trait]
impl Builder for LocalBuilder {
    async fn run(&self, output: &mut Output, tagger: &dyn Tagger) -> Result<BuildResult, BuildError> {
        let mut builds = Vec::with_capacity(self.artifacts.len());

        for artifact in &self.artifacts {
            let image_name = artifact.image_name();
            output.progress(&format!("Building {}...", image_name));

            let dockerfile = artifact
                .dockerfile_path()
                .map_err(|source| BuildError::Path {
                    image: image_name.clone(),
                    source,
                })?;

            let mut command = self.engine.command();
            command
                .arg("build")
                .arg("-t")
                .arg(&image_name)
                .arg("-f")
                .arg(&dockerfile);
            for (key, value) in &artifact.build_args {
                command.arg("--build-arg").arg(format!("{key}={value}"));
            }
            command.arg(&artifact.context);

            engine::run(command, output).await?;
            builds.push(self.engine.finish(artifact, tagger, output).await?);
        }

        Ok(BuildResult::new(builds))
    }
}
