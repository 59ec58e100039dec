// ABOUTME: Container CLI steps shared by the build strategies.
// ABOUTME: Runs commands, reads image IDs, then tags and pushes built images.

use tokio::process::Command;

use super::{BuildError, BuiltImage};
use crate::config::{Artifact, ContainerCli};
use crate::output::Output;
use crate::process;
use crate::tag::{TagOptions, Tagger};

/// Run a build step, failing on a non-zero exit.
pub(crate) async fn run(command: Command, output: &mut Output) -> Result<(), BuildError> {
    let label = process::describe(&command);
    let status = process::stream(command, None, output)
        .await
        .map_err(|source| BuildError::Spawn {
            command: label.clone(),
            source,
        })?;

    if !status.success() {
        return Err(BuildError::CommandFailed {
            command: label,
            status,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Engine {
    cli: ContainerCli,
    push: bool,
}

impl Engine {
    pub(crate) fn new(cli: ContainerCli, push: bool) -> Self {
        Self { cli, push }
    }

    pub(crate) fn command(&self) -> Command {
        Command::new(self.cli.program())
    }

    /// Tag (and optionally push) the image just built for `artifact`.
    pub(crate) async fn finish(
        &self,
        artifact: &Artifact,
        tagger: &dyn Tagger,
        output: &mut Output,
    ) -> Result<BuiltImage, BuildError> {
        let image_name = artifact.image_name();
        let digest = self.image_id(&image_name).await?;
        let tag = tagger.generate_tag(&TagOptions {
            image_name: &image_name,
            digest: &digest,
        })?;
        let reference = artifact.image.with_tag(tag);

        output.progress(&format!("  → Tagging {}", reference));
        let mut tag_cmd = self.command();
        tag_cmd.arg("tag").arg(&image_name).arg(reference.to_string());
        run(tag_cmd, output).await?;

        if self.push {
            output.progress(&format!("  → Pushing {}", reference));
            let mut push_cmd = self.command();
            push_cmd.arg("push").arg(reference.to_string());
            run(push_cmd, output).await?;
        }

        tracing::info!(image = %image_name, reference = %reference, "Built image");
        Ok(BuiltImage {
            image_name,
            reference,
        })
    }

    async fn image_id(&self, image_name: &str) -> Result<String, BuildError> {
        let mut command = self.command();
        command
            .args(["image", "inspect", "--format", "{{.Id}}"])
            .arg(image_name);
        let label = process::describe(&command);

        let (status, stdout) =
            process::capture(command)
                .await
                .map_err(|source| BuildError::Spawn {
                    command: label.clone(),
                    source,
                })?;

        if !status.success() {
            return Err(BuildError::CommandFailed {
                command: label,
                status,
            });
        }
        Ok(stdout.trim().to_string())
    }
}
