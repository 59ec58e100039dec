// ABOUTME: Build strategies that turn artifacts into tagged images.
// ABOUTME: Exposes the Builder trait, BuildResult and BuildError.

mod custom;
mod engine;
mod local;

pub use custom::CustomBuilder;
pub use local::LocalBuilder;

use async_trait::async_trait;
use std::io;
use std::process::ExitStatus;

use crate::output::Output;
use crate::tag::{TagError, Tagger};
use crate::types::ImageRef;

/// Builds every artifact it was configured with, once per call.
#[async_trait]
pub trait Builder: Send + Sync {
    async fn run(&self, output: &mut Output, tagger: &dyn Tagger) -> Result<BuildResult, BuildError>;
}

/// One artifact's build outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltImage {
    /// Artifact repository, e.g. `ghcr.io/org/app`.
    pub image_name: String,
    /// Fully tagged reference that was produced.
    pub reference: ImageRef,
}

/// Images produced by a single build. Never merged with another cycle's result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResult {
    builds: Vec<BuiltImage>,
}

impl BuildResult {
    pub fn new(builds: Vec<BuiltImage>) -> Self {
        Self { builds }
    }

    pub fn builds(&self) -> &[BuiltImage] {
        &self.builds
    }

    /// Tagged reference built for `image_name`, if any.
    pub fn reference_for(&self, image_name: &str) -> Option<&ImageRef> {
        self.builds
            .iter()
            .find(|b| b.image_name == image_name)
            .map(|b| &b.reference)
    }

    /// Tagged reference built for the same repository as `image`, ignoring its tag.
    pub fn reference_matching(&self, image: &ImageRef) -> Option<&ImageRef> {
        self.builds
            .iter()
            .find(|b| b.reference.same_repository(image))
            .map(|b| &b.reference)
    }

    pub fn len(&self) -> usize {
        self.builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }
}

/// Errors from build strategies.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("`{command}` exited with {status}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("failed to run `{command}`: {source}")]
    Spawn { command: String, source: io::Error },

    #[error("invalid build path for {image}: {source}")]
    Path { image: String, source: io::Error },

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error("{0}")]
    Failed(String),
}
