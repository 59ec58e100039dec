// ABOUTME: A single buildable and deployable unit.
// ABOUTME: Couples an image name with its build context and Dockerfile.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use super::deserialize::deserialize_image_ref;
use crate::types::ImageRef;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Artifact {
    /// Image to produce. Any tag given here is replaced at build time.
    #[serde(deserialize_with = "deserialize_image_ref")]
    pub image: ImageRef,

    /// Build context directory.
    #[serde(default = "default_context")]
    pub context: PathBuf,

    /// Dockerfile, relative to the context unless absolute.
    #[serde(default = "default_dockerfile")]
    pub dockerfile: PathBuf,

    #[serde(default)]
    pub build_args: BTreeMap<String, String>,
}

fn default_context() -> PathBuf {
    PathBuf::from(".")
}

fn default_dockerfile() -> PathBuf {
    PathBuf::from("Dockerfile")
}

impl Artifact {
    pub fn new(image: ImageRef) -> Self {
        Self {
            image,
            context: default_context(),
            dockerfile: default_dockerfile(),
            build_args: BTreeMap::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<PathBuf>) -> Self {
        self.context = context.into();
        self
    }

    /// Repository the artifact is built into, e.g. `ghcr.io/org/app`.
    pub fn image_name(&self) -> String {
        self.image.repository()
    }

    /// Absolute path to the Dockerfile.
    pub fn dockerfile_path(&self) -> io::Result<PathBuf> {
        normalize_dockerfile_path(&self.context, &self.dockerfile)
    }
}

/// Absolute paths are kept; relative ones not already under `context` are joined onto it.
pub fn normalize_dockerfile_path(context: &Path, dockerfile: &Path) -> io::Result<PathBuf> {
    if dockerfile.is_absolute() {
        return Ok(dockerfile.to_path_buf());
    }

    let joined = if dockerfile.starts_with(context) {
        dockerfile.to_path_buf()
    } else {
        context.join(dockerfile)
    };
    std::path::absolute(joined)
}
