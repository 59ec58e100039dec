// ABOUTME: Configuration types and parsing for keelson.yml.
// ABOUTME: Handles YAML parsing, discovery, and the watch section defaults.

mod artifact;
mod build;
mod deploy;
mod deserialize;
mod init;

pub use artifact::{Artifact, normalize_dockerfile_path};
pub use build::{BuildConfig, BuildSelection, BuildStrategy, ContainerCli, CustomBuild, LocalBuild};
pub use deploy::{
    DeployConfig, DeploySelection, DeployStrategy, HelmDeploy, HelmRelease, KubectlDeploy,
};
pub use init::init_config;

use crate::error::{Error, Result};
use crate::types::ImageRef;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "keelson.yml";
pub const CONFIG_FILENAME_ALT: &str = "keelson.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".keelson/config.yml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub artifacts: Vec<Artifact>,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    /// Set by the caller (`run` vs `dev`), never read from the file.
    #[serde(skip)]
    pub continuous: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Quiet period that closes a batch of changes.
    #[serde(default = "default_debounce", with = "humantime_serde")]
    pub debounce: Duration,

    /// Path components whose changes never trigger a rebuild.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

fn default_debounce() -> Duration {
    Duration::from_millis(500)
}

fn default_ignore() -> Vec<String> {
    vec![".git".to_string()]
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            debounce: default_debounce(),
            ignore: default_ignore(),
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Locate the config file in `dir`.
    pub fn find(dir: &Path) -> Result<PathBuf> {
        [CONFIG_FILENAME, CONFIG_FILENAME_ALT, CONFIG_FILENAME_DIR]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .ok_or_else(|| Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        Self::load(&Self::find(dir)?)
    }

    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    pub fn template() -> Self {
        PipelineConfig {
            artifacts: vec![Artifact::new(
                ImageRef::parse("my-registry/my-app").expect("template image is valid"),
            )],
            build: BuildConfig {
                tag_policy: Some("sha256".to_string()),
                strategies: BuildStrategy::Local(LocalBuild::default()).into(),
            },
            deploy: DeployConfig {
                strategies: DeployStrategy::Kubectl(KubectlDeploy {
                    manifests: NonEmpty::new(PathBuf::from("k8s/deployment.yaml")),
                    namespace: None,
                })
                .into(),
            },
            watch: WatchConfig::default(),
            continuous: false,
        }
    }
}
