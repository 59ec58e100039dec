// ABOUTME: Build section of the pipeline config.
// ABOUTME: Tag policy identifier plus the selected build strategy variants.

use serde::Deserialize;

use super::deserialize::deserialize_variant;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildConfig {
    /// Tag policy identifier, validated at resolution time.
    #[serde(default)]
    pub tag_policy: Option<String>,

    #[serde(flatten)]
    pub strategies: BuildSelection,
}

/// Build strategy variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStrategy {
    Local(LocalBuild),
    Custom(CustomBuild),
}

impl BuildStrategy {
    pub fn key(&self) -> &'static str {
        match self {
            BuildStrategy::Local(_) => "local",
            BuildStrategy::Custom(_) => "custom",
        }
    }
}

/// Container CLI used to build, inspect, tag and push images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerCli {
    #[default]
    Docker,
    Podman,
}

impl ContainerCli {
    pub fn program(self) -> &'static str {
        match self {
            ContainerCli::Docker => "docker",
            ContainerCli::Podman => "podman",
        }
    }
}

impl std::fmt::Display for ContainerCli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.program())
    }
}

/// Build with the local docker or podman CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocalBuild {
    #[serde(default)]
    pub runtime: ContainerCli,

    /// Push tagged images to their registry.
    #[serde(default)]
    pub push: bool,
}

/// Build with a user command that produces `$IMAGE` locally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomBuild {
    pub command: String,

    #[serde(default)]
    pub runtime: ContainerCli,

    #[serde(default)]
    pub push: bool,
}

/// Every build variant present in the config, in declaration order.
///
/// Holding all of them lets resolution reject both a missing and an
/// ambiguous selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BuildVariants")]
pub struct BuildSelection(Vec<BuildStrategy>);

impl BuildSelection {
    pub fn new(strategies: Vec<BuildStrategy>) -> Self {
        Self(strategies)
    }

    pub fn as_slice(&self) -> &[BuildStrategy] {
        &self.0
    }
}

impl From<BuildStrategy> for BuildSelection {
    fn from(strategy: BuildStrategy) -> Self {
        Self(vec![strategy])
    }
}

#[derive(Deserialize)]
struct BuildVariants {
    #[serde(default, deserialize_with = "deserialize_variant")]
    local: Option<LocalBuild>,
    #[serde(default, deserialize_with = "deserialize_variant")]
    custom: Option<CustomBuild>,
}

impl From<BuildVariants> for BuildSelection {
    fn from(variants: BuildVariants) -> Self {
        let local = variants.local.map(BuildStrategy::Local);
        let custom = variants.custom.map(BuildStrategy::Custom);
        Self(local.into_iter().chain(custom).collect())
    }
}
