// ABOUTME: Deploy section of the pipeline config.
// ABOUTME: kubectl manifests or helm releases, one selected per pipeline.

use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::deserialize::{deserialize_non_empty, deserialize_release_name, deserialize_variant};
use crate::types::ReleaseName;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeployConfig {
    #[serde(flatten)]
    pub strategies: DeploySelection,
}

/// Deploy strategy variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployStrategy {
    Kubectl(KubectlDeploy),
    Helm(HelmDeploy),
}

impl DeployStrategy {
    pub fn key(&self) -> &'static str {
        match self {
            DeployStrategy::Kubectl(_) => "kubectl",
            DeployStrategy::Helm(_) => "helm",
        }
    }
}

/// Apply plain manifests with `kubectl apply`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KubectlDeploy {
    #[serde(deserialize_with = "deserialize_non_empty")]
    pub manifests: NonEmpty<PathBuf>,

    #[serde(default)]
    pub namespace: Option<String>,
}

/// Install or upgrade charts with `helm upgrade --install`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HelmDeploy {
    #[serde(deserialize_with = "deserialize_non_empty")]
    pub releases: NonEmpty<HelmRelease>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HelmRelease {
    #[serde(deserialize_with = "deserialize_release_name")]
    pub name: ReleaseName,

    pub chart_path: PathBuf,

    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub values_files: Vec<PathBuf>,

    /// Helm value key to artifact image name, set to the built reference.
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// Every deploy variant present in the config, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "DeployVariants")]
pub struct DeploySelection(Vec<DeployStrategy>);

impl DeploySelection {
    pub fn new(strategies: Vec<DeployStrategy>) -> Self {
        Self(strategies)
    }

    pub fn as_slice(&self) -> &[DeployStrategy] {
        &self.0
    }
}

impl From<DeployStrategy> for DeploySelection {
    fn from(strategy: DeployStrategy) -> Self {
        Self(vec![strategy])
    }
}

#[derive(Deserialize)]
struct DeployVariants {
    #[serde(default, deserialize_with = "deserialize_variant")]
    kubectl: Option<KubectlDeploy>,
    #[serde(default, deserialize_with = "deserialize_variant")]
    helm: Option<HelmDeploy>,
}

impl From<DeployVariants> for DeploySelection {
    fn from(variants: DeployVariants) -> Self {
        let kubectl = variants.kubectl.map(DeployStrategy::Kubectl);
        let helm = variants.helm.map(DeployStrategy::Helm);
        Self(kubectl.into_iter().chain(helm).collect())
    }
}
