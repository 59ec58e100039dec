// ABOUTME: Resolves a pipeline config into concrete build, tag and deploy strategies.
// ABOUTME: Selection is validated up front so nothing is built from a bad config.

use crate::build::{Builder, CustomBuilder, LocalBuilder};
use crate::config::{Artifact, BuildStrategy, DeployStrategy, PipelineConfig};
use crate::deploy::{Deployer, HelmDeployer, KubectlDeployer};
use crate::tag::{TagPolicy, Tagger};

use super::ConfigurationError;

/// The validated strategy selection of a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub build: BuildStrategy,
    pub tag: TagPolicy,
    pub deploy: DeployStrategy,
}

/// One instance of each pluggable strategy.
pub struct Strategies {
    pub builder: Box<dyn Builder>,
    pub tagger: Box<dyn Tagger>,
    pub deployer: Box<dyn Deployer>,
}

/// Validate the strategy selection without instantiating anything.
///
/// # Errors
///
/// Returns the first `ConfigurationError` found, checking the build strategy,
/// then the tag policy, then the deploy strategy.
pub fn plan(config: &PipelineConfig) -> Result<Plan, ConfigurationError> {
    let build = match config.build.strategies.as_slice() {
        [] => return Err(ConfigurationError::MissingBuildStrategy),
        [only] => only.clone(),
        many => {
            return Err(ConfigurationError::AmbiguousBuildStrategy(
                many.iter().map(BuildStrategy::key).collect(),
            ));
        }
    };

    let tag = config
        .build
        .tag_policy
        .as_deref()
        .ok_or(ConfigurationError::MissingTagPolicy)?
        .parse::<TagPolicy>()?;

    let deploy = match config.deploy.strategies.as_slice() {
        [] => return Err(ConfigurationError::MissingDeployStrategy),
        [only] => only.clone(),
        many => {
            return Err(ConfigurationError::AmbiguousDeployStrategy(
                many.iter().map(DeployStrategy::key).collect(),
            ));
        }
    };

    Ok(Plan { build, tag, deploy })
}

impl Plan {
    pub fn instantiate(&self, artifacts: &[Artifact]) -> Strategies {
        let builder: Box<dyn Builder> = match &self.build {
            BuildStrategy::Local(local) => Box::new(LocalBuilder::new(local, artifacts.to_vec())),
            BuildStrategy::Custom(custom) => {
                Box::new(CustomBuilder::new(custom, artifacts.to_vec()))
            }
        };

        let deployer: Box<dyn Deployer> = match &self.deploy {
            DeployStrategy::Kubectl(kubectl) => Box::new(KubectlDeployer::new(kubectl)),
            DeployStrategy::Helm(helm) => Box::new(HelmDeployer::new(helm)),
        };

        Strategies {
            builder,
            tagger: self.tag.tagger(),
            deployer,
        }
    }
}

/// Resolve all strategies, or none.
pub fn resolve(config: &PipelineConfig) -> Result<Strategies, ConfigurationError> {
    let plan = plan(config)?;
    tracing::debug!(
        build = plan.build.key(),
        tag = %plan.tag,
        deploy = plan.deploy.key(),
        "Resolved pipeline strategies"
    );
    Ok(plan.instantiate(&config.artifacts))
}
