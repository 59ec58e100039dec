// ABOUTME: Deploys charts with helm.
// ABOUTME: Runs helm upgrade --install per release, setting image values to built tags.

use async_trait::async_trait;
use tokio::process::Command;

use super::{DeployError, DeployResult, Deployer, run};
use crate::build::BuildResult;
use crate::config::{HelmDeploy, HelmRelease};
use crate::output::Output;
use crate::types::ImageRef;

#[derive(Debug, Clone)]
pub struct HelmDeployer {
    releases: Vec<HelmRelease>,
}

impl HelmDeployer {
    pub fn new(config: &HelmDeploy) -> Self {
        Self {
            releases: config.releases.iter().cloned().collect(),
        }
    }
}

/// Build the `helm upgrade --install` invocation for one release.
fn release_command(release: &HelmRelease, builds: &BuildResult) -> Result<Command, DeployError> {
    let mut command = Command::new("helm");
    command
        .arg("upgrade")
        .arg("--install")
        .arg(release.name.as_str())
        .arg(&release.chart_path);

    if let Some(namespace) = &release.namespace {
        command.arg("--namespace").arg(namespace);
    }
    for file in &release.values_files {
        command.arg("-f").arg(file);
    }
    for (key, image) in &release.values {
        let reference = ImageRef::parse(image)
            .ok()
            .and_then(|parsed| builds.reference_matching(&parsed))
            .ok_or_else(|| DeployError::MissingImage {
                release: release.name.to_string(),
                image: image.clone(),
            })?;
        command.arg("--set").arg(format!("{key}={reference}"));
    }

    Ok(command)
}

#[async_trait]
impl Deployer for HelmDeployer {
    async fn run(&self, output: &mut Output, builds: &BuildResult) -> Result<DeployResult, DeployError> {
        let mut applied = Vec::with_capacity(self.releases.len());

        for release in &self.releases {
            let command = release_command(release, builds)?;
            output.progress(&format!("Deploying release {}...", release.name));
            run(command, None, output).await?;
            applied.push(release.name.to_string());
        }

        Ok(DeployResult::new(applied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BuiltImage;
    use crate::process::describe;
    use crate::types::ReleaseName;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn release(values: &[(&str, &str)]) -> HelmRelease {
        HelmRelease {
            name: ReleaseName::new("web").unwrap(),
            chart_path: PathBuf::from("charts/web"),
            namespace: Some("dev".to_string()),
            values_files: vec![PathBuf::from("values-dev.yaml")],
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn builds() -> BuildResult {
        BuildResult::new(vec![BuiltImage {
            image_name: "ghcr.io/org/web".to_string(),
            reference: ImageRef::parse("ghcr.io/org/web:3f2a").unwrap(),
        }])
    }

    #[test]
    fn sets_built_reference_for_each_value() {
        let command = release_command(&release(&[("image", "ghcr.io/org/web")]), &builds()).unwrap();
        assert_eq!(
            describe(&command),
            "helm upgrade --install web charts/web --namespace dev -f values-dev.yaml --set image=ghcr.io/org/web:3f2a"
        );
    }

    #[test]
    fn value_for_unbuilt_image_is_an_error() {
        let err = release_command(&release(&[("image", "ghcr.io/org/api")]), &builds()).unwrap_err();
        assert!(matches!(err, DeployError::MissingImage { .. }));
    }
}
