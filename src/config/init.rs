// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates keelson.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ImageRef;

use super::{CONFIG_FILENAME, DeployStrategy, PipelineConfig};

pub fn init_config(dir: &Path, image: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = PipelineConfig::template();

    if let Some(i) = image {
        let image = ImageRef::parse(i).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.artifacts[0].image = image;
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &PipelineConfig) -> String {
    let artifact = &config.artifacts[0];
    let manifest = match config.deploy.strategies.as_slice() {
        [DeployStrategy::Kubectl(kubectl)] => kubectl.manifests.first().display().to_string(),
        _ => "k8s/deployment.yaml".to_string(),
    };
    format!(
        r#"artifacts:
  - image: {}
    context: {}
    dockerfile: {}

build:
  # Tag policy: sha256 (image digest) or dateTime (UTC build time)
  tag_policy: {}
  local:
    runtime: docker
    push: false

deploy:
  kubectl:
    manifests:
      - {}

watch:
  debounce: {}ms
"#,
        artifact.image_name(),
        artifact.context.display(),
        artifact.dockerfile.display(),
        config.build.tag_policy.as_deref().unwrap_or("sha256"),
        manifest,
        config.watch.debounce.as_millis(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::plan;

    #[test]
    fn generated_template_parses_and_resolves() {
        let yaml = generate_template_yaml(&PipelineConfig::template());
        let config = PipelineConfig::from_yaml(&yaml).unwrap();

        assert_eq!(config.artifacts.len(), 1);
        assert!(plan(&config).is_ok());
    }
}
