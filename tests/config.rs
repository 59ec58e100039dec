// ABOUTME: Integration tests for configuration parsing and discovery.
// ABOUTME: Tests YAML parsing, variant selection, defaults and validation errors.

use keelson::config::*;
use std::path::PathBuf;
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn parse_full_config() {
        let yaml = r#"
artifacts:
  - image: ghcr.io/org/web
    context: web
    dockerfile: docker/Dockerfile.dev
    build_args:
      RUST_LOG: debug
  - image: api:dev

build:
  tag_policy: sha256
  local:
    runtime: podman
    push: true

deploy:
  kubectl:
    namespace: dev
    manifests:
      - k8s/web.yaml
      - k8s/api.yaml

watch:
  debounce: 2s
  ignore: [.git, target]
"#;
        let config = PipelineConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.artifacts.len(), 2);
        let web = &config.artifacts[0];
        assert_eq!(web.image_name(), "ghcr.io/org/web");
        assert_eq!(web.context, PathBuf::from("web"));
        assert_eq!(web.build_args.get("RUST_LOG").map(String::as_str), Some("debug"));
        assert_eq!(config.artifacts[1].image_name(), "api");
        assert_eq!(config.artifacts[1].context, PathBuf::from("."));

        assert_eq!(config.build.tag_policy.as_deref(), Some("sha256"));
        match config.build.strategies.as_slice() {
            [BuildStrategy::Local(local)] => {
                assert_eq!(local.runtime, ContainerCli::Podman);
                assert!(local.push);
            }
            other => panic!("expected local build, got {other:?}"),
        }

        match config.deploy.strategies.as_slice() {
            [DeployStrategy::Kubectl(kubectl)] => {
                assert_eq!(kubectl.namespace.as_deref(), Some("dev"));
                assert_eq!(kubectl.manifests.len(), 2);
            }
            other => panic!("expected kubectl deploy, got {other:?}"),
        }

        assert_eq!(config.watch.debounce, Duration::from_secs(2));
        assert_eq!(config.watch.ignore, vec![".git", "target"]);
        assert!(!config.continuous);
    }

    #[test]
    fn bare_local_key_selects_defaults() {
        let config = PipelineConfig::from_yaml("build:\n  local:\n").unwrap();
        assert_eq!(
            config.build.strategies.as_slice(),
            [BuildStrategy::Local(LocalBuild::default())]
        );
    }

    #[test]
    fn helm_release_values() {
        let yaml = r#"
deploy:
  helm:
    releases:
      - name: web
        chart_path: charts/web
        values_files: [values-dev.yaml]
        values:
          image: ghcr.io/org/web
"#;
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        let [DeployStrategy::Helm(helm)] = config.deploy.strategies.as_slice() else {
            panic!("expected helm deploy");
        };
        let release = helm.releases.first();
        assert_eq!(release.name.as_str(), "web");
        assert_eq!(release.values_files, vec![PathBuf::from("values-dev.yaml")]);
        assert_eq!(
            release.values.get("image").map(String::as_str),
            Some("ghcr.io/org/web")
        );
    }

    #[test]
    fn watch_defaults() {
        let config = PipelineConfig::from_yaml("artifacts: []\n").unwrap();
        assert_eq!(config.watch.debounce, Duration::from_millis(500));
        assert_eq!(config.watch.ignore, vec![".git"]);
        assert!(config.build.strategies.as_slice().is_empty());
        assert!(config.deploy.strategies.as_slice().is_empty());
    }
}

mod validation {
    use super::*;

    #[test]
    fn empty_manifest_list_is_rejected() {
        let result = PipelineConfig::from_yaml("deploy:\n  kubectl:\n    manifests: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_image_is_rejected() {
        let result = PipelineConfig::from_yaml("artifacts:\n  - image: \"bad image\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_release_name_is_rejected() {
        let yaml = r#"
deploy:
  helm:
    releases:
      - name: Web_App
        chart_path: charts/web
"#;
        assert!(PipelineConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn bare_custom_key_reports_missing_command() {
        let err = PipelineConfig::from_yaml("build:\n  tag_policy: sha256\n  custom:\n").unwrap_err();
        assert!(err.to_string().contains("command"), "{err}");
    }

    #[test]
    fn bare_deploy_keys_report_missing_fields() {
        let err = PipelineConfig::from_yaml("deploy:\n  kubectl:\n").unwrap_err();
        assert!(err.to_string().contains("manifests"), "{err}");

        let err = PipelineConfig::from_yaml("deploy:\n  helm:\n").unwrap_err();
        assert!(err.to_string().contains("releases"), "{err}");
    }

    #[test]
    fn unknown_container_cli_is_rejected() {
        let result = PipelineConfig::from_yaml("build:\n  local:\n    runtime: rkt\n");
        assert!(result.is_err());
    }
}

mod discovery {
    use super::*;

    #[test]
    fn finds_alternate_file_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME_ALT), "artifacts: []\n").unwrap();

        let path = PipelineConfig::find(dir.path()).unwrap();
        assert!(path.ends_with(CONFIG_FILENAME_ALT));
        assert!(PipelineConfig::discover(dir.path()).is_ok());
    }

    #[test]
    fn missing_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = PipelineConfig::discover(dir.path()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn init_writes_a_loadable_template() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), Some("ghcr.io/org/shop"), false).unwrap();

        let config = PipelineConfig::discover(dir.path()).unwrap();
        assert_eq!(config.artifacts[0].image_name(), "ghcr.io/org/shop");

        assert!(init_config(dir.path(), None, false).is_err());
        assert!(init_config(dir.path(), None, true).is_ok());
    }
}
