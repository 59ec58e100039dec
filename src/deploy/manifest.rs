// ABOUTME: Rewrites image references inside Kubernetes manifests.
// ABOUTME: Every `image:` whose repository was just built gets the new tag.

use serde::Deserialize;
use serde_yaml::Value;

use crate::build::BuildResult;
use crate::types::ImageRef;

/// Render a multi-document manifest with built image references substituted.
pub fn render_manifests(source: &str, builds: &BuildResult) -> Result<String, serde_yaml::Error> {
    let mut rendered = Vec::new();
    let mut replaced = 0;

    for document in serde_yaml::Deserializer::from_str(source) {
        let mut value = Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        replaced += replace_images(&mut value, builds);
        rendered.push(serde_yaml::to_string(&value)?);
    }

    tracing::debug!(documents = rendered.len(), replaced, "Rendered manifests");
    Ok(rendered.join("---\n"))
}

fn replace_images(value: &mut Value, builds: &BuildResult) -> usize {
    match value {
        Value::Mapping(map) => {
            let mut replaced = 0;
            for (key, child) in map.iter_mut() {
                if key.as_str() == Some("image")
                    && let Value::String(image) = &mut *child
                {
                    if let Some(reference) = ImageRef::parse(image)
                        .ok()
                        .and_then(|current| builds.reference_matching(&current))
                    {
                        *image = reference.to_string();
                        replaced += 1;
                    }
                    continue;
                }
                replaced += replace_images(child, builds);
            }
            replaced
        }
        Value::Sequence(items) => items.iter_mut().map(|item| replace_images(item, builds)).sum(),
        Value::Tagged(tagged) => replace_images(&mut tagged.value, builds),
        _ => 0,
    }
}
