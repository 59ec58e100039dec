// ABOUTME: Filesystem watcher over artifact build contexts.
// ABOUTME: Uses notify for events and debounces them into one change set per window.

use async_trait::async_trait;
use notify::{Event, EventKind, RecursiveMode, Watcher as _};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{Notify, mpsc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{ChangeSet, WatchError, WatchEvent, Watcher};
use crate::config::{Artifact, WatchConfig};

/// Watches every artifact context recursively.
///
/// Each call arms fresh watches, so edits made while a cycle is building are
/// not replayed into the next window.
#[derive(Debug, Clone)]
pub struct FileWatcher {
    debounce: Duration,
    ignore: Vec<String>,
}

impl FileWatcher {
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            debounce: config.debounce,
            ignore: config.ignore.clone(),
        }
    }

    fn is_ignored(&self, relative: &Path) -> bool {
        relative
            .components()
            .any(|c| self.ignore.iter().any(|name| c.as_os_str() == name.as_str()))
    }

    /// Image names of the artifacts whose context contains a path of `event`.
    fn affected(&self, event: &Event, roots: &[(PathBuf, String)]) -> Vec<String> {
        if matches!(event.kind, EventKind::Access(_)) {
            return Vec::new();
        }

        let mut affected = Vec::new();
        for path in &event.paths {
            for (root, image_name) in roots {
                if let Ok(relative) = path.strip_prefix(root)
                    && !self.is_ignored(relative)
                {
                    affected.push(image_name.clone());
                }
            }
        }
        affected
    }
}

#[async_trait]
impl Watcher for FileWatcher {
    async fn watch(
        &mut self,
        artifacts: &[Artifact],
        ready: &Notify,
        cancel: &CancellationToken,
    ) -> Result<WatchEvent, WatchError> {
        if artifacts.is_empty() {
            return Err(WatchError::NothingToWatch);
        }

        let roots = artifacts
            .iter()
            .map(|artifact| {
                std::fs::canonicalize(&artifact.context)
                    .map(|root| (root, artifact.image_name()))
                    .map_err(|source| WatchError::Path {
                        path: artifact.context.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })?;

        let unique: BTreeSet<&PathBuf> = roots.iter().map(|(root, _)| root).collect();
        for root in &unique {
            watcher.watch(root.as_path(), RecursiveMode::Recursive)?;
        }

        ready.notify_one();
        tracing::debug!(roots = unique.len(), "Watching for changes");

        let mut pending = BTreeSet::new();
        let mut quiet_at: Option<Instant> = None;

        loop {
            let quiet = async move {
                match quiet_at {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                biased;

                _ = cancel.cancelled() => return Ok(WatchEvent::Stop),

                _ = quiet => {
                    let changes = ChangeSet::new(pending.into_iter().collect());
                    tracing::debug!(artifacts = ?changes.artifacts, "Change window closed");
                    return Ok(WatchEvent::Changed(changes));
                }

                received = rx.recv() => match received {
                    Some(Ok(event)) => {
                        let affected = self.affected(&event, &roots);
                        if !affected.is_empty() {
                            pending.extend(affected);
                            quiet_at = Some(Instant::now() + self.debounce);
                        }
                    }
                    Some(Err(e)) => return Err(WatchError::Notify(e)),
                    None => return Err(WatchError::Disconnected),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind};

    fn watcher() -> FileWatcher {
        FileWatcher::new(&WatchConfig {
            debounce: Duration::from_millis(10),
            ignore: vec![".git".to_string(), "target".to_string()],
        })
    }

    fn roots() -> Vec<(PathBuf, String)> {
        vec![
            (PathBuf::from("/src/web"), "web".to_string()),
            (PathBuf::from("/src/api"), "api".to_string()),
        ]
    }

    #[test]
    fn maps_paths_to_owning_artifacts() {
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/src/web/index.html"))
            .add_path(PathBuf::from("/elsewhere/file"));

        assert_eq!(watcher().affected(&event, &roots()), vec!["web".to_string()]);
    }

    #[test]
    fn ignores_configured_components() {
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/src/api/.git/index"))
            .add_path(PathBuf::from("/src/api/target/debug/api"));

        assert!(watcher().affected(&event, &roots()).is_empty());
    }

    #[test]
    fn ignores_access_events() {
        let event = Event::new(EventKind::Access(AccessKind::Any))
            .add_path(PathBuf::from("/src/web/index.html"));

        assert!(watcher().affected(&event, &roots()).is_empty());
    }

    #[test]
    fn change_set_is_sorted_and_deduplicated() {
        let changes = ChangeSet::new(vec!["web".into(), "api".into(), "web".into()]);
        assert_eq!(changes.artifacts, vec!["api".to_string(), "web".to_string()]);
    }
}
