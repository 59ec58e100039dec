// ABOUTME: Change detection for the dev loop.
// ABOUTME: Exposes the Watcher trait, WatchEvent and WatchError.

mod file;

pub use file::FileWatcher;

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::config::Artifact;

/// Outcome of one change window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A debounced batch of source changes.
    Changed(ChangeSet),
    /// An external stop condition fired; the session should end cleanly.
    Stop,
}

/// Artifacts touched by a batch of changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Image names of the affected artifacts, sorted and deduplicated.
    pub artifacts: Vec<String>,
}

impl ChangeSet {
    pub fn new(mut artifacts: Vec<String>) -> Self {
        artifacts.sort();
        artifacts.dedup();
        Self { artifacts }
    }
}

/// Blocks until the next change window closes.
///
/// Implementations must return exactly one of: a change event, the stop event
/// (typically once `cancel` fires), or an error when the watch mechanism
/// itself fails. `ready` is notified once the watcher is armed; notifying is
/// best-effort and never blocks.
#[async_trait]
pub trait Watcher: Send {
    async fn watch(
        &mut self,
        artifacts: &[Artifact],
        ready: &Notify,
        cancel: &CancellationToken,
    ) -> Result<WatchEvent, WatchError>;
}

/// Errors from the watch mechanism itself.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("file watcher error: {0}")]
    Notify(#[from] notify::Error),

    #[error("cannot watch {}: {source}", path.display())]
    Path { path: PathBuf, source: io::Error },

    #[error("no artifacts to watch")]
    NothingToWatch,

    #[error("file watcher stopped delivering events")]
    Disconnected,

    #[error("{0}")]
    Failed(String),
}
