// ABOUTME: Pipeline orchestration: one-shot build and deploy, or the continuous dev loop.
// ABOUTME: Owns the resolved strategies and the signals shared with the watcher.

mod error;
mod resolve;
mod state;

pub use error::{BuildSnafu, ConfigurationError, DeploySnafu, Phase, PipelineError, WatchSnafu};
pub use resolve::{Plan, Strategies, plan, resolve};
pub use state::DevState;

use snafu::ResultExt;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::build::{BuildResult, Builder};
use crate::config::{Artifact, PipelineConfig};
use crate::deploy::{DeployResult, Deployer};
use crate::diagnostics::{CycleFailure, Diagnostics};
use crate::output::Output;
use crate::tag::Tagger;
use crate::watch::{FileWatcher, WatchEvent, Watcher};

/// Whether a runner deploys once or keeps redeploying on change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Once,
    Continuous,
}

impl RunMode {
    pub fn from_continuous(continuous: bool) -> Self {
        if continuous {
            RunMode::Continuous
        } else {
            RunMode::Once
        }
    }
}

/// Drives build, deploy and watch for one invocation.
///
/// At most one build and deploy cycle runs at a time, and the watcher is only
/// asked for the next change window after the previous cycle has finished.
pub struct Runner {
    builder: Box<dyn Builder>,
    tagger: Box<dyn Tagger>,
    deployer: Box<dyn Deployer>,
    watcher: Box<dyn Watcher>,
    artifacts: Vec<Artifact>,
    mode: RunMode,
    cancel: CancellationToken,
    ready: Arc<Notify>,
    output: Output,
    diagnostics: Diagnostics,
}

impl Runner {
    /// Resolve `config` and wire a runner with a filesystem watcher.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if the strategy selection is missing,
    /// ambiguous or unknown. No runner is created in that case.
    pub fn for_config(config: &PipelineConfig, output: Output) -> Result<Self, ConfigurationError> {
        let strategies = resolve(config)?;
        Ok(Self::new(
            strategies,
            Box::new(FileWatcher::new(&config.watch)),
            config.artifacts.clone(),
            RunMode::from_continuous(config.continuous),
            output,
        ))
    }

    pub fn new(
        strategies: Strategies,
        watcher: Box<dyn Watcher>,
        artifacts: Vec<Artifact>,
        mode: RunMode,
        output: Output,
    ) -> Self {
        Self {
            builder: strategies.builder,
            tagger: strategies.tagger,
            deployer: strategies.deployer,
            watcher,
            artifacts,
            mode,
            cancel: CancellationToken::new(),
            ready: Arc::new(Notify::new()),
            output,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Token that, once cancelled, asks the watcher to end the dev loop.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Notified each time the watcher starts waiting for changes.
    pub fn ready_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.ready)
    }

    /// Failures the dev loop reported and kept going after.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Run in the configured mode.
    pub async fn run(&mut self) -> Result<(), PipelineError> {
        match self.mode {
            RunMode::Once => self.run_once().await.map(|_| ()),
            RunMode::Continuous => self.dev().await,
        }
    }

    /// Build, then deploy what was built. Any failure aborts the run.
    pub async fn run_once(&mut self) -> Result<DeployResult, PipelineError> {
        let builds = self.build().await?;
        self.deploy(&builds).await
    }

    /// Build and deploy, then redeploy on every change until stopped.
    ///
    /// Build and deploy failures are reported and the loop keeps watching,
    /// including when the very first cycle fails. Only a failure of the
    /// watcher itself ends the loop with an error.
    pub async fn dev(&mut self) -> Result<(), PipelineError> {
        let mut state = DevState::Init;
        let mut cycle: u64 = 0;

        while !state.is_terminal() {
            let from = state.name();

            state = match state {
                DevState::Init => DevState::Building,
                DevState::Building => {
                    cycle += 1;
                    match self.build().await {
                        Ok(builds) => DevState::Deploying(builds),
                        Err(e) => {
                            self.record(cycle, &e);
                            DevState::Watching
                        }
                    }
                }
                DevState::Deploying(builds) => {
                    if let Err(e) = self.deploy(&builds).await {
                        self.record(cycle, &e);
                    }
                    DevState::Watching
                }
                DevState::Watching => {
                    match self
                        .watcher
                        .watch(&self.artifacts, &self.ready, &self.cancel)
                        .await
                    {
                        Ok(WatchEvent::Changed(changes)) => {
                            tracing::info!(artifacts = ?changes.artifacts, "Changes detected");
                            self.output.progress(&format!(
                                "Changes detected in {}",
                                changes.artifacts.join(", ")
                            ));
                            DevState::Building
                        }
                        Ok(WatchEvent::Stop) => DevState::Stopped,
                        Err(source) => DevState::Failed(PipelineError::Watch { source }),
                    }
                }
                terminal => terminal,
            };

            tracing::debug!(from, to = state.name(), "Dev loop transition");
        }

        match state {
            DevState::Failed(e) => {
                tracing::error!("Dev loop failed: {}", e);
                Err(e)
            }
            _ => {
                tracing::info!(cycles = cycle, "Dev loop stopped");
                Ok(())
            }
        }
    }

    async fn build(&mut self) -> Result<BuildResult, PipelineError> {
        tracing::info!("Starting build");
        self.output.start_timer();
        let builds = self
            .builder
            .run(&mut self.output, self.tagger.as_ref())
            .await
            .context(BuildSnafu)?;
        self.output
            .success(&format!("Built {} image(s)", builds.len()));
        Ok(builds)
    }

    async fn deploy(&mut self, builds: &BuildResult) -> Result<DeployResult, PipelineError> {
        tracing::info!("Starting deploy");
        self.output.start_timer();
        let result = self
            .deployer
            .run(&mut self.output, builds)
            .await
            .context(DeploySnafu)?;
        self.output.success("Deploy complete");
        Ok(result)
    }

    fn record(&mut self, cycle: u64, error: &PipelineError) {
        self.output.error(&error.to_string());
        self.diagnostics.record(CycleFailure::new(cycle, error));
    }
}
