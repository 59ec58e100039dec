// ABOUTME: States of the continuous (dev) loop.
// ABOUTME: A build result travels with the Deploying state and dies with its cycle.

use crate::build::BuildResult;

use super::PipelineError;

#[derive(Debug)]
pub enum DevState {
    Init,
    Building,
    Deploying(BuildResult),
    Watching,
    Stopped,
    Failed(PipelineError),
}

impl DevState {
    pub fn name(&self) -> &'static str {
        match self {
            DevState::Init => "init",
            DevState::Building => "building",
            DevState::Deploying(_) => "deploying",
            DevState::Watching => "watching",
            DevState::Stopped => "stopped",
            DevState::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DevState::Stopped | DevState::Failed(_))
    }
}
