// ABOUTME: Diagnostics accumulator for failures swallowed by the dev loop.
// ABOUTME: Keeps the most recent cycle failures so they can be reported later.

use std::collections::VecDeque;

use crate::runner::{Phase, PipelineError};

/// Maximum number of recent failures to keep in memory.
const MAX_RECENT_FAILURES: usize = 100;

/// Collects build and deploy failures that did not end a dev session.
#[derive(Debug, Default)]
pub struct Diagnostics {
    recent: VecDeque<CycleFailure>,
    total: usize,
}

impl Diagnostics {
    /// Record a failure, auto-logging it via tracing.
    pub fn record(&mut self, failure: CycleFailure) {
        tracing::warn!(
            cycle = failure.cycle,
            phase = %failure.phase,
            "{}",
            failure.message
        );
        if self.recent.len() == MAX_RECENT_FAILURES {
            self.recent.pop_front();
        }
        self.recent.push_back(failure);
        self.total += 1;
    }

    /// Recent failures, oldest first.
    pub fn failures(&self) -> impl Iterator<Item = &CycleFailure> {
        self.recent.iter()
    }

    pub fn last(&self) -> Option<&CycleFailure> {
        self.recent.back()
    }

    /// Failures recorded over the whole session, including evicted ones.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_failures(&self) -> bool {
        self.total > 0
    }
}

/// A build or deploy failure in one dev cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleFailure {
    /// 1-based cycle number; the initial cycle is 1.
    pub cycle: u64,
    pub phase: Phase,
    pub message: String,
}

impl CycleFailure {
    pub fn new(cycle: u64, error: &PipelineError) -> Self {
        Self {
            cycle,
            phase: error.phase(),
            message: error.to_string(),
        }
    }
}
