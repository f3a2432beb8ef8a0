//! Concurrency-safe collection point for every failure of a run

use crate::error::{Category, Failure};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Phase of the run a failure was recorded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Prepare,
    Load,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Prepare => "prepare",
            Phase::Load => "load",
        }
    }
}

#[derive(Debug, Default)]
pub struct ErrorSink {
    entries: Mutex<Vec<(Phase, Failure)>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, phase: Phase, failure: Failure) {
        tracing::debug!("{} error recorded: {}", phase.as_str(), failure.describe());
        self.entries.lock().push((phase, failure));
    }

    /// Number of failures recorded in a phase so far
    pub fn count(&self, phase: Phase) -> u64 {
        self.entries.lock().iter().filter(|(p, _)| *p == phase).count() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Snapshot of every failure in recording order
    pub fn all(&self) -> Vec<Failure> {
        self.entries.lock().iter().map(|(_, f)| f.clone()).collect()
    }

    /// Snapshot grouped by category, preserving recording order inside each group
    pub fn by_category(&self) -> HashMap<Category, Vec<Failure>> {
        let mut grouped: HashMap<Category, Vec<Failure>> = HashMap::new();
        for (_, failure) in self.entries.lock().iter() {
            grouped.entry(failure.category()).or_default().push(failure.clone());
        }
        grouped
    }
}
