//! Worker pool running one scenario function

use crate::error::ExecutionError;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// One iteration of a scenario; it must return promptly once the token is cancelled
pub type ScenarioFn = Arc<dyn Fn(CancellationToken) -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// A single pass of `n` iterations
    Bounded(usize),
    /// Repeat until cancelled
    Infinite,
}

pub struct Worker {
    name: String,
    scenario: ScenarioFn,
    mode: LoopMode,
    max_parallelism: i64,
    parallelism: AtomicI64,
    iterations: AtomicU64,
    slots: Arc<Semaphore>,
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("max_parallelism", &self.max_parallelism)
            .field("parallelism", &self.parallelism())
            .finish()
    }
}

impl Worker {
    /// A `max_parallelism` of zero or less leaves the pool uncapped
    pub fn new(
        name: impl Into<String>,
        scenario: ScenarioFn,
        mode: LoopMode,
        initial_parallelism: i64,
        max_parallelism: i64,
    ) -> Result<Self, ExecutionError> {
        let name = name.into();
        if initial_parallelism < 1 {
            return Err(ExecutionError::InvalidParallelism {
                worker: name,
                value: initial_parallelism,
            });
        }
        let initial = if max_parallelism > 0 {
            initial_parallelism.min(max_parallelism)
        } else {
            initial_parallelism
        };
        Ok(Self {
            name,
            scenario,
            mode,
            max_parallelism,
            parallelism: AtomicI64::new(initial),
            iterations: AtomicU64::new(0),
            slots: Arc::new(Semaphore::new(initial as usize)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parallelism(&self) -> i64 {
        self.parallelism.load(Ordering::Acquire)
    }

    /// Iterations started so far
    pub fn iterations(&self) -> u64 {
        self.iterations.load(Ordering::Relaxed)
    }

    /// Raise concurrency by up to `n`, respecting the cap; returns how much was added
    pub fn add_parallelism(&self, n: i64) -> i64 {
        if n <= 0 {
            return 0;
        }
        let mut current = self.parallelism();
        loop {
            let added = if self.max_parallelism > 0 {
                n.min(self.max_parallelism - current).max(0)
            } else {
                n
            };
            if added == 0 {
                return 0;
            }
            match self.parallelism.compare_exchange(
                current,
                current + added,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.slots.add_permits(added as usize);
                    debug!("{} parallelism {} -> {}", self.name, current, current + added);
                    return added;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Run until cancelled, or until every iteration finished in bounded mode
    pub async fn process(&self, cancel: CancellationToken) {
        let mut tasks = JoinSet::new();
        let mut started = 0usize;

        loop {
            if let LoopMode::Bounded(n) = self.mode {
                if started >= n {
                    break;
                }
            }

            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                permit = self.slots.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let scenario = self.scenario.clone();
            let token = cancel.clone();
            tasks.spawn(async move {
                scenario(token).await;
                drop(permit);
            });
            started += 1;
            self.iterations.fetch_add(1, Ordering::Relaxed);

            while let Some(result) = tasks.try_join_next() {
                if let Err(e) = result {
                    warn!("{} iteration panicked: {}", self.name, e);
                }
            }
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                warn!("{} iteration panicked: {}", self.name, e);
            }
        }
        debug!("{} finished after {} iterations", self.name, started);
    }
}
