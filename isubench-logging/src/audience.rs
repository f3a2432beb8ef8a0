//! Audience targets and logging helpers

use std::time::Instant;

/// Target for messages addressed to the contestant
pub const CONTESTANT: &str = "contestant";

/// Target for operator diagnostics
pub const ADMIN: &str = "admin";

/// Log an info-level message for the contestant
#[macro_export]
macro_rules! contestant {
    ($($arg:tt)+) => {
        ::tracing::info!(target: $crate::CONTESTANT, $($arg)+)
    };
}

/// Log an info-level message for the operator
#[macro_export]
macro_rules! admin {
    ($($arg:tt)+) => {
        ::tracing::info!(target: $crate::ADMIN, $($arg)+)
    };
}

/// Logs how long a named step took when dropped
pub struct StepTimer {
    label: &'static str,
    started: Instant,
}

impl StepTimer {
    pub fn start(label: &'static str) -> Self {
        tracing::debug!(target: ADMIN, step = label, "step started");
        Self {
            label,
            started: Instant::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl Drop for StepTimer {
    fn drop(&mut self) {
        tracing::debug!(
            target: ADMIN,
            step = self.label,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "step finished"
        );
    }
}
