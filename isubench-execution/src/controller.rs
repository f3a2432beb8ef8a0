//! Adaptive load controller
//!
//! On every tick the controller reads the load-phase error count and the
//! cumulative success counters, then raises worker concurrency by a step
//! that grows with the success count. It never lowers concurrency. A burst
//! of errors holds concurrency for that tick, and reaching the error cap
//! aborts the run.

use crate::error::ExecutionError;
use crate::worker::Worker;
use isubench_logging::contestant;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Counters the controller reads; implementations must not block
pub trait LoadGauge: Send + Sync {
    /// Cumulative errors recorded during the load phase
    fn load_errors(&self) -> u64;

    /// Cumulative completed login flows
    fn login_successes(&self) -> u64;

    /// Cumulative completed registration flows
    fn registration_successes(&self) -> u64;

    /// Stop accepting score; called once when the error cap is hit
    fn close_score(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub interval: Duration,
    pub error_cap: u64,
    pub error_jump_threshold: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            error_cap: 50,
            error_jump_threshold: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerOutcome {
    /// The run ended on its own
    Finished,
    /// The error cap was reached and the run was cancelled
    Aborted { errors: u64 },
}

/// Login worker increment for a cumulative success count
pub fn login_step(successes: u64) -> i64 {
    match successes {
        0..=49 => 3,
        50..=99 => 6,
        100..=199 => 9,
        200..=499 => 12,
        _ => 15,
    }
}

/// Registration worker increment for a cumulative success count
pub fn registration_step(successes: u64) -> i64 {
    match successes {
        0..=49 => 1,
        50..=99 => 2,
        100..=199 => 4,
        200..=499 => 8,
        _ => 16,
    }
}

pub struct Controller {
    config: ControllerConfig,
    login: Arc<Worker>,
    registration: Arc<Worker>,
    ban: Arc<Worker>,
}

impl Controller {
    pub fn new(
        config: ControllerConfig,
        login: Arc<Worker>,
        registration: Arc<Worker>,
        ban: Arc<Worker>,
    ) -> Result<Self, ExecutionError> {
        if config.interval.is_zero() {
            return Err(ExecutionError::InvalidController("interval must be positive".to_string()));
        }
        Ok(Self {
            config,
            login,
            registration,
            ban,
        })
    }

    /// Apply one tick given the current and previous error totals; `true` when the run must abort
    pub fn tick(&self, gauge: &dyn LoadGauge, previous_errors: u64) -> (bool, u64) {
        let total = gauge.load_errors();
        if total >= self.config.error_cap {
            return (true, total);
        }

        let jump = total.saturating_sub(previous_errors);
        if jump > self.config.error_jump_threshold {
            contestant!("Errors rose by {} (now {}); holding load", jump, total);
            return (false, total);
        }

        let logins = gauge.login_successes();
        let registrations = gauge.registration_successes();
        contestant!("Successful logins: {}", logins);
        contestant!("Successful registrations: {}", registrations);

        let login = login_step(logins);
        let registration = registration_step(registrations);
        self.login.add_parallelism(login);
        self.registration.add_parallelism(registration);
        self.ban.add_parallelism((login + registration) / 10);

        debug!(
            "Parallelism now login={} registration={} ban={}",
            self.login.parallelism(),
            self.registration.parallelism(),
            self.ban.parallelism()
        );
        (false, total)
    }

    /// Tick until the run is cancelled or the error cap aborts it
    pub async fn run(&self, cancel: CancellationToken, gauge: Arc<dyn LoadGauge>) -> ControllerOutcome {
        let mut ticker = interval_at(Instant::now() + self.config.interval, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut previous = 0;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return ControllerOutcome::Finished,
                _ = ticker.tick() => {}
            }

            let (abort, total) = self.tick(gauge.as_ref(), previous);
            if abort {
                contestant!("Stopping the load run (errors: {})", total);
                warn!("Error cap {} reached with {} load errors", self.config.error_cap, total);
                gauge.close_score();
                cancel.cancel();
                return ControllerOutcome::Aborted { errors: total };
            }
            previous = total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::{LoopMode, ScenarioFn};
    use futures::FutureExt;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    #[derive(Default)]
    struct Gauge {
        errors: AtomicU64,
        logins: AtomicU64,
        registrations: AtomicU64,
        closed: AtomicBool,
    }

    impl LoadGauge for Gauge {
        fn load_errors(&self) -> u64 {
            self.errors.load(Ordering::SeqCst)
        }
        fn login_successes(&self) -> u64 {
            self.logins.load(Ordering::SeqCst)
        }
        fn registration_successes(&self) -> u64 {
            self.registrations.load(Ordering::SeqCst)
        }
        fn close_score(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    fn idle_worker(name: &str) -> Arc<Worker> {
        let scenario: ScenarioFn = Arc::new(|_cancel| async {}.boxed());
        Arc::new(Worker::new(name, scenario, LoopMode::Infinite, 1, 0).unwrap())
    }

    fn controller() -> Controller {
        Controller::new(
            ControllerConfig::default(),
            idle_worker("login"),
            idle_worker("registration"),
            idle_worker("ban"),
        )
        .unwrap()
    }

    #[test]
    fn test_step_tables() {
        assert_eq!(login_step(0), 3);
        assert_eq!(login_step(50), 6);
        assert_eq!(login_step(199), 9);
        assert_eq!(login_step(200), 12);
        assert_eq!(login_step(500), 15);
        assert_eq!(registration_step(49), 1);
        assert_eq!(registration_step(100), 4);
        assert_eq!(registration_step(10_000), 16);
    }

    #[test]
    fn test_tick_ratchets_up() {
        let controller = controller();
        let gauge = Gauge::default();
        gauge.logins.store(120, Ordering::SeqCst);
        gauge.registrations.store(600, Ordering::SeqCst);

        let (abort, total) = controller.tick(&gauge, 0);
        assert!(!abort);
        assert_eq!(total, 0);
        assert_eq!(controller.login.parallelism(), 1 + 9);
        assert_eq!(controller.registration.parallelism(), 1 + 16);
        assert_eq!(controller.ban.parallelism(), 1 + 2);
    }

    #[test]
    fn test_zero_successes_add_the_minimum_step() {
        let controller = controller();
        let gauge = Gauge::default();
        let mut previous = 0;
        let mut last = controller.login.parallelism();
        for _ in 0..3 {
            let (_, total) = controller.tick(&gauge, previous);
            previous = total;
            let now = controller.login.parallelism();
            assert_eq!(now - last, 3);
            last = now;
        }
        assert_eq!(controller.registration.parallelism(), 1 + 3);
        assert_eq!(controller.ban.parallelism(), 1);
    }

    #[test]
    fn test_error_jump_holds_load() {
        let controller = controller();
        let gauge = Gauge::default();
        gauge.errors.store(6, Ordering::SeqCst);
        let (abort, total) = controller.tick(&gauge, 0);
        assert!(!abort);
        assert_eq!(total, 6);
        assert_eq!(controller.login.parallelism(), 1);

        gauge.errors.store(11, Ordering::SeqCst);
        controller.tick(&gauge, 6);
        assert_eq!(controller.login.parallelism(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_cap_aborts_run() {
        let controller = controller();
        let gauge = Arc::new(Gauge::default());
        gauge.errors.store(51, Ordering::SeqCst);
        let cancel = CancellationToken::new();

        let outcome = controller.run(cancel.clone(), gauge.clone()).await;
        assert_eq!(outcome, ControllerOutcome::Aborted { errors: 51 });
        assert!(cancel.is_cancelled());
        assert!(gauge.closed.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_returns_on_cancel() {
        let controller = controller();
        let gauge = Arc::new(Gauge::default());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = controller.run(cancel, gauge).await;
        assert_eq!(outcome, ControllerOutcome::Finished);
    }
}
