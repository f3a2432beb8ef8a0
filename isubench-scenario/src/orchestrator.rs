//! Whole-run driver: prepare, timed load, grace period, verdict

use crate::error::ScenarioError;
use crate::flows::{ban, login, master_refresh, registration};
use crate::prepare::prepare;
use crate::report::{judge, print_summary, write_report, Verdict};
use crate::session::Session;
use isubench_config::Stage;
use isubench_execution::{Controller, ControllerConfig, ControllerOutcome, LoadGauge, LoopMode, RunContext, Worker};
use isubench_logging::{admin, contestant, StepTimer};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Test runs one iteration per worker; prod loops until the deadline
pub fn loop_mode(stage: Stage) -> LoopMode {
    match stage {
        Stage::Test => LoopMode::Bounded(1),
        Stage::Prod => LoopMode::Infinite,
    }
}

/// Run everything and return the verdict; the report is written when a path is configured
pub async fn run(session: Arc<Session>, cancel: &CancellationToken) -> Result<Verdict, ScenarioError> {
    let prepared = prepare(&session, cancel).await;

    if !prepared {
        contestant!("Prepare failed; skipping the load phase");
    } else if session.config.target.prepare_only {
        contestant!("Prepare-only run; skipping the load phase");
    } else if !cancel.is_cancelled() {
        let outcome = load(&session, cancel).await?;
        if let ControllerOutcome::Aborted { errors } = outcome {
            admin!("Load phase aborted after {} errors", errors);
        }
        debug!("Waiting {:?} for in-flight failures", session.config.load.grace_period);
        tokio::time::sleep(session.config.load.grace_period).await;
    }

    let verdict = judge(&session, prepared);
    print_summary(&session, &verdict);
    if let Some(path) = &session.config.report.path {
        write_report(path, &verdict).await?;
    }
    Ok(verdict)
}

/// The timed load phase: three flow workers, the master refresh and the controller
pub async fn load(session: &Arc<Session>, cancel: &CancellationToken) -> Result<ControllerOutcome, ScenarioError> {
    let _timer = StepTimer::start("load");
    let config = &session.config;
    let mut ctx = RunContext::from_parent(cancel);
    ctx.arm_deadline(config.load.duration);

    let stage = config.target.stage;
    let mode = loop_mode(stage);
    let max = config.effective_max_parallelism();
    let login = Arc::new(Worker::new("login", login::scenario(session.clone()), mode, 1, max)?);
    let registration = Arc::new(Worker::new(
        "registration",
        registration::scenario(session.clone()),
        mode,
        1,
        max,
    )?);
    let ban = Arc::new(Worker::new("ban", ban::scenario(session.clone()), mode, 1, max)?);
    let refresh = Worker::new(
        "master refresh",
        master_refresh::scenario(session.clone()),
        LoopMode::Bounded(1),
        1,
        1,
    )?;

    let controller = Controller::new(
        ControllerConfig {
            interval: config.load.controller_interval,
            error_cap: config.load.error_cap,
            error_jump_threshold: config.load.error_jump_threshold,
        },
        login.clone(),
        registration.clone(),
        ban.clone(),
    )?;

    contestant!("Starting the load phase ({} stage)", stage);
    let token = ctx.token();
    let workers = async {
        tokio::join!(
            login.process(token.clone()),
            registration.process(token.clone()),
            ban.process(token.clone()),
            refresh.process(token.clone()),
        );
        // Bounded workers are done; nothing left for the controller to scale
        if stage == Stage::Test {
            token.cancel();
        }
    };
    let gauge: Arc<dyn LoadGauge> = session.clone();
    let ((), outcome) = tokio::join!(workers, controller.run(token.clone(), gauge));
    ctx.cancel();

    contestant!(
        "Load phase finished: {} login and {} registration iterations",
        login.iterations(),
        registration.iterations()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use isubench_config::BenchConfig;
    use isubench_core::{ErrorCode, Phase};

    #[test]
    fn test_loop_mode_per_stage() {
        assert_eq!(loop_mode(Stage::Test), LoopMode::Bounded(1));
        assert_eq!(loop_mode(Stage::Prod), LoopMode::Infinite);
    }

    #[tokio::test]
    async fn test_failed_prepare_skips_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BenchConfig::default();
        config.fixtures.dump_dir = dir.path().to_path_buf();
        config.report.path = Some(dir.path().join("report.json"));
        let session = Arc::new(Session::new(config).unwrap());

        let verdict = run(session.clone(), &CancellationToken::new()).await.unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.score.total, 0);
        assert_eq!(session.errors.count(Phase::Load), 0);
        assert_eq!(session.errors.all()[0].codes(), &[ErrorCode::InitializeFailedToLoadJson]);
        assert!(dir.path().join("report.json").exists());
    }
}
