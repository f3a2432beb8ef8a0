//! Prepare phase: load fixtures, reset the target, validate it once

use crate::session::Session;
use crate::validation::run_validation;
use isubench_core::{with_initialization_success, ErrorCode, Failure, Phase, SetError};
use isubench_http::{actions, AgentKind};
use isubench_logging::{admin, contestant, StepTimer};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const USER_FIXTURE_FILES: [&str; 3] = [
    "royalUserInitialize.json",
    "combackUserInitialize.json",
    "oneYearUserInitialize.json",
];
pub const BAN_USER_FIXTURE_FILE: &str = "banUserInitialize.json";
pub const PLATFORM_FIXTURE_FILE: &str = "platforms.json";

/// Fill the actor pools from the dump directory
pub async fn load_fixtures(session: &Session) -> Result<(), SetError> {
    let fixtures = &session.config.fixtures;
    for name in USER_FIXTURE_FILES {
        let added = session.users.load_json(&fixtures.dump_file(name)).await?;
        info!("Loaded {} users from {}", added, name);
    }
    let banned = session.ban_users.load_json(&fixtures.dump_file(BAN_USER_FIXTURE_FILE)).await?;
    let platforms = session.platforms.load_json(&fixtures.dump_file(PLATFORM_FIXTURE_FILE)).await?;
    info!("Loaded {} banned users and {} platforms", banned, platforms);
    Ok(())
}

/// `POST /initialize`; records the target's language on success
async fn initialize(session: &Session, cancel: &CancellationToken) -> Result<(), Failure> {
    let agent = session
        .factory
        .new_agent(AgentKind::Initialize)
        .map_err(|e| Failure::new(ErrorCode::InternalCreatingAgent, e.to_string()))?;
    let res = actions::post_initialize(&agent, cancel)
        .await
        .map_err(|e| Failure::new(ErrorCode::InitializeInvalidRequest, e.to_string()))?;
    let body = with_initialization_success(&res)?;
    session.set_language(body.language.clone());
    contestant!("[LANGUAGE] {}", body.language);
    Ok(())
}

/// Run the whole prepare phase; `false` means the run cannot go on to load
pub async fn prepare(session: &Session, cancel: &CancellationToken) -> bool {
    let _timer = StepTimer::start("prepare");

    if let Err(e) = load_fixtures(session).await {
        admin!("Fixture loading failed: {}", e);
        session.record(
            Phase::Prepare,
            Failure::new(ErrorCode::InitializeFailedToLoadJson, e.to_string()),
        );
        return false;
    }

    contestant!("Initializing the application");
    if let Err(failure) = initialize(session, cancel).await {
        contestant!("Initialize failed: {}", failure.describe());
        session.record(Phase::Prepare, failure);
        return false;
    }

    let result = run_validation(session, cancel).await;
    session.record_result(Phase::Prepare, &result);
    result.is_empty()
}
