//! Master refresh: once per run the admin uploads a new master bundle
//!
//! Every flow started after the upload must carry the new version. A refresh
//! that fails disqualifies the run, so the failure is recorded as internal
//! and the load phase is cancelled.

use crate::session::Session;
use futures::FutureExt;
use isubench_api_types::{AdminLoginResponse, AdminUpdateMasterResponse};
use isubench_core::{parse_json_body, validate_response, with_status_code, ErrorCode, Failure, Phase};
use isubench_execution::{sleep_with_cancel, ScenarioFn};
use isubench_http::{actions, Agent, Captured, HttpError};
use isubench_logging::{admin, contestant, StepTimer};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const VERSION_MASTER_FILE: &str = "version_master.csv";
pub const PRESENT_ALL_MASTER_FILE: &str = "present_all_master.csv";

#[derive(Debug)]
enum RefreshError {
    Canceled,
    Failed(String),
}

type RefreshResult<T> = Result<T, RefreshError>;

pub fn scenario(session: Arc<Session>) -> ScenarioFn {
    Arc::new(move |cancel| {
        let session = session.clone();
        async move { run(&session, &cancel).await }.boxed()
    })
}

pub async fn run(session: &Session, cancel: &CancellationToken) {
    if !sleep_with_cancel(cancel, session.config.load.master_refresh_delay).await {
        return;
    }
    let _timer = StepTimer::start("master refresh");

    match refresh(session, cancel).await {
        Ok(version) => contestant!("Master data refreshed; the master version is now {}", version),
        Err(RefreshError::Canceled) => debug!("Master refresh cut short by the end of the run"),
        Err(RefreshError::Failed(reason)) => {
            contestant!("Master refresh failed, which fails the run: {}", reason);
            admin!("Master refresh failed, stopping the load phase: {}", reason);
            session.record(
                Phase::Load,
                Failure::new(ErrorCode::InternalCannotRefreshMaster, reason),
            );
            cancel.cancel();
        }
    }
    session.admin.clear_agent();
}

async fn refresh(session: &Session, cancel: &CancellationToken) -> RefreshResult<String> {
    let agent = session
        .admin
        .agent(&session.factory)
        .map_err(|e| RefreshError::Failed(format!("cannot create the admin client: {}", e)))?;
    let identity = session.admin.identity();

    let res = actions::post_admin_login(
        &agent,
        cancel,
        &session.master_version(),
        identity.user_id,
        &identity.password,
    )
    .await;
    let login: AdminLoginResponse = expect_json(session, cancel, res)?;
    let session_id = login.session.session_id;

    let version = upload(session, cancel, &agent, &session_id).await?;
    session.set_master_version(version.clone());

    let res = actions::delete_admin_logout(&agent, cancel, &session_id, &session.master_version()).await;
    expect_status(session, cancel, res, 204)?;
    Ok(version)
}

async fn upload(
    session: &Session,
    cancel: &CancellationToken,
    agent: &Agent,
    session_id: &str,
) -> RefreshResult<String> {
    let fixtures = &session.config.fixtures;
    let res = actions::put_admin_master(
        agent,
        cancel,
        session_id,
        &session.master_version(),
        &fixtures.resource_file(VERSION_MASTER_FILE),
        &fixtures.resource_file(PRESENT_ALL_MASTER_FILE),
    )
    .await;
    let updated: AdminUpdateMasterResponse = expect_json(session, cancel, res)?;
    Ok(updated.version_master.master_version)
}

fn expect_status(
    session: &Session,
    cancel: &CancellationToken,
    response: Result<Captured, HttpError>,
    status: u16,
) -> RefreshResult<Captured> {
    let res = response.map_err(|e| {
        if e.is_canceled() || cancel.is_cancelled() {
            RefreshError::Canceled
        } else {
            RefreshError::Failed(e.to_string())
        }
    })?;
    let check = with_status_code(status);
    let result = validate_response(&res, &[&check]);
    session.record_result(Phase::Load, &result);
    if let Some(failure) = result.leaves().first() {
        return Err(RefreshError::Failed(failure.describe()));
    }
    Ok(res)
}

fn expect_json<T: DeserializeOwned>(
    session: &Session,
    cancel: &CancellationToken,
    response: Result<Captured, HttpError>,
) -> RefreshResult<T> {
    let res = expect_status(session, cancel, response, 200)?;
    parse_json_body(&res, ErrorCode::ScenarioInvalidJson).map_err(|failure| {
        let reason = failure.describe();
        session.record(Phase::Load, failure);
        RefreshError::Failed(reason)
    })
}
