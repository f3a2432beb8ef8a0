//! Ban flow: a banned user tries to log in and must be turned away

use super::{Attempt, Halt, ScenarioResult, Step, STATUS_CONFLICT};
use crate::session::Session;
use futures::FutureExt;
use isubench_api_types::FailResponse;
use isubench_core::{
    parse_json_body, validate_response, with_status_code, ErrorCode, Identified, Phase, ScoreTag, User,
};
use isubench_execution::{sleep_with_cancel, ScenarioFn};
use isubench_http::actions::{self, Stamp};
use isubench_http::{Agent, Captured, HttpError};
use isubench_logging::StepTimer;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Status a banned user's login is rejected with
pub const STATUS_BANNED: u16 = 403;

pub fn scenario(session: Arc<Session>) -> ScenarioFn {
    Arc::new(move |cancel| {
        let session = session.clone();
        async move { run(&session, &cancel).await }.boxed()
    })
}

pub async fn run(session: &Session, cancel: &CancellationToken) {
    let _timer = StepTimer::start("ban flow");
    let Some(user) = session.ban_users.random() else {
        return;
    };
    let Some(agent) = session.agent_or_record(Phase::Load, |factory| user.agent(factory)) else {
        return;
    };

    while !cancel.is_cancelled() {
        let master_version = session.master_version();
        let ledger = Attempt::new(session);
        match ScenarioResult::from(attempt(&ledger, cancel, &user, &agent, &master_version).await) {
            ScenarioResult::Rewind => debug!("ban flow for user {} rewinds", user.id()),
            ScenarioResult::Continue => {
                ledger.commit();
                break;
            }
        }
    }

    sleep_with_cancel(cancel, session.config.load.ban_interval).await;
    user.clear_agent();
}

async fn attempt(
    ledger: &Attempt<'_>,
    cancel: &CancellationToken,
    user: &User,
    agent: &Agent,
    master_version: &str,
) -> Step<()> {
    let identity = user.identity();
    // Banned logins carry the real clock rather than the game day
    let res = actions::post_login(
        agent,
        cancel,
        Stamp::now(master_version),
        identity.user_id,
        &identity.viewer_id,
    )
    .await;
    check_rejection(ledger, cancel, res)?;
    Ok(())
}

/// The rejection itself is the success case: a 403 with a failure body scores the ban tag
fn check_rejection(
    ledger: &Attempt<'_>,
    cancel: &CancellationToken,
    response: Result<Captured, HttpError>,
) -> Step<bool> {
    let res = match response {
        Ok(res) => res,
        Err(e) => {
            ledger.record_request_error(&e, ErrorCode::ScenarioInvalidRequest, cancel);
            return Ok(false);
        }
    };
    if res.status == STATUS_CONFLICT {
        return Err(Halt::Rewind);
    }
    let status = with_status_code(STATUS_BANNED);
    let mut result = validate_response(&res, &[&status]);
    if let Err(failure) = parse_json_body::<FailResponse>(&res, ErrorCode::ScenarioInvalidJson) {
        result.push(failure);
    }
    if result.is_empty() {
        ledger.score(ScoreTag::LoginBan);
        return Ok(true);
    }
    ledger.record(result);
    Ok(false)
}
