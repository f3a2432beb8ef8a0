//! Load-phase flows
//!
//! Every flow is a fixed sequence of steps run as one attempt. A step that
//! sees a 422 (the master version moved under it) rewinds the attempt: the
//! flow re-reads the current master version and starts over from the first
//! step. Any other failure is recorded in the load phase and, except for the
//! steps that produce a session or a token, the attempt carries on.
//!
//! Scores, failures and success counts of an attempt are held in an
//! [`Attempt`] and reach the session only when the attempt is not rewound.

pub mod ban;
pub mod login;
pub mod master_refresh;
pub mod registration;

use crate::session::Session;
use chrono::Utc;
use isubench_api_types::{DrawGachaResponse, ListGachaResponse, ListPresentResponse, UpdatedResourcesResponse};
use isubench_core::{
    parse_json_body, validate_response, with_status_code, ErrorCode, Phase, ScoreTag, ValidationResult,
};
use isubench_http::actions::{self, Stamp};
use isubench_http::{flow_date, Agent, Captured, HttpError, Login};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Status the target answers with when a request carries a stale master version
pub const STATUS_CONFLICT: u16 = 422;

/// Gacha every load flow draws from
pub const DRAW_GACHA_ID: i64 = 37;

/// Verdict of a step on the attempt it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioResult {
    Continue,
    Rewind,
}

/// Why an attempt stopped before its last step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// Give up on this iteration
    Stop,
    /// Start the attempt over on the current master version
    Rewind,
}

pub type Step<T> = Result<T, Halt>;

impl From<Step<()>> for ScenarioResult {
    fn from(step: Step<()>) -> Self {
        match step {
            Err(Halt::Rewind) => ScenarioResult::Rewind,
            _ => ScenarioResult::Continue,
        }
    }
}

#[derive(Debug, Default)]
struct Pending {
    tags: Vec<ScoreTag>,
    results: Vec<ValidationResult>,
    logins: u64,
    registrations: u64,
}

/// What one attempt of a flow produced, applied to the session on commit
pub(crate) struct Attempt<'a> {
    pub session: &'a Session,
    pending: Mutex<Pending>,
}

impl<'a> Attempt<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            pending: Mutex::new(Pending::default()),
        }
    }

    pub fn score(&self, tag: ScoreTag) {
        self.pending.lock().tags.push(tag);
    }

    pub fn record(&self, result: ValidationResult) {
        if !result.is_empty() {
            self.pending.lock().results.push(result);
        }
    }

    pub fn record_request_error(&self, err: &HttpError, code: ErrorCode, cancel: &CancellationToken) {
        self.record(ValidationResult::from_request_error(err, code, cancel));
    }

    pub fn count_login(&self) {
        self.pending.lock().logins += 1;
    }

    pub fn count_registration(&self) {
        self.pending.lock().registrations += 1;
    }

    /// Apply everything the attempt produced; dropping it instead discards it
    pub fn commit(self) {
        let pending = self.pending.into_inner();
        for result in &pending.results {
            self.session.record_result(Phase::Load, result);
        }
        for tag in pending.tags {
            self.session.score(tag);
        }
        for _ in 0..pending.logins {
            self.session.count_login();
        }
        for _ in 0..pending.registrations {
            self.session.count_registration();
        }
    }
}

/// Stop the attempt once the run is over
pub(crate) fn still_running(cancel: &CancellationToken) -> Step<()> {
    if cancel.is_cancelled() {
        return Err(Halt::Stop);
    }
    Ok(())
}

/// Stamp for a load-phase request: the fixed game day at the current time of day
pub(crate) fn flow_stamp(master_version: &str) -> Stamp<'_> {
    Stamp::new(master_version, flow_date(Utc::now()))
}

/// Split off transport failures and conflicts; `None` means the failure was recorded
fn received(
    attempt: &Attempt<'_>,
    cancel: &CancellationToken,
    response: Result<Captured, HttpError>,
) -> Step<Option<Captured>> {
    match response {
        Err(e) => {
            attempt.record_request_error(&e, ErrorCode::ScenarioInvalidRequest, cancel);
            Ok(None)
        }
        Ok(res) if res.status == STATUS_CONFLICT => {
            debug!("{} answered 422, rewinding", res.endpoint());
            Err(Halt::Rewind)
        }
        Ok(res) => Ok(Some(res)),
    }
}

/// Require a 200 and score `tag`; `Ok(false)` when the step failed
pub(crate) fn check_ok(
    attempt: &Attempt<'_>,
    cancel: &CancellationToken,
    response: Result<Captured, HttpError>,
    tag: ScoreTag,
) -> Step<bool> {
    let Some(res) = received(attempt, cancel, response)? else {
        return Ok(false);
    };
    let status = with_status_code(200);
    let result = validate_response(&res, &[&status]);
    if result.is_empty() {
        attempt.score(tag);
        return Ok(true);
    }
    attempt.record(result);
    Ok(false)
}

/// Require a 200 with a decodable JSON body and score `tag`
pub(crate) fn check_json<T: DeserializeOwned>(
    attempt: &Attempt<'_>,
    cancel: &CancellationToken,
    response: Result<Captured, HttpError>,
    tag: ScoreTag,
) -> Step<Option<T>> {
    let Some(res) = received(attempt, cancel, response)? else {
        return Ok(None);
    };
    let status = with_status_code(200);
    let mut result = validate_response(&res, &[&status]);
    let body = match parse_json_body::<T>(&res, ErrorCode::ScenarioInvalidJson) {
        Ok(body) => Some(body),
        Err(failure) => {
            result.push(failure);
            None
        }
    };
    if result.is_empty() {
        attempt.score(tag);
        return Ok(body);
    }
    attempt.record(result);
    Ok(None)
}

/// One logged-in user as the shared steps see it
pub(crate) struct Visit<'a> {
    pub attempt: &'a Attempt<'a>,
    pub cancel: &'a CancellationToken,
    pub agent: &'a Agent,
    pub master_version: &'a str,
    pub user_id: i64,
    pub login: &'a Login,
}

impl Visit<'_> {
    fn stamp(&self) -> Stamp<'_> {
        flow_stamp(self.master_version)
    }

    pub async fn show_home(&self) -> Step<()> {
        let res = actions::get_home(self.agent, self.cancel, self.stamp(), self.user_id, self.login).await;
        check_ok(self.attempt, self.cancel, res, ScoreTag::Home)?;
        Ok(())
    }

    pub async fn redeem_reward(&self) -> Step<()> {
        let res = actions::post_reward(self.agent, self.cancel, self.stamp(), self.user_id, self.login).await;
        check_json::<UpdatedResourcesResponse>(self.attempt, self.cancel, res, ScoreTag::Reward)?;
        Ok(())
    }

    /// List the first present page and receive everything on it
    pub async fn accept_gifts(&self) -> Step<()> {
        let res = actions::get_present_list(self.agent, self.cancel, self.stamp(), self.user_id, self.login).await;
        let listed = check_json::<ListPresentResponse>(self.attempt, self.cancel, res, ScoreTag::ListPresent)?;
        still_running(self.cancel)?;

        let ids: Vec<i64> = listed
            .map(|list| list.presents.iter().map(|p| p.id).collect())
            .unwrap_or_default();
        if ids.is_empty() {
            return Ok(());
        }

        let res = actions::post_receive_presents(self.agent, self.cancel, self.stamp(), self.user_id, self.login, ids)
            .await;
        check_json::<UpdatedResourcesResponse>(self.attempt, self.cancel, res, ScoreTag::ReceivePresent)?;
        Ok(())
    }

    /// List gachas, then draw ten from the fixed gacha with the listing's token
    pub async fn redeem_gacha(&self) -> Step<()> {
        let res = actions::get_gacha_list(self.agent, self.cancel, self.stamp(), self.user_id, self.login).await;
        let listed = check_json::<ListGachaResponse>(self.attempt, self.cancel, res, ScoreTag::ListGacha)?;
        still_running(self.cancel)?;

        let token = listed.map(|list| list.one_time_token).unwrap_or_default();
        let res = actions::post_draw_gacha(
            self.agent,
            self.cancel,
            self.stamp(),
            self.user_id,
            self.login,
            DRAW_GACHA_ID,
            &token,
        )
        .await;
        check_json::<DrawGachaResponse>(self.attempt, self.cancel, res, ScoreTag::DrawGacha)?;
        Ok(())
    }
}
