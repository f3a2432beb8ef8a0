//! One-shot validation scenario run during prepare
//!
//! A single sequential walk over every endpoint against users whose full
//! state is known from fixtures. Each step compares the response with the
//! shadow model and stops the walk at the first mismatch; the resulting
//! failures are recorded in the prepare phase by the caller.

pub mod admin;
pub mod user;

use crate::session::{Session, ADMIN_USER_ID};
use chrono::{DateTime, TimeZone, Utc};
use isubench_api_types::{
    AddExpItem, AdminBanResponse, AdminLoginResponse, AdminMasterResponse, AdminUserResponse, CardMaster,
    CreateUserResponse, DrawGachaResponse, ExpItemMaster, FailResponse, GachaData, HomeResponse, ItemListResponse,
    ListGachaResponse, ListPresentResponse, LoginBonusRewardMaster, LoginResponse, PresentAllMaster,
    UpdatedResourcesResponse, ValidationUserFixture,
};
use isubench_config::FixturesConfig;
use isubench_core::shadow::active_gachas;
use isubench_core::{
    assert_status, parse_json_body, read_fixtures, ErrorCode, Failure, Hint, Set, ValidationResult, ValidationUser,
};
use isubench_http::actions::{self, Stamp};
use isubench_http::{flow_date, isu_date_for, Agent, AgentKind, Captured, HttpError, Login};
use isubench_logging::{contestant, StepTimer};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const VALIDATION_USER_FILE: &str = "validateUserInitialize.json";
pub const EXP_ITEM_MASTER_FILE: &str = "expItemMaster.json";
pub const CARD_MASTER_FILE: &str = "cardMaster.json";
pub const LOGIN_BONUS_REWARD_MASTER_FILE: &str = "loginBonusRewardMaster.json";
pub const GACHA_MASTER_FILE: &str = "gachaAllItemMaster.json";
pub const PRESENT_ALL_MASTER_FILE: &str = "presentAllMaster.json";

/// Session id no login ever hands out
pub const FAIL_SESSION_ID: &str = "failsession";

/// 2022-08-26 15:00:00 UTC, midnight of the game day in the target's time zone
pub const DAY_BOUNDARY: i64 = 1661526000;

pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_BAD_REQUEST: u16 = 400;

pub const MESSAGE_NOT_FOUND: &str = "not found user";
pub const MESSAGE_UNAUTHORIZED: &str = "unauthorized user";
pub const MESSAGE_FORBIDDEN: &str = "forbidden";
pub const MESSAGE_INVALID_TOKEN: &str = "invalid token";

type Checked<T> = Result<T, ValidationResult>;

/// Fixture users and the master tables the checks derive expectations from
#[derive(Debug, Default)]
pub struct ValidationMasters {
    pub users: Set<ValidationUser>,
    pub exp_items: Vec<ExpItemMaster>,
    pub cards: Vec<CardMaster>,
    pub login_bonus_rewards: Vec<LoginBonusRewardMaster>,
    pub gachas: Vec<GachaData>,
    pub present_alls: Vec<PresentAllMaster>,
}

async fn load_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Failure> {
    read_fixtures(path)
        .await
        .map_err(|e| Failure::new(ErrorCode::ValidationFailedToLoadJson, e.to_string()))
}

impl ValidationMasters {
    pub async fn load(fixtures: &FixturesConfig) -> Result<Self, Failure> {
        let users = Set::new();
        let fixture_users: Vec<ValidationUserFixture> = load_file(&fixtures.dump_file(VALIDATION_USER_FILE)).await?;
        for fixture in fixture_users {
            users
                .add(ValidationUser::from(fixture))
                .map_err(|e| Failure::new(ErrorCode::ValidationFailedToLoadJson, e.to_string()))?;
        }
        Ok(Self {
            users,
            exp_items: load_file(&fixtures.dump_file(EXP_ITEM_MASTER_FILE)).await?,
            cards: load_file(&fixtures.dump_file(CARD_MASTER_FILE)).await?,
            login_bonus_rewards: load_file(&fixtures.dump_file(LOGIN_BONUS_REWARD_MASTER_FILE)).await?,
            gachas: load_file(&fixtures.dump_file(GACHA_MASTER_FILE)).await?,
            present_alls: load_file(&fixtures.dump_file(PRESENT_ALL_MASTER_FILE)).await?,
        })
    }
}

/// The date a request is stamped with and the `now` the target derives from it
#[derive(Debug, Clone)]
struct Moment {
    master_version: String,
    date: DateTime<Utc>,
}

impl Moment {
    fn game_day(master_version: String) -> Self {
        Self::at(master_version, flow_date(Utc::now()))
    }

    fn at(master_version: String, date: DateTime<Utc>) -> Self {
        Self { master_version, date }
    }

    fn stamp(&self) -> Stamp<'_> {
        Stamp::new(&self.master_version, self.date)
    }

    fn now(&self) -> i64 {
        isu_date_for(&self.master_version, Some(self.date)).timestamp()
    }
}

fn boundary_date(offset: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(DAY_BOUNDARY + offset, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn random_password() -> String {
    std::iter::repeat_with(fastrand::alphanumeric).take(16).collect()
}

fn missing_fixture(what: &str) -> Failure {
    Failure::new(ErrorCode::ValidationFailedToLoadJson, format!("no {} in the validation fixtures", what))
}

/// Run the validation walk; an empty result means the target passed
///
/// Each step that fails nests its result under the walk and ends it. A walk
/// interrupted by cancellation is marked canceled instead.
pub async fn run_validation(session: &Session, cancel: &CancellationToken) -> ValidationResult {
    let _timer = StepTimer::start("validation");
    contestant!("Validating the application");

    let mut walk = ValidationResult::new();
    match ValidationMasters::load(&session.config.fixtures).await {
        Ok(masters) => {
            let checker = Checker {
                session,
                cancel,
                masters: &masters,
            };
            checker.drive(&mut walk).await;
        }
        Err(failure) => walk.nest(failure.into()),
    }
    session.admin.clear_agent();

    if walk.is_canceled() {
        debug!("Validation cut short by cancellation");
    } else if walk.is_empty() {
        contestant!("Validation passed");
    } else {
        contestant!("Validation failed");
    }
    walk
}

struct Checker<'a> {
    session: &'a Session,
    cancel: &'a CancellationToken,
    masters: &'a ValidationMasters,
}

impl Checker<'_> {
    fn received(&self, response: Result<Captured, HttpError>) -> Checked<Captured> {
        response.map_err(|e| ValidationResult::from_request_error(&e, ErrorCode::ValidationInvalidRequest, self.cancel))
    }

    /// Status first, then the decoded body together with the endpoint label
    fn body<T: DeserializeOwned>(&self, response: Result<Captured, HttpError>, status: u16) -> Checked<(String, T)> {
        let res = self.received(response)?;
        let endpoint = res.endpoint();
        assert_status(status, res.status, &Hint::new(endpoint.clone(), ""))?;
        let body = parse_json_body(&res, ErrorCode::ValidationInvalidResponseBody)?;
        Ok((endpoint, body))
    }

    fn rejected(&self, response: Result<Captured, HttpError>, status: u16, message: &str) -> Checked<()> {
        let (endpoint, body) = self.body::<FailResponse>(response, status)?;
        user::check_fail_body(&body, status, message, &endpoint)?;
        Ok(())
    }

    fn fresh_agent(&self) -> Checked<Agent> {
        self.session
            .factory
            .new_agent(AgentKind::Default)
            .map_err(|e| Failure::new(ErrorCode::InternalCreatingAgent, e.to_string()).into())
    }

    fn moment(&self) -> Moment {
        Moment::game_day(self.session.master_version())
    }

    /// Fold one step's outcome into the walk; `None` ends the walk
    fn settle<T>(&self, walk: &mut ValidationResult, step: Checked<T>) -> Option<T> {
        if self.cancel.is_cancelled() {
            walk.mark_canceled();
            return None;
        }
        match step {
            Ok(value) => Some(value),
            Err(result) => {
                walk.nest(result);
                None
            }
        }
    }

    async fn drive(&self, walk: &mut ValidationResult) {
        let rewards = &self.masters.login_bonus_rewards;

        if self.settle(walk, self.day_boundary().await).is_none() {
            return;
        }
        let Some(mut shadow) = self.settle(walk, self.pick_user()) else {
            return;
        };
        let Some((admin_agent, admin_session)) = self.settle(walk, self.admin_view(&shadow).await) else {
            return;
        };
        let Some(agent) = self.settle(walk, self.unknown_login().await) else {
            return;
        };
        let Some(newcomer) = self.settle(walk, self.register().await) else {
            return;
        };
        let Some(login) = self.settle(walk, self.home_visit(&agent, &newcomer, &mut shadow, rewards).await) else {
            return;
        };
        if self.settle(walk, self.deck(&agent, &login, &mut shadow).await).is_none() {
            return;
        }
        if self.settle(walk, self.exp(&agent, &login, &mut shadow).await).is_none() {
            return;
        }
        if self.settle(walk, self.presents(&agent, &login, &shadow).await).is_none() {
            return;
        }
        if self.settle(walk, self.gacha(&agent, &login, &shadow).await).is_none() {
            return;
        }
        self.settle(
            walk,
            self.admin_close(&admin_agent, &admin_session, &agent, &shadow).await,
        );
    }

    fn pick_user(&self) -> Checked<ValidationUser> {
        let Some(picked) = self.masters.users.random() else {
            return Err(missing_fixture("validation user").into());
        };
        Ok((*picked).clone())
    }

    /// Admin login, then the admin view of the picked user; returns the admin agent and session
    async fn admin_view(&self, shadow: &ValidationUser) -> Checked<(Agent, String)> {
        let admin_agent = self
            .session
            .admin
            .agent(&self.session.factory)
            .map_err(|e| Failure::new(ErrorCode::InternalCreatingAgent, e.to_string()))?;
        let admin_session = self.admin_login(&admin_agent).await?;

        let version = self.session.master_version();
        let res = actions::get_admin_user(&admin_agent, self.cancel, &admin_session, &version, shadow.id).await;
        let (endpoint, body) = self.body::<AdminUserResponse>(res, 200)?;
        admin::check_admin_user(&body, shadow, &endpoint)?;
        Ok((admin_agent, admin_session))
    }

    /// An id the target never issued cannot log in; returns the agent the picked user plays on
    async fn unknown_login(&self) -> Checked<Agent> {
        let agent = self.fresh_agent()?;
        let moment = self.moment();
        let res = actions::post_login(
            &agent,
            self.cancel,
            moment.stamp(),
            fastrand::i64(1..=10000),
            &fastrand::i64(10..100009).to_string(),
        )
        .await;
        self.rejected(res, STATUS_NOT_FOUND, MESSAGE_NOT_FOUND)?;
        Ok(agent)
    }

    /// Login, then home with a forged session, the real one and a stranger's, then the reward
    async fn home_visit(
        &self,
        agent: &Agent,
        newcomer: &Login,
        shadow: &mut ValidationUser,
        rewards: &[LoginBonusRewardMaster],
    ) -> Checked<Login> {
        let moment = self.moment();
        let res = actions::post_login(agent, self.cancel, moment.stamp(), shadow.id, &shadow.viewer_id).await;
        let (endpoint, body) = self.body::<LoginResponse>(res, 200)?;
        user::check_login(&body, shadow, rewards, moment.now(), &endpoint, true)?;
        let login = Login {
            session_id: body.session_id,
            viewer_id: body.viewer_id,
        };

        let forged = Login {
            session_id: FAIL_SESSION_ID.to_string(),
            viewer_id: login.viewer_id.clone(),
        };
        let res = actions::get_home(agent, self.cancel, self.moment().stamp(), shadow.id, &forged).await;
        self.rejected(res, STATUS_UNAUTHORIZED, MESSAGE_UNAUTHORIZED)?;

        let moment = self.moment();
        let res = actions::get_home(agent, self.cancel, moment.stamp(), shadow.id, &login).await;
        let (endpoint, body) = self.body::<HomeResponse>(res, 200)?;
        user::check_home(&body, shadow, rewards, moment.now(), &endpoint)?;

        let stranger = self.fresh_agent()?;
        let res = actions::get_home(&stranger, self.cancel, self.moment().stamp(), shadow.id, newcomer).await;
        self.rejected(res, STATUS_FORBIDDEN, MESSAGE_FORBIDDEN)?;

        let moment = self.moment();
        let res = actions::post_reward(agent, self.cancel, moment.stamp(), shadow.id, &login).await;
        let (endpoint, body) = self.body::<UpdatedResourcesResponse>(res, 200)?;
        user::check_reward(&body, shadow, moment.now(), &endpoint)?;
        Ok(login)
    }

    /// The master view, then ban the picked user and watch their next login bounce
    async fn admin_close(
        &self,
        admin_agent: &Agent,
        admin_session: &str,
        agent: &Agent,
        shadow: &ValidationUser,
    ) -> Checked<()> {
        let version = self.session.master_version();
        let res = actions::get_admin_master(admin_agent, self.cancel, admin_session, &version).await;
        let (endpoint, body) = self.body::<AdminMasterResponse>(res, 200)?;
        admin::check_admin_master(&body, &self.masters.gachas, &self.masters.login_bonus_rewards, &endpoint)?;

        let res = actions::post_admin_ban(admin_agent, self.cancel, admin_session, &version, shadow.id).await;
        let (endpoint, body) = self.body::<AdminBanResponse>(res, 200)?;
        admin::check_admin_ban(&body, shadow, &endpoint)?;

        let res = actions::post_login(agent, self.cancel, self.moment().stamp(), shadow.id, &shadow.viewer_id).await;
        self.rejected(res, STATUS_FORBIDDEN, MESSAGE_FORBIDDEN)
    }

    /// Two logins straddling midnight: each one advances the bonus
    async fn day_boundary(&self) -> Checked<()> {
        let Some(picked) = self.masters.users.pop() else {
            return Err(missing_fixture("validation user").into());
        };
        let mut shadow = (*picked).clone();
        let agent = self.fresh_agent()?;
        let rewards = &self.masters.login_bonus_rewards;

        let before = Moment::at(self.session.master_version(), boundary_date(-1));
        let res = actions::post_login(&agent, self.cancel, before.stamp(), shadow.id, &shadow.viewer_id).await;
        let (endpoint, body) = self.body::<LoginResponse>(res, 200)?;
        user::check_login(&body, &mut shadow, rewards, before.now(), &endpoint, true)?;

        let after = Moment::at(self.session.master_version(), boundary_date(1));
        let res = actions::post_login(&agent, self.cancel, after.stamp(), shadow.id, &shadow.viewer_id).await;
        let (endpoint, body) = self.body::<LoginResponse>(res, 200)?;
        user::check_login(&body, &mut shadow, rewards, after.now(), &endpoint, false)?;
        Ok(())
    }

    /// Both rejections, then a real admin login; returns the admin session id
    async fn admin_login(&self, agent: &Agent) -> Checked<String> {
        let version = self.session.master_version();
        let res = actions::post_admin_login(agent, self.cancel, &version, fastrand::i64(1..=10000), &random_password())
            .await;
        self.rejected(res, STATUS_NOT_FOUND, MESSAGE_NOT_FOUND)?;

        let res = actions::post_admin_login(agent, self.cancel, &version, ADMIN_USER_ID, &random_password()).await;
        self.rejected(res, STATUS_UNAUTHORIZED, MESSAGE_UNAUTHORIZED)?;

        let identity = self.session.admin.identity();
        let res = actions::post_admin_login(agent, self.cancel, &version, identity.user_id, &identity.password).await;
        let (endpoint, body) = self.body::<AdminLoginResponse>(res, 200)?;
        admin::check_admin_session(&body, identity.user_id, &endpoint)?;
        Ok(body.session.session_id)
    }

    /// Register a popped platform; returns the newcomer's session
    async fn register(&self) -> Checked<Login> {
        let Some(platform) = self.session.platforms.pop() else {
            return Err(missing_fixture("platform").into());
        };
        let agent = platform
            .agent(&self.session.factory)
            .map_err(|e| Failure::new(ErrorCode::InternalCreatingAgent, e.to_string()))?;
        let identity = platform.identity();
        let moment = self.moment();
        let res = actions::post_user(
            &agent,
            self.cancel,
            moment.stamp(),
            identity.platform_id,
            identity.platform_type,
        )
        .await;
        platform.clear_agent();

        let (endpoint, body) = self.body::<CreateUserResponse>(res, 200)?;
        user::check_registration(
            &body,
            identity,
            &self.masters.login_bonus_rewards,
            &self.masters.present_alls,
            moment.now(),
            &endpoint,
        )?;
        Ok(Login {
            session_id: body.session_id,
            viewer_id: body.viewer_id,
        })
    }

    async fn deck(&self, agent: &Agent, login: &Login, shadow: &mut ValidationUser) -> Checked<()> {
        let Some(card_ids) = shadow.last_three_card_ids() else {
            return Err(missing_fixture("three cards").into());
        };
        let moment = self.moment();
        let res = actions::post_set_deck(agent, self.cancel, moment.stamp(), shadow.id, login, card_ids.to_vec()).await;
        let (endpoint, body) = self.body::<UpdatedResourcesResponse>(res, 200)?;
        user::check_set_deck(&body, shadow.id, card_ids, moment.now(), &endpoint)?;

        let res = actions::get_home(agent, self.cancel, self.moment().stamp(), shadow.id, login).await;
        let (endpoint, body) = self.body::<HomeResponse>(res, 200)?;
        user::check_home_after_deck(&body, shadow, card_ids, &endpoint)?;
        Ok(())
    }

    async fn exp(&self, agent: &Agent, login: &Login, shadow: &mut ValidationUser) -> Checked<()> {
        let res = actions::get_item_list(agent, self.cancel, self.moment().stamp(), shadow.id, login).await;
        let (endpoint, listing) = self.body::<ItemListResponse>(res, 200)?;
        user::check_item_list(&listing, shadow, &endpoint)?;

        let Some(card_id) = shadow.cards.last().map(|c| c.id) else {
            return Err(missing_fixture("card").into());
        };
        let Some(item) = shadow.first_exp_item().cloned() else {
            return Err(missing_fixture("exp item").into());
        };
        let used = vec![AddExpItem { id: item.id, amount: 1 }];

        let moment = self.moment();
        let res = actions::post_add_exp(
            agent,
            self.cancel,
            moment.stamp(),
            shadow.id,
            login,
            card_id,
            &listing.one_time_token,
            used.clone(),
        )
        .await;
        let (endpoint, body) = self.body::<UpdatedResourcesResponse>(res, 200)?;
        user::check_add_exp(
            &body,
            shadow,
            card_id,
            &item,
            1,
            &self.masters.exp_items,
            &self.masters.cards,
            moment.now(),
            &endpoint,
        )?;

        let res = actions::post_add_exp(
            agent,
            self.cancel,
            self.moment().stamp(),
            shadow.id,
            login,
            card_id,
            &listing.one_time_token,
            used,
        )
        .await;
        self.rejected(res, STATUS_BAD_REQUEST, MESSAGE_INVALID_TOKEN)
    }

    async fn presents(&self, agent: &Agent, login: &Login, shadow: &ValidationUser) -> Checked<()> {
        let res = actions::get_present_list(agent, self.cancel, self.moment().stamp(), shadow.id, login).await;
        let (endpoint, page) = self.body::<ListPresentResponse>(res, 200)?;
        user::check_present_list(&page, shadow, &endpoint)?;

        let received = page.presents;
        let ids = received.iter().map(|p| p.id).collect();
        let moment = self.moment();
        let res = actions::post_receive_presents(agent, self.cancel, moment.stamp(), shadow.id, login, ids).await;
        let (endpoint, body) = self.body::<UpdatedResourcesResponse>(res, 200)?;
        user::check_receive(&body, &received, moment.now(), &endpoint)?;

        let res = actions::get_present_list(agent, self.cancel, self.moment().stamp(), shadow.id, login).await;
        let (endpoint, body) = self.body::<ListPresentResponse>(res, 200)?;
        user::check_page_after_receive(&body, shadow, &endpoint)?;

        let res = actions::get_item_list(agent, self.cancel, self.moment().stamp(), shadow.id, login).await;
        let (endpoint, body) = self.body::<ItemListResponse>(res, 200)?;
        user::check_items_after_receive(&body, &received, &endpoint)?;
        Ok(())
    }

    async fn gacha(&self, agent: &Agent, login: &Login, shadow: &ValidationUser) -> Checked<()> {
        let moment = self.moment();
        let res = actions::get_gacha_list(agent, self.cancel, moment.stamp(), shadow.id, login).await;
        let (endpoint, listing) = self.body::<ListGachaResponse>(res, 200)?;
        user::check_gacha_list(&listing, &self.masters.gachas, moment.now(), &endpoint)?;

        let active = active_gachas(&self.masters.gachas, moment.now());
        if active.is_empty() {
            return Err(missing_fixture("active gacha").into());
        }
        let gacha = &active[fastrand::usize(..active.len())];

        let moment = self.moment();
        let res = actions::post_draw_gacha(
            agent,
            self.cancel,
            moment.stamp(),
            shadow.id,
            login,
            gacha.gacha.id,
            &listing.one_time_token,
        )
        .await;
        let (endpoint, body) = self.body::<DrawGachaResponse>(res, 200)?;
        user::check_gacha_draw(&body, gacha, shadow.id, moment.now(), &endpoint)?;

        let res = actions::post_draw_gacha(
            agent,
            self.cancel,
            self.moment().stamp(),
            shadow.id,
            login,
            gacha.gacha.id,
            &listing.one_time_token,
        )
        .await;
        self.rejected(res, STATUS_BAD_REQUEST, MESSAGE_INVALID_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isubench_config::BenchConfig;
    use isubench_core::Phase;
    use isubench_http::HttpMethod;

    fn captured(status: u16, body: &str) -> Captured {
        Captured {
            method: HttpMethod::Get,
            path: "/user/1/home".to_string(),
            status,
            content_type: Some("application/json".to_string()),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_boundary_straddles_midnight() {
        assert_eq!(boundary_date(-1).timestamp(), 1661525999);
        assert_eq!(boundary_date(1).timestamp(), 1661526001);
        let moment = Moment::at("1".to_string(), boundary_date(-1));
        assert_eq!(moment.now(), 1661525999);
        let shifted = Moment::at("2".to_string(), boundary_date(-1));
        assert_eq!(shifted.now(), 1661525999 + 86400);
    }

    #[test]
    fn test_rejection_checks_status_and_body() {
        let session = Session::new(BenchConfig::default()).unwrap();
        let cancel = CancellationToken::new();
        let masters = ValidationMasters::default();
        let checker = Checker {
            session: &session,
            cancel: &cancel,
            masters: &masters,
        };

        let ok = captured(401, r#"{"status_code":401,"message":"unauthorized user"}"#);
        assert!(checker.rejected(Ok(ok), 401, MESSAGE_UNAUTHORIZED).is_ok());

        let wrong_status = captured(200, r#"{"status_code":401,"message":"unauthorized user"}"#);
        let result = checker.rejected(Ok(wrong_status), 401, MESSAGE_UNAUTHORIZED).unwrap_err();
        assert_eq!(result.leaves()[0].codes(), &[ErrorCode::ValidationInvalidStatusCode]);

        let wrong_message = captured(401, r#"{"status_code":401,"message":"nope"}"#);
        let result = checker.rejected(Ok(wrong_message), 401, MESSAGE_UNAUTHORIZED).unwrap_err();
        assert_eq!(result.leaves()[0].codes(), &[ErrorCode::ValidationInvalidResponseBody]);
    }

    #[tokio::test]
    async fn test_missing_fixtures_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BenchConfig::default();
        config.fixtures.dump_dir = dir.path().to_path_buf();
        let session = Session::new(config).unwrap();

        let result = run_validation(&session, &CancellationToken::new()).await;
        let leaves = result.leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].codes(), &[ErrorCode::ValidationFailedToLoadJson]);

        session.record_result(Phase::Prepare, &result);
        assert_eq!(session.errors.count(Phase::Prepare), 1);
    }

    /// One fixture user and empty masters; enough to reach the first login
    fn write_walk_fixtures(dir: &Path) {
        let write = |name: &str, body: &str| std::fs::write(dir.join(name), body).unwrap();
        write(
            VALIDATION_USER_FILE,
            r#"[{"user_id":1,"user_type":"royal","viewer_id":"v1","user":{"id":1}}]"#,
        );
        for name in [
            EXP_ITEM_MASTER_FILE,
            CARD_MASTER_FILE,
            LOGIN_BONUS_REWARD_MASTER_FILE,
            GACHA_MASTER_FILE,
            PRESENT_ALL_MASTER_FILE,
        ] {
            write(name, "[]");
        }
    }

    fn unreachable_session(dir: &Path) -> Session {
        let mut config = BenchConfig::default();
        config.fixtures.dump_dir = dir.to_path_buf();
        config.target.host = "127.0.0.1:9".to_string();
        Session::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_target_fails_first_login() {
        let dir = tempfile::tempdir().unwrap();
        write_walk_fixtures(dir.path());
        let session = unreachable_session(dir.path());

        let result = run_validation(&session, &CancellationToken::new()).await;
        assert!(!result.is_canceled());
        let leaves = result.leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].codes(), &[ErrorCode::ValidationInvalidRequest]);
    }

    #[tokio::test]
    async fn test_cancelled_walk_is_canceled_without_failures() {
        let dir = tempfile::tempdir().unwrap();
        write_walk_fixtures(dir.path());
        let session = unreachable_session(dir.path());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = run_validation(&session, &cancel).await;
        assert!(result.is_canceled());
        assert!(!result.is_empty());
        assert!(result.leaves().is_empty());

        session.record_result(Phase::Prepare, &result);
        assert!(session.errors.is_empty());
    }
}
