//! A minimal in-process ISUCONQUEST target for end-to-end tests
//!
//! Every user endpoint answers 422 when the request's master version is not
//! the current one, like the real application does. Validation users live in
//! a [`World`] and get stateful answers; load users get canned ones.

#![allow(dead_code)]

pub mod world;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use isubench_api_types::{
    item_type, AddExpRequest, AdminBanResponse, AdminLoginRequest, AdminLoginResponse, AdminMasterResponse,
    AdminSession, AdminUserResponse, CreateUserRequest, CreateUserResponse, DrawGachaRequest, DrawGachaResponse,
    FailResponse, HomeResponse, ItemListResponse, ListGachaResponse, ListPresentResponse, LoginRequest, LoginResponse,
    ReceivePresentRequest, SetDeckRequest, UpdatedResources, UpdatedResourcesResponse, User, UserCard, UserDeck,
    UserDevice, UserItem, UserPresent, VersionMaster,
};
use isubench_config::BenchConfig;
use isubench_scenario::session::{ADMIN_PASSWORD, ADMIN_USER_ID};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use world::{feed_card, Account, World};

/// Load fixture users; above the range the validation walk picks unknown ids from
pub const LOAD_USER_IDS: [i64; 2] = [10001, 10002];
pub const BAN_USER_ID: i64 = 10099;

/// Ids up to this one are unknown to the target
const UNKNOWN_USER_IDS: i64 = 10000;

const PRESENT_PAGE_SIZE: usize = 100;

pub struct StubState {
    pub master_version: Mutex<String>,
    pub banned: Vec<i64>,
    /// Logins still to be answered with 422 before accepting
    pub login_conflicts: AtomicU32,
    /// Home views still to be answered with 422
    pub home_conflicts: AtomicU32,
    pub initialize_status: u16,
    pub login_attempts: AtomicU32,
    /// Answer load-user logins with a body that is not JSON
    pub garbled_logins: bool,
    pub world: World,
    pub accounts: Mutex<HashMap<i64, Account>>,
    pub banned_by_admin: Mutex<HashSet<i64>>,
    pub tokens: Mutex<HashSet<String>>,
    /// One-time tokens refused because they were spent or never issued
    pub rejected_tokens: AtomicU32,
    pub next_id: AtomicI64,
}

impl Default for StubState {
    fn default() -> Self {
        let world = World::standard();
        Self {
            master_version: Mutex::new("1".to_string()),
            banned: Vec::new(),
            login_conflicts: AtomicU32::new(0),
            home_conflicts: AtomicU32::new(0),
            initialize_status: 200,
            login_attempts: AtomicU32::new(0),
            garbled_logins: false,
            accounts: Mutex::new(world.accounts()),
            world,
            banned_by_admin: Mutex::new(HashSet::new()),
            tokens: Mutex::new(HashSet::new()),
            rejected_tokens: AtomicU32::new(0),
            next_id: AtomicI64::new(30000),
        }
    }
}

impl StubState {
    fn is_banned(&self, user_id: i64) -> bool {
        self.banned.contains(&user_id) || self.banned_by_admin.lock().unwrap().contains(&user_id)
    }

    fn issue_token(&self) -> String {
        let token = format!("token-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.tokens.lock().unwrap().insert(token.clone());
        token
    }

    /// Spend a one-time token
    fn redeem(&self, token: &str) -> bool {
        if self.tokens.lock().unwrap().remove(token) {
            return true;
        }
        self.rejected_tokens.fetch_add(1, Ordering::SeqCst);
        false
    }
}

pub struct StubTarget {
    pub addr: SocketAddr,
    pub state: Arc<StubState>,
}

impl StubTarget {
    pub async fn start(state: StubState) -> Result<Self> {
        let state = Arc::new(state);
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self { addr, state })
    }

    /// Default configuration pointed at this target
    pub fn config(&self) -> BenchConfig {
        let mut config = BenchConfig::default();
        config.target.host = self.addr.to_string();
        config.load.grace_period = Duration::from_millis(10);
        config
    }

    pub fn master_version(&self) -> String {
        self.state.master_version.lock().unwrap().clone()
    }
}

fn router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/initialize", post(initialize))
        .route("/login", post(login))
        .route("/user", post(create_user))
        .route("/user/{id}/home", get(home))
        .route("/user/{id}/reward", post(reward))
        .route("/user/{id}/item", get(item_list))
        .route("/user/{id}/card", post(set_deck))
        .route("/user/{id}/card/addexp/{card}", post(add_exp))
        .route("/user/{id}/present/index/{page}", get(present_list))
        .route("/user/{id}/present/receive", post(receive))
        .route("/user/{id}/gacha/index", get(gacha_list))
        .route("/user/{id}/gacha/draw/{gacha}/{times}", post(draw))
        .route("/admin/login", post(admin_login))
        .route("/admin/master", get(admin_master).put(admin_update_master))
        .route("/admin/user/{id}", get(admin_user))
        .route("/admin/user/{id}/ban", post(admin_ban))
        .route("/admin/logout", delete(admin_logout))
        .with_state(state)
}

fn stale(state: &StubState, headers: &HeaderMap) -> bool {
    let current = state.master_version.lock().unwrap().clone();
    headers.get("x-master-version").and_then(|v| v.to_str().ok()) != Some(current.as_str())
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(FailResponse::new(status.as_u16() as i64, message))).into_response()
}

fn take_one(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn conflict() -> Response {
    fail(StatusCode::UNPROCESSABLE_ENTITY, "invalid master version")
}

/// The game clock the request was stamped with
fn isu_now(headers: &HeaderMap) -> i64 {
    headers
        .get("x-isu-date")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| DateTime::parse_from_rfc2822(v).ok())
        .map(|d| d.timestamp())
        .unwrap_or_else(|| Utc::now().timestamp())
}

/// 401 without a session, 403 when it belongs to someone else
fn authorize(headers: &HeaderMap, user_id: i64) -> Option<Response> {
    let owner = headers
        .get("x-session")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("session-"))
        .and_then(|s| s.parse::<i64>().ok());
    match owner {
        None => Some(fail(StatusCode::UNAUTHORIZED, "unauthorized user")),
        Some(owner) if owner != user_id => Some(fail(StatusCode::FORBIDDEN, "forbidden")),
        Some(_) => None,
    }
}

/// Master version, then session
fn gate(state: &StubState, headers: &HeaderMap, user_id: i64) -> Option<Response> {
    if stale(state, headers) {
        return Some(conflict());
    }
    authorize(headers, user_id)
}

fn updated(now: i64, mut resources: UpdatedResources) -> Response {
    resources.now = now;
    Json(UpdatedResourcesResponse {
        updated_resources: resources,
    })
    .into_response()
}

async fn initialize(State(state): State<Arc<StubState>>) -> Response {
    if state.initialize_status != 200 {
        let status = StatusCode::from_u16(state.initialize_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return fail(status, "initialize failed");
    }
    *state.master_version.lock().unwrap() = "1".to_string();
    Json(json!({ "language": "rust" })).into_response()
}

async fn login(State(state): State<Arc<StubState>>, headers: HeaderMap, Json(req): Json<LoginRequest>) -> Response {
    state.login_attempts.fetch_add(1, Ordering::SeqCst);
    if stale(&state, &headers) || take_one(&state.login_conflicts) {
        return conflict();
    }
    let known = state.accounts.lock().unwrap().contains_key(&req.user_id);
    if !known && req.user_id <= UNKNOWN_USER_IDS {
        return fail(StatusCode::NOT_FOUND, "not found user");
    }
    if state.is_banned(req.user_id) {
        return fail(StatusCode::FORBIDDEN, "forbidden");
    }
    if state.garbled_logins && !known {
        return (StatusCode::OK, "welcome back").into_response();
    }

    let now = isu_now(&headers);
    let user = match state.accounts.lock().unwrap().get_mut(&req.user_id) {
        Some(account) => {
            account.user.last_activated_at = now;
            account.user.updated_at = now;
            account.user.clone()
        }
        None => User {
            id: req.user_id,
            ..User::default()
        },
    };
    Json(LoginResponse {
        viewer_id: req.viewer_id,
        session_id: format!("session-{}", req.user_id),
        updated_resources: UpdatedResources {
            now,
            user,
            ..UpdatedResources::default()
        },
    })
    .into_response()
}

async fn create_user(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Response {
    if stale(&state, &headers) {
        return conflict();
    }
    let now = isu_now(&headers);
    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let cards: Vec<UserCard> = (1..=3)
        .map(|n| UserCard {
            id: id * 10 + n,
            user_id: id,
            card_id: 2,
            amount_per_sec: 1,
            level: 1,
            total_exp: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
        .collect();
    let deck = UserDeck {
        id,
        user_id: id,
        card_id_1: cards[0].id,
        card_id_2: cards[1].id,
        card_id_3: cards[2].id,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    Json(CreateUserResponse {
        user_id: id,
        viewer_id: req.viewer_id.clone(),
        session_id: format!("session-{}", id),
        created_at: now,
        updated_resources: UpdatedResources {
            now,
            user: User {
                id,
                last_get_reward_at: now,
                last_activated_at: now,
                registered_at: now,
                created_at: now,
                updated_at: now,
                ..User::default()
            },
            user_device: UserDevice {
                id,
                user_id: id,
                platform_id: req.viewer_id,
                platform_type: req.platform_type,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
            user_cards: cards,
            user_decks: vec![deck],
            ..UpdatedResources::default()
        },
    })
    .into_response()
}

async fn home(State(state): State<Arc<StubState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Some(rejection) = gate(&state, &headers, id) {
        return rejection;
    }
    if take_one(&state.home_conflicts) {
        return conflict();
    }
    let now = isu_now(&headers);
    let body = match state.accounts.lock().unwrap().get(&id) {
        Some(account) => HomeResponse {
            now,
            user: account.user.clone(),
            deck: account.deck.clone(),
            total_amount_per_sec: account.total_amount_per_sec(),
            past_time: now - account.user.last_get_reward_at,
        },
        None => HomeResponse {
            now,
            user: User {
                id,
                ..User::default()
            },
            ..HomeResponse::default()
        },
    };
    Json(body).into_response()
}

async fn reward(State(state): State<Arc<StubState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Some(rejection) = gate(&state, &headers, id) {
        return rejection;
    }
    let now = isu_now(&headers);
    let mut accounts = state.accounts.lock().unwrap();
    let Some(account) = accounts.get_mut(&id) else {
        return updated(now, UpdatedResources::default());
    };
    let rate = account.total_amount_per_sec();
    let user = &mut account.user;
    user.isu_coin += rate * (now - user.last_get_reward_at);
    user.last_get_reward_at = now;
    user.updated_at = now;
    updated(
        now,
        UpdatedResources {
            user: user.clone(),
            ..UpdatedResources::default()
        },
    )
}

async fn set_deck(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<SetDeckRequest>,
) -> Response {
    if let Some(rejection) = gate(&state, &headers, id) {
        return rejection;
    }
    if req.card_ids.len() != 3 {
        return fail(StatusCode::BAD_REQUEST, "invalid card ids");
    }
    let now = isu_now(&headers);
    let mut deck = UserDeck {
        id,
        user_id: id,
        card_id_1: req.card_ids[0],
        card_id_2: req.card_ids[1],
        card_id_3: req.card_ids[2],
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    if let Some(account) = state.accounts.lock().unwrap().get_mut(&id) {
        deck.id = account.deck.id + 1;
        account.deck = deck.clone();
    }
    updated(
        now,
        UpdatedResources {
            user_decks: vec![deck],
            ..UpdatedResources::default()
        },
    )
}

async fn item_list(State(state): State<Arc<StubState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Some(rejection) = gate(&state, &headers, id) {
        return rejection;
    }
    let one_time_token = state.issue_token();
    let body = match state.accounts.lock().unwrap().get(&id) {
        Some(account) => ItemListResponse {
            one_time_token,
            user: account.user.clone(),
            items: account.items.clone(),
            cards: account.cards.clone(),
        },
        None => ItemListResponse {
            one_time_token,
            user: User {
                id,
                ..User::default()
            },
            items: vec![
                UserItem {
                    id: 70,
                    user_id: id,
                    item_type: item_type::TIMER,
                    item_id: 1,
                    amount: 1,
                    ..UserItem::default()
                },
                UserItem {
                    id: 71,
                    user_id: id,
                    item_type: item_type::EXP,
                    item_id: 2,
                    amount: 5,
                    ..UserItem::default()
                },
            ],
            cards: (1..=3)
                .map(|n| UserCard {
                    id: n,
                    user_id: id,
                    card_id: 2,
                    level: 1,
                    ..UserCard::default()
                })
                .collect(),
        },
    };
    Json(body).into_response()
}

async fn add_exp(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path((id, card_id)): Path<(i64, i64)>,
    Json(req): Json<AddExpRequest>,
) -> Response {
    if let Some(rejection) = gate(&state, &headers, id) {
        return rejection;
    }
    if !state.redeem(&req.one_time_token) {
        return fail(StatusCode::BAD_REQUEST, "invalid token");
    }
    let now = isu_now(&headers);
    let mut accounts = state.accounts.lock().unwrap();
    let Some(account) = accounts.get_mut(&id) else {
        return updated(now, UpdatedResources::default());
    };
    let Some(card) = account.cards.iter_mut().find(|c| c.id == card_id) else {
        return fail(StatusCode::NOT_FOUND, "not found card");
    };
    let Some(master) = state.world.card_master(card.card_id) else {
        return fail(StatusCode::NOT_FOUND, "not found card master");
    };

    let mut gained = 0;
    let mut used = Vec::new();
    for spent in &req.items {
        let Some(item) = account.items.iter_mut().find(|i| i.id == spent.id) else {
            return fail(StatusCode::NOT_FOUND, "not found item");
        };
        if item.amount < spent.amount {
            return fail(StatusCode::BAD_REQUEST, "item not enough");
        }
        item.amount -= spent.amount;
        item.updated_at = now;
        gained += state.world.gained_exp(item.item_id) * spent.amount;
        used.push(item.clone());
    }
    feed_card(card, master, gained);
    card.updated_at = now;

    updated(
        now,
        UpdatedResources {
            user_cards: vec![card.clone()],
            user_items: used,
            ..UpdatedResources::default()
        },
    )
}

async fn present_list(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path((id, page)): Path<(i64, usize)>,
) -> Response {
    if let Some(rejection) = gate(&state, &headers, id) {
        return rejection;
    }
    let body = match state.accounts.lock().unwrap().get(&id) {
        Some(account) => {
            let live = account.live_presents();
            let offset = page.saturating_sub(1) * PRESENT_PAGE_SIZE;
            ListPresentResponse {
                presents: live.iter().skip(offset).take(PRESENT_PAGE_SIZE).cloned().collect(),
                is_next: live.len() > offset + PRESENT_PAGE_SIZE,
            }
        }
        None => ListPresentResponse {
            presents: vec![UserPresent {
                id: 11,
                user_id: id,
                item_type: item_type::COIN,
                item_id: 1,
                amount: 100,
                present_message: "welcome".to_string(),
                ..UserPresent::default()
            }],
            is_next: false,
        },
    };
    Json(body).into_response()
}

async fn receive(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<ReceivePresentRequest>,
) -> Response {
    if let Some(rejection) = gate(&state, &headers, id) {
        return rejection;
    }
    let now = isu_now(&headers);
    let mut accounts = state.accounts.lock().unwrap();
    let Some(account) = accounts.get_mut(&id) else {
        return updated(now, UpdatedResources::default());
    };
    let mut received = Vec::new();
    let mut coin = 0;
    for present in account
        .presents
        .iter_mut()
        .filter(|p| p.deleted_at.is_none() && req.present_ids.contains(&p.id))
    {
        present.updated_at = now;
        present.deleted_at = Some(now);
        if present.item_type == item_type::COIN {
            coin += present.amount;
        }
        received.push(present.clone());
    }
    account.user.isu_coin += coin;
    updated(
        now,
        UpdatedResources {
            user_presents: received,
            ..UpdatedResources::default()
        },
    )
}

async fn gacha_list(State(state): State<Arc<StubState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Some(rejection) = gate(&state, &headers, id) {
        return rejection;
    }
    Json(ListGachaResponse {
        one_time_token: state.issue_token(),
        gachas: state.world.active_gachas(isu_now(&headers)),
    })
    .into_response()
}

async fn draw(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path((id, gacha_id, times)): Path<(i64, i64, usize)>,
    Json(req): Json<DrawGachaRequest>,
) -> Response {
    if let Some(rejection) = gate(&state, &headers, id) {
        return rejection;
    }
    if !state.redeem(&req.one_time_token) {
        return fail(StatusCode::BAD_REQUEST, "invalid token");
    }
    let now = isu_now(&headers);
    let Some(gacha) = state
        .world
        .active_gachas(now)
        .into_iter()
        .find(|g| g.gacha.id == gacha_id)
    else {
        return fail(StatusCode::NOT_FOUND, "not found gacha");
    };
    if gacha.gacha_items.is_empty() {
        return fail(StatusCode::NOT_FOUND, "not found gacha item");
    }

    let presents: Vec<UserPresent> = (0..times)
        .map(|n| {
            let item = &gacha.gacha_items[n % gacha.gacha_items.len()];
            UserPresent {
                id: state.next_id.fetch_add(1, Ordering::SeqCst),
                user_id: id,
                sent_at: now,
                item_type: item.item_type,
                item_id: item.item_id,
                amount: item.amount,
                present_message: format!("{} gacha present", gacha.gacha.name),
                created_at: now,
                updated_at: now,
                deleted_at: None,
            }
        })
        .collect();
    if let Some(account) = state.accounts.lock().unwrap().get_mut(&id) {
        account.presents.extend(presents.iter().cloned());
    }
    Json(DrawGachaResponse { presents }).into_response()
}

async fn admin_login(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(req): Json<AdminLoginRequest>,
) -> Response {
    if stale(&state, &headers) {
        return conflict();
    }
    if req.user_id != ADMIN_USER_ID {
        return fail(StatusCode::NOT_FOUND, "not found user");
    }
    if req.password != ADMIN_PASSWORD {
        return fail(StatusCode::UNAUTHORIZED, "unauthorized user");
    }
    let now = Utc::now().timestamp();
    Json(AdminLoginResponse {
        session: AdminSession {
            id: 1,
            user_id: req.user_id,
            session_id: "admin-session".to_string(),
            created_at: now,
            updated_at: now,
            expired_at: now + 86400,
            deleted_at: None,
        },
    })
    .into_response()
}

async fn admin_master(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if stale(&state, &headers) {
        return conflict();
    }
    let version = state.master_version.lock().unwrap().clone();
    Json(AdminMasterResponse {
        version_masters: vec![VersionMaster {
            id: version.parse().unwrap_or(1),
            master_version: version,
            status: 1,
        }],
        gachas: state.world.gachas.iter().map(|g| g.gacha.clone()).collect(),
        gacha_items: state
            .world
            .gachas
            .iter()
            .flat_map(|g| g.gacha_items.iter().cloned())
            .collect(),
        ..AdminMasterResponse::default()
    })
    .into_response()
}

async fn admin_user(State(state): State<Arc<StubState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if stale(&state, &headers) {
        return conflict();
    }
    let accounts = state.accounts.lock().unwrap();
    let Some(account) = accounts.get(&id) else {
        return fail(StatusCode::NOT_FOUND, "not found user");
    };
    Json(AdminUserResponse {
        user: account.user.clone(),
        user_devices: account.devices.clone(),
        user_cards: account.cards.clone(),
        user_decks: vec![account.deck.clone()],
        user_items: account.items.clone(),
        user_login_bonuses: Vec::new(),
        user_presents: account.presents.clone(),
        user_present_all_received_history: account.histories.clone(),
    })
    .into_response()
}

async fn admin_ban(State(state): State<Arc<StubState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if stale(&state, &headers) {
        return conflict();
    }
    let Some(user) = state.accounts.lock().unwrap().get(&id).map(|a| a.user.clone()) else {
        return fail(StatusCode::NOT_FOUND, "not found user");
    };
    state.banned_by_admin.lock().unwrap().insert(id);
    Json(AdminBanResponse { user }).into_response()
}

async fn admin_update_master(State(state): State<Arc<StubState>>) -> Response {
    let mut version = state.master_version.lock().unwrap();
    let next = version.parse::<i64>().unwrap_or(1) + 1;
    *version = next.to_string();
    Json(json!({
        "versionMaster": { "id": next, "masterVersion": next.to_string(), "status": 1 },
    }))
    .into_response()
}

async fn admin_logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Write the fixture pools prepare expects and the validation dumps into `dir`
pub fn write_fixtures(dir: &FsPath) -> Result<()> {
    let users: Vec<_> = LOAD_USER_IDS
        .iter()
        .map(|id| json!({ "user_id": id, "user_type": "royal", "viewer_id": format!("viewer-{}", id) }))
        .collect();
    let users = serde_json::to_vec(&users)?;
    for name in isubench_scenario::prepare::USER_FIXTURE_FILES {
        std::fs::write(dir.join(name), &users)?;
    }
    std::fs::write(
        dir.join(isubench_scenario::prepare::BAN_USER_FIXTURE_FILE),
        serde_json::to_vec(&json!([{ "user_id": BAN_USER_ID, "user_type": "ban", "viewer_id": "viewer-ban" }]))?,
    )?;
    std::fs::write(
        dir.join(isubench_scenario::prepare::PLATFORM_FIXTURE_FILE),
        r#"[{"platform_id":100,"platform_type":1},{"platform_id":101,"platform_type":2}]"#,
    )?;
    World::standard().write(dir)
}

/// Write the master bundles the refresh uploads into `dir`
pub fn write_master_bundles(dir: &FsPath) -> Result<()> {
    use isubench_scenario::flows::master_refresh::{PRESENT_ALL_MASTER_FILE, VERSION_MASTER_FILE};
    std::fs::write(dir.join(VERSION_MASTER_FILE), "id,status,master_version\n2,1,2\n")?;
    std::fs::write(dir.join(PRESENT_ALL_MASTER_FILE), "id,registered_start_at,registered_end_at\n")?;
    Ok(())
}
