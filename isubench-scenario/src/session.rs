//! Shared state of one benchmark run

use crate::error::ScenarioError;
use isubench_config::BenchConfig;
use isubench_core::{
    AdminIdentity, AdminUser, ErrorCode, ErrorSink, Failure, LightSet, Phase, Platform, ScoreBoard, ScoreTag, Set,
    User, ValidationResult,
};
use isubench_execution::LoadGauge;
use isubench_http::{Agent, AgentFactory, HttpError};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};

/// Administrator the target is seeded with
pub const ADMIN_USER_ID: i64 = 123456;
pub const ADMIN_PASSWORD: &str = "password";

/// Master version the target starts on after initialize
pub const INITIAL_MASTER_VERSION: &str = "1";

/// Everything the flows, validation and orchestrator share for one run
pub struct Session {
    pub config: BenchConfig,
    pub factory: AgentFactory,

    master_version: RwLock<String>,

    pub users: Set<User>,
    pub ban_users: Set<User>,
    pub platforms: Set<Platform>,
    pub admin: AdminUser,

    /// Users currently driven by a login flow
    pub consumed: LightSet,

    pub score: ScoreBoard,
    pub errors: ErrorSink,

    logins: AtomicU64,
    registrations: AtomicU64,

    language: Mutex<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.factory.base_url().as_str())
            .field("master_version", &self.master_version())
            .field("users", &self.users.len())
            .field("ban_users", &self.ban_users.len())
            .field("platforms", &self.platforms.len())
            .finish()
    }
}

impl Session {
    pub fn new(config: BenchConfig) -> Result<Self, ScenarioError> {
        let factory = AgentFactory::from_config(&config)?;
        Ok(Self {
            config,
            factory,
            master_version: RwLock::new(INITIAL_MASTER_VERSION.to_string()),
            users: Set::new(),
            ban_users: Set::new(),
            platforms: Set::new(),
            admin: AdminUser::new(AdminIdentity {
                user_id: ADMIN_USER_ID,
                password: ADMIN_PASSWORD.to_string(),
            }),
            consumed: LightSet::new(),
            score: ScoreBoard::new(),
            errors: ErrorSink::new(),
            logins: AtomicU64::new(0),
            registrations: AtomicU64::new(0),
            language: Mutex::new(String::new()),
        })
    }

    pub fn master_version(&self) -> String {
        self.master_version.read().clone()
    }

    pub fn set_master_version(&self, version: impl Into<String>) {
        *self.master_version.write() = version.into();
    }

    pub fn count_login(&self) {
        self.logins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn language(&self) -> String {
        self.language.lock().clone()
    }

    pub fn set_language(&self, language: impl Into<String>) {
        *self.language.lock() = language.into();
    }

    pub fn record(&self, phase: Phase, failure: Failure) {
        self.errors.add(phase, failure);
    }

    /// Record a validation result; canceled branches leave no trace
    pub fn record_result(&self, phase: Phase, result: &ValidationResult) {
        result.record_into(&self.errors, phase);
    }

    /// Score a tag unless the board is already closed
    pub fn score(&self, tag: ScoreTag) {
        self.score.add(tag);
    }

    /// Agent of an actor, recording a failure when the client cannot be built
    pub fn agent_or_record<F>(&self, phase: Phase, build: F) -> Option<Agent>
    where
        F: FnOnce(&AgentFactory) -> Result<Agent, HttpError>,
    {
        match build(&self.factory) {
            Ok(agent) => Some(agent),
            Err(e) => {
                self.record(phase, Failure::new(ErrorCode::InternalCreatingAgent, e.to_string()));
                None
            }
        }
    }
}

impl LoadGauge for Session {
    fn load_errors(&self) -> u64 {
        self.errors.count(Phase::Load)
    }

    fn login_successes(&self) -> u64 {
        self.logins.load(Ordering::Relaxed)
    }

    fn registration_successes(&self) -> u64 {
        self.registrations.load(Ordering::Relaxed)
    }

    fn close_score(&self) {
        self.score.close();
    }
}
