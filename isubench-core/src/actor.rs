//! Actor registry
//!
//! Actors are the simulated clients of a run. Each wraps a fixture identity
//! and lazily owns one HTTP agent, so its cookies and connection pool are
//! never shared with another actor. [`Set`] keeps a population sorted and
//! indexed by id; [`LightSet`] tracks which ids are currently in use.

use isubench_api_types::{PlatformFixture, UserFixture, ValidationUserFixture};
use isubench_http::{Agent, AgentFactory, AgentKind, HttpError};
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Anything stored in a [`Set`]
pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for UserFixture {
    fn id(&self) -> i64 {
        self.user_id
    }
}

impl Identified for PlatformFixture {
    fn id(&self) -> i64 {
        self.platform_id
    }
}

impl Identified for ValidationUserFixture {
    fn id(&self) -> i64 {
        self.user_id
    }
}

/// Credentials of the operator account used by admin endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub user_id: i64,
    pub password: String,
}

impl Identified for AdminIdentity {
    fn id(&self) -> i64 {
        self.user_id
    }
}

/// A fixture identity plus the agent it currently owns
#[derive(Debug)]
pub struct Actor<T> {
    identity: T,
    agent: Mutex<Option<Agent>>,
}

pub type User = Actor<UserFixture>;
pub type Platform = Actor<PlatformFixture>;
pub type AdminUser = Actor<AdminIdentity>;

impl<T> Actor<T> {
    pub fn new(identity: T) -> Self {
        Self {
            identity,
            agent: Mutex::new(None),
        }
    }

    pub fn identity(&self) -> &T {
        &self.identity
    }

    /// The actor's agent, created on first use
    pub fn agent(&self, factory: &AgentFactory) -> Result<Agent, HttpError> {
        let mut slot = self.agent.lock();
        if let Some(agent) = slot.as_ref() {
            return Ok(agent.clone());
        }
        let agent = factory.new_agent(AgentKind::Default)?;
        *slot = Some(agent.clone());
        Ok(agent)
    }

    pub fn has_agent(&self) -> bool {
        self.agent.lock().is_some()
    }

    /// Drop the session so the next use starts from a fresh cookie jar
    pub fn clear_agent(&self) {
        *self.agent.lock() = None;
    }
}

impl<T: Identified> Identified for Actor<T> {
    fn id(&self) -> i64 {
        self.identity.id()
    }
}

#[derive(Debug, Error)]
pub enum SetError {
    #[error("Refusing to add an item with id 0")]
    ZeroId,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug)]
struct SetInner<T> {
    list: Vec<Arc<T>>,
    index: HashMap<i64, Arc<T>>,
}

/// Population sorted by id with an id index
#[derive(Debug)]
pub struct Set<T> {
    inner: RwLock<SetInner<T>>,
}

impl<T> Default for Set<T> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(SetInner {
                list: Vec::new(),
                index: HashMap::new(),
            }),
        }
    }
}

impl<T: Identified> Set<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn at(&self, index: usize) -> Option<Arc<T>> {
        self.inner.read().list.get(index).cloned()
    }

    pub fn get(&self, id: i64) -> Option<Arc<T>> {
        self.inner.read().index.get(&id).cloned()
    }

    /// Uniformly random member
    pub fn random(&self) -> Option<Arc<T>> {
        let inner = self.inner.read();
        if inner.list.is_empty() {
            return None;
        }
        inner.list.get(fastrand::usize(..inner.list.len())).cloned()
    }

    /// Take the lowest id out of the set
    pub fn pop(&self) -> Option<Arc<T>> {
        let mut inner = self.inner.write();
        if inner.list.is_empty() {
            return None;
        }
        let item = inner.list.remove(0);
        inner.index.remove(&item.id());
        Some(item)
    }

    /// Insert keeping id order; an existing id is replaced
    pub fn add(&self, item: T) -> Result<(), SetError> {
        let id = item.id();
        if id == 0 {
            return Err(SetError::ZeroId);
        }
        let item = Arc::new(item);
        let mut inner = self.inner.write();
        let pos = inner.list.partition_point(|m| m.id() < id);
        if inner.index.contains_key(&id) {
            inner.list[pos] = item.clone();
        } else {
            inner.list.insert(pos, item.clone());
        }
        inner.index.insert(id, item);
        Ok(())
    }
}

/// Read a JSON array of fixtures
pub async fn read_fixtures<F: DeserializeOwned>(path: &Path) -> Result<Vec<F>, SetError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| SetError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SetError::Parse {
        path: path.display().to_string(),
        source,
    })
}

impl<F: Identified + DeserializeOwned> Set<Actor<F>> {
    /// Load a fixture file into actors; returns how many were added
    pub async fn load_json(&self, path: &Path) -> Result<usize, SetError> {
        let fixtures: Vec<F> = read_fixtures(path).await?;
        let mut added = 0;
        for fixture in fixtures {
            match self.add(Actor::new(fixture)) {
                Ok(()) => added += 1,
                Err(SetError::ZeroId) => tracing::debug!("Skipping fixture with id 0 in {}", path.display()),
                Err(e) => return Err(e),
            }
        }
        Ok(added)
    }
}

/// Ids currently claimed by a running flow
#[derive(Debug, Default)]
pub struct LightSet {
    inner: Mutex<HashSet<i64>>,
}

impl LightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an id; `None` when another flow already holds it
    pub fn try_acquire(&self, id: i64) -> Option<LightSetGuard<'_>> {
        if self.inner.lock().insert(id) {
            Some(LightSetGuard { set: self, id })
        } else {
            None
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.inner.lock().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases its id when dropped
#[derive(Debug)]
pub struct LightSetGuard<'a> {
    set: &'a LightSet,
    id: i64,
}

impl LightSetGuard<'_> {
    pub fn id(&self) -> i64 {
        self.id
    }
}

impl Drop for LightSetGuard<'_> {
    fn drop(&mut self) {
        self.set.inner.lock().remove(&self.id);
    }
}
