//! Login flow: an existing user logs in and plays through the main screens

use super::{check_json, flow_stamp, still_running, Attempt, Halt, ScenarioResult, Step, Visit};
use crate::session::Session;
use futures::FutureExt;
use isubench_api_types::LoginResponse;
use isubench_core::{Identified, LightSetGuard, Phase, ScoreTag, User};
use isubench_execution::ScenarioFn;
use isubench_http::{actions, Agent, Login};
use isubench_logging::StepTimer;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub fn scenario(session: Arc<Session>) -> ScenarioFn {
    Arc::new(move |cancel| {
        let session = session.clone();
        async move { run(&session, &cancel).await }.boxed()
    })
}

pub async fn run(session: &Session, cancel: &CancellationToken) {
    let _timer = StepTimer::start("login flow");
    let Some((user, _claim)) = claim_user(session, cancel).await else {
        return;
    };
    let Some(agent) = session.agent_or_record(Phase::Load, |factory| user.agent(factory)) else {
        return;
    };

    while !cancel.is_cancelled() {
        let master_version = session.master_version();
        let ledger = Attempt::new(session);
        match ScenarioResult::from(attempt(&ledger, cancel, &user, &agent, &master_version).await) {
            ScenarioResult::Rewind => debug!("login flow for user {} rewinds", user.id()),
            ScenarioResult::Continue => {
                ledger.commit();
                break;
            }
        }
    }
    user.clear_agent();
}

/// Pick a random user no other login flow is driving; `None` once the run is over
pub(crate) async fn claim_user<'a>(
    session: &'a Session,
    cancel: &CancellationToken,
) -> Option<(Arc<User>, LightSetGuard<'a>)> {
    while !cancel.is_cancelled() {
        let user = session.users.random()?;
        if let Some(claim) = session.consumed.try_acquire(user.id()) {
            return Some((user, claim));
        }
        tokio::task::yield_now().await;
    }
    None
}

async fn attempt(
    ledger: &Attempt<'_>,
    cancel: &CancellationToken,
    user: &User,
    agent: &Agent,
    master_version: &str,
) -> Step<()> {
    let identity = user.identity();
    let res = actions::post_login(
        agent,
        cancel,
        flow_stamp(master_version),
        identity.user_id,
        &identity.viewer_id,
    )
    .await;
    let Some(body) = check_json::<LoginResponse>(ledger, cancel, res, ScoreTag::Login)? else {
        return Err(Halt::Stop);
    };
    ledger.count_login();

    let login = Login {
        session_id: body.session_id,
        viewer_id: body.viewer_id,
    };
    let visit = Visit {
        attempt: ledger,
        cancel,
        agent,
        master_version,
        user_id: identity.user_id,
        login: &login,
    };

    still_running(cancel)?;
    visit.show_home().await?;
    still_running(cancel)?;
    visit.redeem_reward().await?;
    still_running(cancel)?;
    visit.accept_gifts().await?;
    still_running(cancel)?;
    visit.redeem_gacha().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use isubench_api_types::UserFixture;
    use isubench_config::BenchConfig;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tokio::task::JoinSet;

    fn session_with_users(n: i64) -> Session {
        let session = Session::new(BenchConfig::default()).unwrap();
        for id in 1..=n {
            session
                .users
                .add(User::new(UserFixture {
                    user_id: id,
                    user_type: "royal".to_string(),
                    viewer_id: format!("viewer-{}", id),
                }))
                .unwrap();
        }
        session
    }

    #[tokio::test]
    async fn test_claims_are_exclusive() {
        let session = session_with_users(2);
        let cancel = CancellationToken::new();

        let (first, first_claim) = claim_user(&session, &cancel).await.unwrap();
        let (second, _second_claim) = claim_user(&session, &cancel).await.unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(session.consumed.len(), 2);

        drop(first_claim);
        assert!(!session.consumed.contains(first.id()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_never_share_a_user() {
        let session = Arc::new(session_with_users(100));
        let cancel = CancellationToken::new();
        let held = Arc::new(Mutex::new(HashSet::new()));

        let mut tasks = JoinSet::new();
        for _ in 0..150 {
            let (session, cancel, held) = (session.clone(), cancel.clone(), held.clone());
            tasks.spawn(async move {
                for _ in 0..20 {
                    let (user, claim) = claim_user(&session, &cancel).await.unwrap();
                    assert!(held.lock().unwrap().insert(user.id()), "user {} claimed twice", user.id());
                    tokio::task::yield_now().await;
                    assert!(held.lock().unwrap().remove(&user.id()));
                    drop(claim);
                }
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
        }
        assert!(session.consumed.is_empty());
    }

    #[tokio::test]
    async fn test_claim_gives_up_when_cancelled() {
        let session = session_with_users(1);
        let cancel = CancellationToken::new();
        let _held = claim_user(&session, &cancel).await.unwrap();

        cancel.cancel();
        assert!(claim_user(&session, &cancel).await.is_none());
    }

    #[tokio::test]
    async fn test_empty_pool_has_nothing_to_claim() {
        let session = session_with_users(0);
        assert!(claim_user(&session, &CancellationToken::new()).await.is_none());
    }
}
