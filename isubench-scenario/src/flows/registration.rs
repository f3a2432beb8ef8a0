//! Registration flow: a new device creates an account and builds a first deck

use super::{check_json, flow_stamp, still_running, Attempt, Halt, ScenarioResult, Step, Visit};
use crate::session::Session;
use futures::FutureExt;
use isubench_api_types::{
    item_type, AddExpItem, CreateUserResponse, ItemListResponse, PlatformFixture, UpdatedResourcesResponse,
    UserCard, UserFixture,
};
use isubench_config::Stage;
use isubench_core::{Phase, Platform, ScoreTag, User};
use isubench_execution::ScenarioFn;
use isubench_http::{actions, Agent, Login};
use isubench_logging::StepTimer;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Device every registration uses in the test stage
pub const TEST_PLATFORM: PlatformFixture = PlatformFixture {
    platform_id: 12345678,
    platform_type: 1,
};

pub fn scenario(session: Arc<Session>) -> ScenarioFn {
    Arc::new(move |cancel| {
        let session = session.clone();
        async move { run(&session, &cancel).await }.boxed()
    })
}

pub async fn run(session: &Session, cancel: &CancellationToken) {
    let _timer = StepTimer::start("registration flow");
    let platform = match session.config.target.stage {
        Stage::Test => Arc::new(Platform::new(TEST_PLATFORM)),
        Stage::Prod => match session.platforms.pop() {
            Some(platform) => platform,
            None => {
                debug!("No platform left to register");
                return;
            }
        },
    };
    let Some(agent) = session.agent_or_record(Phase::Load, |factory| platform.agent(factory)) else {
        return;
    };

    while !cancel.is_cancelled() {
        let master_version = session.master_version();
        let ledger = Attempt::new(session);
        match ScenarioResult::from(attempt(&ledger, cancel, &platform, &agent, &master_version).await) {
            ScenarioResult::Rewind => debug!(
                "registration flow for platform {} rewinds",
                platform.identity().platform_id
            ),
            ScenarioResult::Continue => {
                ledger.commit();
                break;
            }
        }
    }
    platform.clear_agent();
}

async fn attempt(
    ledger: &Attempt<'_>,
    cancel: &CancellationToken,
    platform: &Platform,
    agent: &Agent,
    master_version: &str,
) -> Step<()> {
    let identity = platform.identity();
    let res = actions::post_user(
        agent,
        cancel,
        flow_stamp(master_version),
        identity.platform_id,
        identity.platform_type,
    )
    .await;
    let Some(created) = check_json::<CreateUserResponse>(ledger, cancel, res, ScoreTag::CreateUser)? else {
        return Err(Halt::Stop);
    };
    ledger.count_registration();

    // The new account plays on its own client
    let user = User::new(UserFixture {
        user_id: created.user_id,
        user_type: String::new(),
        viewer_id: created.viewer_id.clone(),
    });
    let Some(user_agent) = ledger.session.agent_or_record(Phase::Load, |factory| user.agent(factory)) else {
        return Err(Halt::Stop);
    };
    let login = Login {
        session_id: created.session_id,
        viewer_id: created.viewer_id,
    };
    let visit = Visit {
        attempt: ledger,
        cancel,
        agent: &user_agent,
        master_version,
        user_id: created.user_id,
        login: &login,
    };

    let outcome = play(&visit).await;
    user.clear_agent();
    outcome
}

async fn play(visit: &Visit<'_>) -> Step<()> {
    still_running(visit.cancel)?;
    visit.show_home().await?;
    still_running(visit.cancel)?;
    visit.accept_gifts().await?;
    still_running(visit.cancel)?;
    visit.redeem_gacha().await?;
    still_running(visit.cancel)?;
    visit.accept_gifts().await?;
    still_running(visit.cancel)?;

    let res = actions::get_item_list(
        visit.agent,
        visit.cancel,
        flow_stamp(visit.master_version),
        visit.user_id,
        visit.login,
    )
    .await;
    let Some(listing) = check_json::<ItemListResponse>(visit.attempt, visit.cancel, res, ScoreTag::ListItem)? else {
        return Err(Halt::Stop);
    };

    still_running(visit.cancel)?;
    add_exp(visit, &listing).await?;
    still_running(visit.cancel)?;
    set_deck(visit, &listing.cards).await
}

/// Feed one exp item to the first card
async fn add_exp(visit: &Visit<'_>, listing: &ItemListResponse) -> Step<()> {
    let Some((card, item)) = exp_target(listing) else {
        return Ok(());
    };
    let res = actions::post_add_exp(
        visit.agent,
        visit.cancel,
        flow_stamp(visit.master_version),
        visit.user_id,
        visit.login,
        card,
        &listing.one_time_token,
        vec![AddExpItem { id: item, amount: 1 }],
    )
    .await;
    check_json::<UpdatedResourcesResponse>(visit.attempt, visit.cancel, res, ScoreTag::AddExpToCard)?;
    Ok(())
}

/// First card and first exp item of a listing, as user-card and user-item ids
fn exp_target(listing: &ItemListResponse) -> Option<(i64, i64)> {
    let card = listing.cards.first()?;
    let item = listing.items.iter().find(|i| i.item_type == item_type::EXP)?;
    Some((card.id, item.id))
}

/// Put the first three cards into the deck
async fn set_deck(visit: &Visit<'_>, cards: &[UserCard]) -> Step<()> {
    let Some(card_ids) = deck_selection(cards) else {
        return Ok(());
    };
    let res = actions::post_set_deck(
        visit.agent,
        visit.cancel,
        flow_stamp(visit.master_version),
        visit.user_id,
        visit.login,
        card_ids,
    )
    .await;
    check_json::<UpdatedResourcesResponse>(visit.attempt, visit.cancel, res, ScoreTag::SetDeck)?;
    Ok(())
}

fn deck_selection(cards: &[UserCard]) -> Option<Vec<i64>> {
    if cards.len() < 3 {
        return None;
    }
    Some(cards.iter().take(3).map(|c| c.id).collect())
}
