//! Body checks for the admin endpoints

use isubench_api_types::{
    AdminBanResponse, AdminLoginResponse, AdminMasterResponse, AdminSession, AdminUserResponse, GachaData,
    LoginBonusRewardMaster, User,
};
use isubench_core::{assert_equal, diff, FailureResult, Hint, ValidationUser};

/// Upper bound on the presents spot-checked in a user detail
pub const PRESENT_SAMPLE: usize = 200;

fn count_hint(endpoint: &str, what: &str) -> Hint {
    Hint::new(endpoint, format!("{} length", what))
}

/// Admin login: a live session for the admin account
pub fn check_admin_session(body: &AdminLoginResponse, admin_id: i64, endpoint: &str) -> FailureResult<()> {
    let expected = AdminSession {
        user_id: admin_id,
        deleted_at: None,
        ..AdminSession::default()
    };
    diff(
        &expected,
        &body.session,
        &Hint::new(endpoint, "session."),
        &["id", "sessionId", "createdAt", "updatedAt", "expiredAt"],
    )
}

/// Null-ness of `deletedAt` must agree even where the timestamp itself is ignored
fn check_deleted_at(expected: Option<i64>, actual: Option<i64>, hint: &Hint) -> FailureResult<()> {
    match (expected, actual) {
        (Some(_), None) => Err(hint.mismatch("not null", "null")),
        (None, Some(v)) => Err(hint.mismatch("null", v)),
        _ => Ok(()),
    }
}

/// User detail: the whole fixture state of one user, spot-checked where it is large
pub fn check_admin_user(body: &AdminUserResponse, shadow: &ValidationUser, endpoint: &str) -> FailureResult<()> {
    if body.user == User::default() {
        return Err(Hint::new(endpoint, "user").missing());
    }
    diff(&shadow.user, &body.user, &Hint::new(endpoint, "user."), &[])?;

    assert_equal(shadow.cards.len(), body.user_cards.len(), &count_hint(endpoint, "userCards"))?;
    if !body.user_cards.is_empty() {
        let actual = &body.user_cards[fastrand::usize(..body.user_cards.len())];
        let Some(expected) = shadow.card(actual.id) else {
            return Err(Hint::new(endpoint, format!("userCards id {}", actual.id)).missing());
        };
        diff(expected, actual, &Hint::new(endpoint, "userCards."), &[])?;
    }

    for actual in &body.user_decks {
        if actual.id == shadow.deck.id {
            diff(&shadow.deck, actual, &Hint::new(endpoint, "userDecks."), &[])?;
        }
    }

    assert_equal(shadow.devices.len(), body.user_devices.len(), &count_hint(endpoint, "userDevices"))?;
    for expected in &shadow.devices {
        for actual in body.user_devices.iter().filter(|d| d.id == expected.id) {
            diff(expected, actual, &Hint::new(endpoint, "userDevices."), &[])?;
        }
    }

    assert_equal(shadow.items.len(), body.user_items.len(), &count_hint(endpoint, "userItems"))?;
    for expected in &shadow.items {
        for actual in body.user_items.iter().filter(|i| i.id == expected.id) {
            diff(expected, actual, &Hint::new(endpoint, "userItems."), &[])?;
        }
    }

    assert_equal(
        shadow.all_presents.len(),
        body.user_presents.len(),
        &count_hint(endpoint, "userPresents"),
    )?;
    let samples = body.user_presents.len().min(PRESENT_SAMPLE);
    for _ in 0..samples {
        let actual = &body.user_presents[fastrand::usize(..body.user_presents.len())];
        let Some(expected) = shadow.all_presents.iter().find(|p| p.id == actual.id) else {
            return Err(Hint::new(endpoint, format!("userPresents id {}", actual.id)).missing());
        };
        let hint = Hint::new(endpoint, "userPresents.");
        diff(expected, actual, &hint, &["deletedAt"])?;
        check_deleted_at(expected.deleted_at, actual.deleted_at, &hint.field("deletedAt"))?;
    }

    assert_equal(
        shadow.present_all_histories.len(),
        body.user_present_all_received_history.len(),
        &count_hint(endpoint, "userPresentAllReceivedHistory"),
    )?;
    let history = &body.user_present_all_received_history;
    for _ in 0..history.len().min(PRESENT_SAMPLE) {
        let actual = &history[fastrand::usize(..history.len())];
        let Some(expected) = shadow.present_all_histories.iter().find(|h| h.id == actual.id) else {
            return Err(Hint::new(endpoint, format!("userPresentAllReceivedHistory id {}", actual.id)).missing());
        };
        let hint = Hint::new(endpoint, "userPresentAllReceivedHistory.");
        diff(expected, actual, &hint, &["deletedAt"])?;
        check_deleted_at(expected.deleted_at, actual.deleted_at, &hint.field("deletedAt"))?;
    }
    Ok(())
}

/// Master listing: gachas, their items and login rewards, spot-checked
pub fn check_admin_master(
    body: &AdminMasterResponse,
    gachas: &[GachaData],
    rewards: &[LoginBonusRewardMaster],
    endpoint: &str,
) -> FailureResult<()> {
    assert_equal(gachas.len(), body.gachas.len(), &count_hint(endpoint, "gachas"))?;
    if !gachas.is_empty() {
        let expected = &gachas[fastrand::usize(..gachas.len())];
        let Some(actual) = body.gachas.iter().find(|g| g.id == expected.gacha.id) else {
            return Err(Hint::new(endpoint, format!("gachas id {}", expected.gacha.id)).missing());
        };
        diff(&expected.gacha, actual, &Hint::new(endpoint, "gachas."), &[])?;

        let items: Vec<_> = body
            .gacha_items
            .iter()
            .filter(|i| i.gacha_id == expected.gacha.id)
            .collect();
        assert_equal(
            expected.gacha_items.len(),
            items.len(),
            &count_hint(endpoint, &format!("gachaItems of gacha {}", expected.gacha.id)),
        )?;
        if !expected.gacha_items.is_empty() {
            let item = &expected.gacha_items[fastrand::usize(..expected.gacha_items.len())];
            let Some(actual) = items.iter().find(|i| i.id == item.id) else {
                return Err(Hint::new(endpoint, format!("gachaItems id {}", item.id)).missing());
            };
            diff(item, *actual, &Hint::new(endpoint, "gachaItems."), &[])?;
        }
    }

    assert_equal(
        rewards.len(),
        body.login_bonus_rewards.len(),
        &count_hint(endpoint, "loginBonusRewards"),
    )?;
    if !rewards.is_empty() {
        let expected = &rewards[fastrand::usize(..rewards.len())];
        let Some(actual) = body.login_bonus_rewards.iter().find(|r| r.id == expected.id) else {
            return Err(Hint::new(endpoint, format!("loginBonusRewards id {}", expected.id)).missing());
        };
        diff(expected, actual, &Hint::new(endpoint, "loginBonusRewards."), &[])?;
    }
    Ok(())
}

/// Ban: the user row comes back, identity and registration intact
pub fn check_admin_ban(body: &AdminBanResponse, shadow: &ValidationUser, endpoint: &str) -> FailureResult<()> {
    let expected = User {
        id: shadow.id,
        registered_at: shadow.user.registered_at,
        created_at: shadow.user.created_at,
        ..User::default()
    };
    diff(
        &expected,
        &body.user,
        &Hint::new(endpoint, "user."),
        &["isuCoin", "lastGetRewardAt", "lastActivatedAt", "updatedAt", "deletedAt"],
    )
}
