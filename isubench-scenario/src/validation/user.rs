//! Body checks for the user-facing endpoints
//!
//! Each check compares a decoded body against the shadow model and, where the
//! target is expected to have changed state, advances the shadow so the next
//! check sees the same state the target should be in.

use isubench_api_types::{
    item_type, CardMaster, CreateUserResponse, DrawGachaResponse, ExpItemMaster, FailResponse, GachaData,
    HomeResponse, ItemListResponse, ListGachaResponse, ListPresentResponse, LoginBonusRewardMaster,
    LoginResponse, PlatformFixture, PresentAllMaster, UpdatedResourcesResponse, User, UserDeck, UserDevice,
    UserItem, UserPresent,
};
use isubench_core::shadow::{
    active_gachas, gacha_emission, leveled_card, registration_presents, starter_card, starter_login_bonuses,
    total_weight,
};
use isubench_core::{assert_equal, diff, ErrorCode, Failure, FailureResult, Hint, ValidationUser};

/// Number of presents a ten-draw must produce
pub const DRAW_COUNT: usize = 10;

fn count_hint(endpoint: &str, what: &str) -> Hint {
    Hint::new(endpoint, format!("{} length", what))
}

/// A `{status_code, message}` failure body
pub fn check_fail_body(body: &FailResponse, status: u16, message: &str, endpoint: &str) -> FailureResult<()> {
    let expected = FailResponse::new(i64::from(status), message);
    diff(&expected, body, &Hint::new(endpoint, ""), &[])
}

/// Login: the bonus advances by one, coin rewards land on the user, appended presents show up
pub fn check_login(
    body: &LoginResponse,
    shadow: &mut ValidationUser,
    rewards: &[LoginBonusRewardMaster],
    now: i64,
    endpoint: &str,
    with_presents: bool,
) -> FailureResult<()> {
    let res = &body.updated_resources;
    shadow.advance_login_bonus();

    assert_equal(
        shadow.login_bonuses.len(),
        res.user_login_bonuses.len(),
        &count_hint(endpoint, "updatedResources.userLoginBonuses"),
    )?;
    for (i, actual) in res.user_login_bonuses.iter().enumerate() {
        let Some(expected) = shadow.login_bonuses.iter().find(|b| b.id == actual.id) else {
            continue;
        };
        let mut expected = expected.clone();
        expected.updated_at = now;
        let hint = Hint::new(
            format!("{} userLoginBonuses[{}].id:{}", endpoint, i, actual.id),
            "updatedResources.userLoginBonuses.",
        );
        diff(&expected, actual, &hint, &[])?;
    }

    shadow.apply_login_coin(rewards);
    if res.user == User::default() {
        return Err(Hint::new(endpoint, "updatedResources.user").missing());
    }
    let hint = Hint::new(format!("{} id:{}", endpoint, shadow.id), "updatedResources.user.");
    diff(&shadow.user, &res.user, &hint, &["lastActivatedAt", "updatedAt"])?;

    if !with_presents {
        return Ok(());
    }
    assert_equal(
        shadow.login_append_presents.len(),
        res.user_presents.len(),
        &count_hint(endpoint, "updatedResources.userPresents"),
    )?;
    for (i, present) in shadow.login_append_presents.iter().enumerate() {
        let mut expected = present.clone();
        expected.sent_at = now;
        expected.created_at = now;
        expected.updated_at = now;
        let hint = Hint::new(
            format!("{} userPresents[{}].id:{}", endpoint, i, present.id),
            "updatedResources.userPresents.",
        );
        let mut found = false;
        for actual in res
            .user_presents
            .iter()
            .filter(|p| p.present_message == present.present_message)
        {
            found = true;
            diff(&expected, actual, &hint, &["id"])?;
        }
        if !found {
            return Err(Hint::new(
                endpoint,
                format!("updatedResources.userPresents \"{}\"", present.present_message),
            )
            .missing());
        }
    }
    Ok(())
}

/// Registration: fresh starter state derived from the reward and present-all masters
pub fn check_registration(
    body: &CreateUserResponse,
    platform: &PlatformFixture,
    rewards: &[LoginBonusRewardMaster],
    present_alls: &[PresentAllMaster],
    now: i64,
    endpoint: &str,
) -> FailureResult<()> {
    if body.user_id == 0 {
        return Err(Hint::new(endpoint, "userId").missing());
    }
    if body.viewer_id.is_empty() {
        return Err(Hint::new(endpoint, "viewerId").missing());
    }
    if body.session_id.is_empty() {
        return Err(Hint::new(endpoint, "sessionId").missing());
    }
    if body.created_at == 0 {
        return Err(Hint::new(endpoint, "createdAt").missing());
    }

    let res = &body.updated_resources;
    if res.user == User::default() {
        return Err(Hint::new(endpoint, "updatedResources.user").missing());
    }
    let user_id = res.user.id;

    if res.user_device == UserDevice::default() {
        return Err(Hint::new(endpoint, "updatedResources.userDevice").missing());
    }
    let device = UserDevice {
        user_id,
        platform_id: platform.platform_id.to_string(),
        platform_type: platform.platform_type,
        created_at: now,
        updated_at: now,
        ..UserDevice::default()
    };
    diff(
        &device,
        &res.user_device,
        &Hint::new(endpoint, "updatedResources.userDevice."),
        &["id", "deletedAt"],
    )?;

    assert_equal(3, res.user_cards.len(), &count_hint(endpoint, "updatedResources.userCards"))?;
    let card = starter_card(user_id, now);
    for actual in &res.user_cards {
        diff(
            &card,
            actual,
            &Hint::new(endpoint, "updatedResources.userCards."),
            &["id", "deletedAt"],
        )?;
    }

    assert_equal(1, res.user_decks.len(), &count_hint(endpoint, "updatedResources.userDecks"))?;
    let deck = UserDeck {
        user_id,
        card_id_1: res.user_cards[0].id,
        card_id_2: res.user_cards[1].id,
        card_id_3: res.user_cards[2].id,
        created_at: now,
        updated_at: now,
        ..UserDeck::default()
    };
    diff(
        &deck,
        &res.user_decks[0],
        &Hint::new(endpoint, "updatedResources.userDecks."),
        &["id", "deletedAt"],
    )?;

    let bonuses = starter_login_bonuses(rewards, user_id, now);
    assert_equal(
        bonuses.len(),
        res.user_login_bonuses.len(),
        &count_hint(endpoint, "updatedResources.userLoginBonuses"),
    )?;
    for expected in &bonuses {
        if let Some(actual) = res
            .user_login_bonuses
            .iter()
            .find(|b| b.login_bonus_id == expected.login_bonus_id)
        {
            diff(
                expected,
                actual,
                &Hint::new(endpoint, "updatedResources.userLoginBonuses."),
                &["id", "deletedAt"],
            )?;
        }
    }

    let presents = registration_presents(present_alls, user_id, now);
    assert_equal(
        presents.len(),
        res.user_presents.len(),
        &count_hint(endpoint, "updatedResources.userPresents"),
    )?;
    for expected in &presents {
        for actual in res
            .user_presents
            .iter()
            .filter(|p| p.present_message == expected.present_message)
        {
            diff(
                expected,
                actual,
                &Hint::new(endpoint, "updatedResources.userPresents."),
                &["id", "deletedAt"],
            )?;
        }
    }
    Ok(())
}

/// Home: today's item reward is stocked first, then user, deck and production are compared
pub fn check_home(
    body: &HomeResponse,
    shadow: &mut ValidationUser,
    rewards: &[LoginBonusRewardMaster],
    now: i64,
    endpoint: &str,
) -> FailureResult<()> {
    if let Some(reward) = shadow.current_login_reward(rewards).cloned() {
        shadow.apply_item_reward(&reward, now);
    }

    if body.user == User::default() {
        return Err(Hint::new(endpoint, "user").missing());
    }
    diff(
        &shadow.user,
        &body.user,
        &Hint::new(endpoint, "user."),
        &["lastActivatedAt", "updatedAt"],
    )?;

    if body.deck == UserDeck::default() {
        return Err(Hint::new(endpoint, "deck").missing());
    }
    diff(&shadow.deck, &body.deck, &Hint::new(endpoint, "deck."), &["updatedAt"])?;

    assert_equal(now, body.now, &Hint::new(endpoint, "now"))?;
    assert_equal(
        now - body.user.last_get_reward_at,
        body.past_time,
        &Hint::new(endpoint, "pastTime"),
    )?;
    assert_equal(
        shadow.total_amount_per_sec,
        body.total_amount_per_sec,
        &Hint::new(endpoint, "totalAmountPerSec"),
    )
}

/// Reward: accrued coin is credited and the reward clock restarts at `now`
pub fn check_reward(
    body: &UpdatedResourcesResponse,
    shadow: &mut ValidationUser,
    now: i64,
    endpoint: &str,
) -> FailureResult<()> {
    let expected = User {
        isu_coin: shadow.reward_coin(now),
        last_get_reward_at: now,
        deleted_at: None,
        ..shadow.user.clone()
    };
    diff(
        &expected,
        &body.updated_resources.user,
        &Hint::new(endpoint, "updatedResources.user."),
        &["lastActivatedAt", "updatedAt"],
    )?;
    shadow.collect_reward(now);
    Ok(())
}

/// Set deck: exactly one deck row holding the chosen cards
pub fn check_set_deck(
    body: &UpdatedResourcesResponse,
    user_id: i64,
    card_ids: [i64; 3],
    now: i64,
    endpoint: &str,
) -> FailureResult<()> {
    let decks = &body.updated_resources.user_decks;
    assert_equal(1, decks.len(), &count_hint(endpoint, "updatedResources.userDecks"))?;
    let expected = UserDeck {
        user_id,
        card_id_1: card_ids[0],
        card_id_2: card_ids[1],
        card_id_3: card_ids[2],
        created_at: now,
        updated_at: now,
        ..UserDeck::default()
    };
    diff(
        &expected,
        &decks[0],
        &Hint::new(endpoint, "updatedResources.userDecks."),
        &["id"],
    )
}

/// Home after a deck change: the new deck and its production rate
pub fn check_home_after_deck(
    body: &HomeResponse,
    shadow: &mut ValidationUser,
    card_ids: [i64; 3],
    endpoint: &str,
) -> FailureResult<()> {
    if body.deck == UserDeck::default() {
        return Err(Hint::new(endpoint, "deck").missing());
    }
    shadow.set_deck(card_ids);
    assert_equal(
        shadow.total_amount_per_sec,
        body.total_amount_per_sec,
        &Hint::new(endpoint, "totalAmountPerSec"),
    )?;
    diff(
        &shadow.deck,
        &body.deck,
        &Hint::new(endpoint, "deck."),
        &["id", "createdAt", "updatedAt"],
    )
}

/// Item list: a token plus every stocked item and card, matched by id
pub fn check_item_list(body: &ItemListResponse, shadow: &ValidationUser, endpoint: &str) -> FailureResult<()> {
    if body.one_time_token.is_empty() {
        return Err(Hint::new(endpoint, "oneTimeToken").missing());
    }

    assert_equal(shadow.items.len(), body.items.len(), &count_hint(endpoint, "items"))?;
    for expected in &shadow.items {
        for actual in body.items.iter().filter(|i| i.id == expected.id) {
            diff(expected, actual, &Hint::new(endpoint, "items."), &["updatedAt"])?;
        }
    }

    assert_equal(shadow.cards.len(), body.cards.len(), &count_hint(endpoint, "cards"))?;
    for expected in &shadow.cards {
        for actual in body.cards.iter().filter(|c| c.id == expected.id) {
            diff(expected, actual, &Hint::new(endpoint, "cards."), &["updatedAt"])?;
        }
    }
    Ok(())
}

/// One exp item was fed to `card_id`; the card levels up and the item stack shrinks by `amount`
#[allow(clippy::too_many_arguments)]
pub fn check_add_exp(
    body: &UpdatedResourcesResponse,
    shadow: &mut ValidationUser,
    card_id: i64,
    item: &UserItem,
    amount: i64,
    exp_items: &[ExpItemMaster],
    cards: &[CardMaster],
    now: i64,
    endpoint: &str,
) -> FailureResult<()> {
    let res = &body.updated_resources;
    assert_equal(1, res.user_items.len(), &count_hint(endpoint, "updatedResources.userItems"))?;
    let used = &res.user_items[0];

    let gained = exp_items
        .iter()
        .find(|m| m.id == used.item_id)
        .map(|m| m.gained_exp)
        .unwrap_or(0);
    let Some(card) = shadow.card(card_id).cloned() else {
        return Err(Failure::new(
            ErrorCode::ValidationFailedToLoadJson,
            format!("user {} has no card {}", shadow.id, card_id),
        ));
    };
    let Some(master) = cards.iter().find(|m| m.card_id == card.card_id) else {
        return Err(Failure::new(
            ErrorCode::ValidationFailedToLoadJson,
            format!("no card master for card {}", card.card_id),
        ));
    };
    let leveled = leveled_card(&card, master, gained * amount);

    let Some(actual_card) = res.user_cards.first() else {
        return Err(Hint::new(endpoint, "updatedResources.userCards").missing());
    };
    diff(
        &leveled,
        actual_card,
        &Hint::new(endpoint, "updatedResources.userCards."),
        &["updatedAt"],
    )?;

    let expected_item = UserItem {
        amount: item.amount - amount,
        updated_at: now,
        ..item.clone()
    };
    diff(
        &expected_item,
        used,
        &Hint::new(endpoint, "updatedResources.userItems."),
        &[],
    )?;

    if let Some(slot) = shadow.cards.iter_mut().find(|c| c.id == card_id) {
        *slot = leveled;
    }
    if let Some(slot) = shadow.items.iter_mut().find(|i| i.id == item.id) {
        *slot = expected_item;
    }
    Ok(())
}

/// First present page: appended presents anywhere up front, fixture presents newest first after them
pub fn check_present_list(body: &ListPresentResponse, shadow: &ValidationUser, endpoint: &str) -> FailureResult<()> {
    let (length, is_next) = shadow.expected_first_page();
    assert_equal(length, body.presents.len(), &count_hint(endpoint, "presents"))?;
    assert_equal(is_next, body.is_next, &Hint::new(endpoint, "isNext"))?;

    let offset = shadow.login_append_presents.len().min(body.presents.len());
    let head = &body.presents[..offset];
    for expected in &shadow.login_append_presents {
        for actual in head.iter().filter(|p| p.present_message == expected.present_message) {
            diff(
                expected,
                actual,
                &Hint::new(endpoint, "presents."),
                &["id", "sentAt", "createdAt", "updatedAt"],
            )?;
        }
    }

    let tail = &body.presents[offset..];
    for (expected, actual) in shadow.presents_newest_first().iter().zip(tail) {
        diff(expected, actual, &Hint::new(endpoint, "presents."), &[])?;
    }
    Ok(())
}

/// Receive: every listed present comes back updated and soft-deleted
pub fn check_receive(
    body: &UpdatedResourcesResponse,
    received: &[UserPresent],
    now: i64,
    endpoint: &str,
) -> FailureResult<()> {
    let presents = &body.updated_resources.user_presents;
    assert_equal(
        received.len(),
        presents.len(),
        &count_hint(endpoint, "updatedResources.userPresents"),
    )?;

    for (i, present) in received.iter().enumerate() {
        let Some(actual) = presents.iter().find(|p| p.id == present.id) else {
            return Err(Hint::new(
                endpoint,
                format!("updatedResources.userPresents id {}", present.id),
            )
            .missing());
        };
        let expected = UserPresent {
            updated_at: now,
            ..present.clone()
        };
        diff(
            &expected,
            actual,
            &Hint::new(endpoint, "updatedResources.userPresents."),
            &["deletedAt"],
        )?;
        if actual.deleted_at.is_none() {
            return Err(Hint::new(
                format!("{} userPresents[{}].id:{}", endpoint, i, actual.id),
                "updatedResources.userPresents.deletedAt",
            )
            .mismatch("not null", "null"));
        }
    }
    Ok(())
}

/// The first page once everything on it was received
pub fn check_page_after_receive(
    body: &ListPresentResponse,
    shadow: &ValidationUser,
    endpoint: &str,
) -> FailureResult<()> {
    assert_equal(
        shadow.expected_page_after_receive(),
        body.presents.len(),
        &count_hint(endpoint, "presents"),
    )
}

/// Stocked presents reached the inventory with at least their amount
pub fn check_items_after_receive(
    body: &ItemListResponse,
    received: &[UserPresent],
    endpoint: &str,
) -> FailureResult<()> {
    for present in received {
        if !(item_type::COIN..=item_type::TIMER).contains(&present.item_type) {
            return Err(Hint::new(endpoint, "itemType").mismatch("1..4", present.item_type));
        }
        if !item_type::is_stocked(present.item_type) {
            continue;
        }
        let expected = UserItem {
            user_id: present.user_id,
            item_type: present.item_type,
            item_id: present.item_id,
            amount: present.amount,
            ..UserItem::default()
        };
        for actual in body.items.iter().filter(|i| i.item_id == present.item_id) {
            diff(
                &expected,
                actual,
                &Hint::new(endpoint, "items."),
                &["id", "amount", "createdAt", "updatedAt", "deletedAt"],
            )?;
            if present.amount > actual.amount {
                return Err(Hint::new(endpoint, "items.amount")
                    .mismatch(format!(">= {}", present.amount), actual.amount));
            }
        }
    }
    Ok(())
}

/// Gacha list: the open gachas in display order with their full item tables
pub fn check_gacha_list(
    body: &ListGachaResponse,
    gachas: &[GachaData],
    now: i64,
    endpoint: &str,
) -> FailureResult<()> {
    let active = active_gachas(gachas, now);
    assert_equal(active.len(), body.gachas.len(), &count_hint(endpoint, "gachas"))?;

    for (expected, actual) in active.iter().zip(&body.gachas) {
        diff(&expected.gacha, &actual.gacha, &Hint::new(endpoint, "gachas.gacha."), &[])?;
        assert_equal(
            expected.gacha_items.len(),
            actual.gacha_items.len(),
            &count_hint(endpoint, "gachaItemList"),
        )?;
        assert_equal(
            total_weight(&expected.gacha_items),
            total_weight(&actual.gacha_items),
            &Hint::new(endpoint, "gachaItemList total weight"),
        )?;
        for (item, actual_item) in expected.gacha_items.iter().zip(&actual.gacha_items) {
            diff(item, actual_item, &Hint::new(endpoint, "gachas.gachaItemList."), &[])?;
        }
    }
    Ok(())
}

/// Ten presents, each one something the drawn gacha can emit
pub fn check_gacha_draw(
    body: &DrawGachaResponse,
    gacha: &GachaData,
    user_id: i64,
    now: i64,
    endpoint: &str,
) -> FailureResult<()> {
    assert_equal(DRAW_COUNT, body.presents.len(), &count_hint(endpoint, "presents"))?;

    for (i, present) in body.presents.iter().enumerate() {
        let Some(emitted) = gacha_emission(gacha, present.item_id) else {
            return Err(Hint::new(endpoint, format!("presents[{}].itemId", i))
                .mismatch(format!("an item of gacha {}", gacha.gacha.id), present.item_id));
        };
        let expected = UserPresent {
            user_id,
            sent_at: now,
            item_type: emitted.item_type,
            item_id: emitted.item_id,
            amount: emitted.amount,
            created_at: now,
            updated_at: now,
            ..UserPresent::default()
        };
        diff(
            &expected,
            present,
            &Hint::new(endpoint, "presents."),
            &["id", "presentMessage"],
        )?;
    }
    Ok(())
}
