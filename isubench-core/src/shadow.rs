//! Shadow model of a validation user's server-side state
//!
//! The validation scenario derives every expected body from this model and
//! updates it right after each assertion, so later steps are checked against
//! the state the target should have reached rather than the original fixture.

use crate::actor::Identified;
use isubench_api_types::{
    item_type, CardMaster, GachaData, GachaItemMaster, LoginBonusRewardMaster, PresentAllMaster, User,
    UserCard, UserDeck, UserDevice, UserItem, UserLoginBonus, UserPresent, UserPresentAllReceivedHistory,
    ValidationUserFixture,
};

/// Sequence after which the looping login bonus starts over
pub const LAST_LOGIN_BONUS_SEQUENCE: i64 = 28;

/// Login bonus that loops
pub const LOOPED_LOGIN_BONUS_ID: i64 = 1;

/// Presents per page of the present list
pub const PRESENT_PAGE_SIZE: usize = 100;

/// Card every new user starts with, three times
pub const STARTER_CARD_ID: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationUser {
    pub id: i64,
    pub user_type: String,
    pub viewer_id: String,
    pub login_bonuses: Vec<UserLoginBonus>,
    pub login_append_presents: Vec<UserPresent>,
    pub user: User,
    pub deck: UserDeck,
    pub devices: Vec<UserDevice>,
    pub total_amount_per_sec: i64,
    pub items: Vec<UserItem>,
    pub cards: Vec<UserCard>,
    pub presents: Vec<UserPresent>,
    pub all_presents: Vec<UserPresent>,
    pub present_all_histories: Vec<UserPresentAllReceivedHistory>,
}

impl From<ValidationUserFixture> for ValidationUser {
    fn from(f: ValidationUserFixture) -> Self {
        Self {
            id: f.user_id,
            user_type: f.user_type,
            viewer_id: f.viewer_id,
            login_bonuses: f.login_bonuses,
            login_append_presents: f.login_append_presents,
            user: f.user,
            deck: f.deck,
            devices: f.devices,
            total_amount_per_sec: f.total_amount_per_sec,
            items: f.items,
            cards: f.cards,
            presents: f.presents,
            all_presents: f.all_presents,
            present_all_histories: f.present_all_histories,
        }
    }
}

impl Identified for ValidationUser {
    fn id(&self) -> i64 {
        self.id
    }
}

impl ValidationUser {
    /// Count one more login on the looping bonus, wrapping after the last sequence
    pub fn advance_login_bonus(&mut self) {
        if let Some(bonus) = self.login_bonuses.first_mut() {
            if bonus.login_bonus_id != LOOPED_LOGIN_BONUS_ID {
                return;
            }
            if bonus.last_reward_sequence == LAST_LOGIN_BONUS_SEQUENCE {
                bonus.last_reward_sequence = 1;
                bonus.loop_count += 1;
            } else {
                bonus.last_reward_sequence += 1;
            }
        }
    }

    /// Reward row for the current position of the first login bonus
    pub fn current_login_reward<'a>(
        &self,
        rewards: &'a [LoginBonusRewardMaster],
    ) -> Option<&'a LoginBonusRewardMaster> {
        let bonus = self.login_bonuses.first()?;
        rewards.iter().find(|r| {
            r.login_bonus_id == bonus.login_bonus_id && r.reward_sequence == bonus.last_reward_sequence
        })
    }

    /// Credit the coin part of today's login reward
    pub fn apply_login_coin(&mut self, rewards: &[LoginBonusRewardMaster]) {
        let coin = self
            .current_login_reward(rewards)
            .filter(|r| r.item_type == item_type::COIN)
            .map(|r| r.amount);
        if let Some(amount) = coin {
            self.user.isu_coin += amount;
        }
    }

    /// Stock an item reward, stacking onto an existing row of the same item
    pub fn apply_item_reward(&mut self, reward: &LoginBonusRewardMaster, now: i64) {
        if !item_type::is_stocked(reward.item_type) {
            return;
        }
        let mut found = false;
        for item in self.items.iter_mut().filter(|i| i.item_id == reward.item_id) {
            item.amount += reward.amount;
            found = true;
        }
        if !found {
            self.items.push(UserItem {
                id: 0,
                user_id: self.id,
                item_type: reward.item_type,
                item_id: reward.item_id,
                amount: reward.amount,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            });
        }
    }

    /// Coin balance after collecting the accrued reward at `now`
    pub fn reward_coin(&self, now: i64) -> i64 {
        self.total_amount_per_sec * (now - self.user.last_get_reward_at) + self.user.isu_coin
    }

    pub fn collect_reward(&mut self, now: i64) {
        self.user.isu_coin = self.reward_coin(now);
        self.user.last_get_reward_at = now;
    }

    /// Production rate of a deck made of the given user-card ids
    pub fn deck_amount_per_sec(&self, card_ids: &[i64]) -> i64 {
        self.cards
            .iter()
            .filter(|c| card_ids.contains(&c.id))
            .map(|c| c.amount_per_sec)
            .sum()
    }

    pub fn set_deck(&mut self, card_ids: [i64; 3]) {
        self.deck.card_id_1 = card_ids[0];
        self.deck.card_id_2 = card_ids[1];
        self.deck.card_id_3 = card_ids[2];
        self.total_amount_per_sec = self.deck_amount_per_sec(&card_ids);
    }

    /// The last three cards, newest first
    pub fn last_three_card_ids(&self) -> Option<[i64; 3]> {
        let n = self.cards.len();
        if n < 3 {
            return None;
        }
        Some([self.cards[n - 1].id, self.cards[n - 2].id, self.cards[n - 3].id])
    }

    pub fn card(&self, id: i64) -> Option<&UserCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn item(&self, id: i64) -> Option<&UserItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn first_exp_item(&self) -> Option<&UserItem> {
        self.items.iter().find(|i| i.item_type == item_type::EXP)
    }

    /// Length and `isNext` flag of the first present page
    pub fn expected_first_page(&self) -> (usize, bool) {
        let total = self.presents.len() + self.login_append_presents.len();
        (total.min(PRESENT_PAGE_SIZE), total > PRESENT_PAGE_SIZE)
    }

    /// Length of the first page once every present on it was received
    pub fn expected_page_after_receive(&self) -> usize {
        let total = self.presents.len() + self.login_append_presents.len();
        total.saturating_sub(PRESENT_PAGE_SIZE).min(PRESENT_PAGE_SIZE)
    }

    /// Fixture presents in listing order, newest first
    pub fn presents_newest_first(&self) -> Vec<UserPresent> {
        let mut presents = self.presents.clone();
        presents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        presents
    }
}

/// Exp needed to leave `level`, truncated like the target does
pub fn next_level_threshold(base_exp_per_level: i64, level: i64) -> i64 {
    (base_exp_per_level as f64 * 1.2_f64.powi((level - 1) as i32)) as i64
}

/// A card after gaining `gained_exp`, leveling up as many times as the exp allows
pub fn leveled_card(card: &UserCard, master: &CardMaster, gained_exp: i64) -> UserCard {
    let mut card = card.clone();
    card.total_exp += gained_exp;
    let step = if master.max_level > 1 {
        (master.max_amount_per_sec - master.base_amount_per_sec) / (master.max_level - 1)
    } else {
        0
    };
    loop {
        let threshold = next_level_threshold(master.base_exp_per_level, card.level);
        if threshold > card.total_exp || (master.max_level > 0 && card.level >= master.max_level) {
            break;
        }
        card.level += 1;
        card.amount_per_sec += step;
    }
    card
}

/// Starter card a newly registered user owns three of
pub fn starter_card(user_id: i64, now: i64) -> UserCard {
    UserCard {
        id: 0,
        user_id,
        card_id: STARTER_CARD_ID,
        amount_per_sec: 1,
        level: 1,
        total_exp: 0,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

/// Login bonus rows a user gets on registration: one per bonus with a first-day reward
pub fn starter_login_bonuses(rewards: &[LoginBonusRewardMaster], user_id: i64, now: i64) -> Vec<UserLoginBonus> {
    rewards
        .iter()
        .filter(|r| r.reward_sequence == 1)
        .map(|r| UserLoginBonus {
            id: 0,
            user_id,
            login_bonus_id: r.login_bonus_id,
            last_reward_sequence: 1,
            loop_count: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
        .collect()
}

/// Presents for every present-all campaign open at registration time
pub fn registration_presents(masters: &[PresentAllMaster], user_id: i64, now: i64) -> Vec<UserPresent> {
    masters
        .iter()
        .filter(|m| m.is_open_at(now))
        .map(|m| UserPresent {
            id: 0,
            user_id,
            sent_at: now,
            item_type: m.item_type,
            item_id: m.item_id,
            amount: m.amount,
            present_message: m.present_message.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
        .collect()
}

/// Gachas open at `now`, by display order, each with its items sorted by id
pub fn active_gachas(all: &[GachaData], now: i64) -> Vec<GachaData> {
    let mut active: Vec<GachaData> = all.iter().filter(|g| g.gacha.is_active_at(now)).cloned().collect();
    active.sort_by_key(|g| g.gacha.display_order);
    for gacha in active.iter_mut() {
        gacha.gacha_items.sort_by_key(|i| i.id);
    }
    active
}

pub fn total_weight(items: &[GachaItemMaster]) -> i64 {
    items.iter().map(|i| i.weight).sum()
}

/// The gacha row that would emit `item_id`, if any
pub fn gacha_emission<'a>(gacha: &'a GachaData, item_id: i64) -> Option<&'a GachaItemMaster> {
    gacha.gacha_items.iter().find(|i| i.item_id == item_id)
}
