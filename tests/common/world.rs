//! The game state the stub target serves to validation users
//!
//! One [`World`] is both written out as fixture dumps and loaded into the
//! stub, so every body the validation walk checks agrees with its fixtures.

use anyhow::Result;
use isubench_api_types::{
    item_type, CardMaster, ExpItemMaster, GachaData, GachaItemMaster, GachaMaster, LoginBonusRewardMaster,
    PresentAllMaster, User, UserCard, UserDeck, UserDevice, UserItem, UserPresent, UserPresentAllReceivedHistory,
    ValidationUserFixture,
};
use isubench_scenario::flows::DRAW_GACHA_ID;
use isubench_scenario::validation::{
    CARD_MASTER_FILE, EXP_ITEM_MASTER_FILE, GACHA_MASTER_FILE, LOGIN_BONUS_REWARD_MASTER_FILE,
    PRESENT_ALL_MASTER_FILE, VALIDATION_USER_FILE,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

pub const VALIDATION_USER_IDS: [i64; 2] = [20001, 20002];

/// Creation time of every seeded row
const SEEDED_AT: i64 = 1661000000;

/// Exp item every validation user holds a stack of
const EXP_ITEM_ID: i64 = 2;

/// Card item every user card is an instance of
const CARD_ITEM_ID: i64 = 2;

/// Server-side rows of one validation user
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub deck: UserDeck,
    pub devices: Vec<UserDevice>,
    pub cards: Vec<UserCard>,
    pub items: Vec<UserItem>,
    /// Received presents included, soft-deleted
    pub presents: Vec<UserPresent>,
    pub histories: Vec<UserPresentAllReceivedHistory>,
}

impl Account {
    pub fn total_amount_per_sec(&self) -> i64 {
        let deck = self.deck.card_ids();
        self.cards
            .iter()
            .filter(|c| deck.contains(&c.id))
            .map(|c| c.amount_per_sec)
            .sum()
    }

    /// Unreceived presents, newest first
    pub fn live_presents(&self) -> Vec<UserPresent> {
        let mut live: Vec<UserPresent> = self.presents.iter().filter(|p| p.deleted_at.is_none()).cloned().collect();
        live.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        live
    }
}

impl From<&ValidationUserFixture> for Account {
    fn from(f: &ValidationUserFixture) -> Self {
        Self {
            user: f.user.clone(),
            deck: f.deck.clone(),
            devices: f.devices.clone(),
            cards: f.cards.clone(),
            items: f.items.clone(),
            presents: f.all_presents.clone(),
            histories: f.present_all_histories.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct World {
    pub users: Vec<ValidationUserFixture>,
    pub exp_items: Vec<ExpItemMaster>,
    pub cards: Vec<CardMaster>,
    pub gachas: Vec<GachaData>,
}

impl World {
    pub fn standard() -> Self {
        Self {
            users: VALIDATION_USER_IDS.iter().map(|&id| validation_user(id)).collect(),
            exp_items: vec![ExpItemMaster {
                id: EXP_ITEM_ID,
                gained_exp: 150,
            }],
            cards: vec![CardMaster {
                card_id: CARD_ITEM_ID,
                base_exp_per_level: 100,
                max_amount_per_sec: 9,
                base_amount_per_sec: 1,
                max_level: 5,
            }],
            gachas: vec![
                GachaData {
                    gacha: GachaMaster {
                        id: DRAW_GACHA_ID,
                        name: "standard".to_string(),
                        start_at: 0,
                        end_at: 4102444800,
                        display_order: 2,
                        created_at: SEEDED_AT,
                    },
                    gacha_items: vec![
                        gacha_item(2, DRAW_GACHA_ID, item_type::CARD, 4, 1, 80),
                        gacha_item(1, DRAW_GACHA_ID, item_type::EXP, EXP_ITEM_ID, 3, 20),
                    ],
                },
                GachaData {
                    gacha: GachaMaster {
                        id: DRAW_GACHA_ID + 1,
                        name: "launch".to_string(),
                        start_at: 0,
                        end_at: 1000,
                        display_order: 1,
                        created_at: SEEDED_AT,
                    },
                    gacha_items: vec![gacha_item(3, DRAW_GACHA_ID + 1, item_type::TIMER, 3, 1, 1)],
                },
            ],
        }
    }

    pub fn accounts(&self) -> HashMap<i64, Account> {
        self.users.iter().map(|u| (u.user_id, Account::from(u))).collect()
    }

    /// Open gachas by display order, each with its items sorted by id
    pub fn active_gachas(&self, now: i64) -> Vec<GachaData> {
        let mut active: Vec<GachaData> = self
            .gachas
            .iter()
            .filter(|g| g.gacha.start_at < now && now < g.gacha.end_at)
            .cloned()
            .collect();
        active.sort_by_key(|g| g.gacha.display_order);
        for gacha in &mut active {
            gacha.gacha_items.sort_by_key(|i| i.id);
        }
        active
    }

    pub fn gained_exp(&self, item_id: i64) -> i64 {
        self.exp_items
            .iter()
            .find(|m| m.id == item_id)
            .map(|m| m.gained_exp)
            .unwrap_or(0)
    }

    pub fn card_master(&self, card_id: i64) -> Option<&CardMaster> {
        self.cards.iter().find(|m| m.card_id == card_id)
    }

    /// Write the validation users and master tables the walk loads
    pub fn write(&self, dir: &Path) -> Result<()> {
        write_json(dir, VALIDATION_USER_FILE, &self.users)?;
        write_json(dir, EXP_ITEM_MASTER_FILE, &self.exp_items)?;
        write_json(dir, CARD_MASTER_FILE, &self.cards)?;
        write_json(dir, GACHA_MASTER_FILE, &self.gachas)?;
        write_json(dir, LOGIN_BONUS_REWARD_MASTER_FILE, &Vec::<LoginBonusRewardMaster>::new())?;
        write_json(dir, PRESENT_ALL_MASTER_FILE, &Vec::<PresentAllMaster>::new())?;
        Ok(())
    }
}

fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<()> {
    std::fs::write(dir.join(name), serde_json::to_vec(value)?)?;
    Ok(())
}

/// Feed `exp` to a card and level it up as far as the exp reaches
pub fn feed_card(card: &mut UserCard, master: &CardMaster, exp: i64) {
    card.total_exp += exp;
    let step = (master.max_amount_per_sec - master.base_amount_per_sec) / (master.max_level - 1).max(1);
    while card.level < master.max_level {
        let threshold = (master.base_exp_per_level as f64 * 1.2_f64.powi((card.level - 1) as i32)) as i64;
        if threshold > card.total_exp {
            break;
        }
        card.level += 1;
        card.amount_per_sec += step;
    }
}

fn gacha_item(id: i64, gacha_id: i64, item_type: i64, item_id: i64, amount: i64, weight: i64) -> GachaItemMaster {
    GachaItemMaster {
        id,
        gacha_id,
        item_type,
        item_id,
        amount,
        weight,
        created_at: SEEDED_AT,
    }
}

fn validation_user(id: i64) -> ValidationUserFixture {
    let cards: Vec<UserCard> = (1..=4)
        .map(|n| UserCard {
            id: id * 10 + n,
            user_id: id,
            card_id: CARD_ITEM_ID,
            amount_per_sec: n,
            level: 1,
            total_exp: 0,
            created_at: SEEDED_AT,
            updated_at: SEEDED_AT,
            deleted_at: None,
        })
        .collect();
    let deck = UserDeck {
        id,
        user_id: id,
        card_id_1: cards[0].id,
        card_id_2: cards[1].id,
        card_id_3: cards[2].id,
        created_at: SEEDED_AT,
        updated_at: SEEDED_AT,
        deleted_at: None,
    };
    let item = |n: i64, item_type: i64, item_id: i64, amount: i64| UserItem {
        id: id * 10 + n,
        user_id: id,
        item_type,
        item_id,
        amount,
        created_at: SEEDED_AT,
        updated_at: SEEDED_AT,
        deleted_at: None,
    };
    let present = |n: i64, amount: i64, message: &str, deleted_at: Option<i64>| UserPresent {
        id: id * 100 + n,
        user_id: id,
        sent_at: SEEDED_AT + n * 10,
        item_type: item_type::COIN,
        item_id: 1,
        amount,
        present_message: message.to_string(),
        created_at: SEEDED_AT + n * 10,
        updated_at: deleted_at.unwrap_or(SEEDED_AT + n * 10),
        deleted_at,
    };
    let all_presents = vec![
        present(0, 50, "received", Some(SEEDED_AT + 5)),
        present(1, 100, "welcome", None),
        present(2, 300, "campaign", None),
    ];

    ValidationUserFixture {
        user_id: id,
        user_type: "royal".to_string(),
        viewer_id: format!("validation-viewer-{}", id),
        login_bonuses: Vec::new(),
        login_append_presents: Vec::new(),
        user: User {
            id,
            isu_coin: 1000,
            last_get_reward_at: SEEDED_AT + 100,
            last_activated_at: SEEDED_AT + 100,
            registered_at: SEEDED_AT,
            created_at: SEEDED_AT,
            updated_at: SEEDED_AT + 100,
            deleted_at: None,
        },
        deck,
        devices: vec![UserDevice {
            id,
            user_id: id,
            platform_id: format!("device-{}", id),
            platform_type: 1,
            created_at: SEEDED_AT,
            updated_at: SEEDED_AT,
            deleted_at: None,
        }],
        total_amount_per_sec: cards[..3].iter().map(|c| c.amount_per_sec).sum(),
        items: vec![item(5, item_type::EXP, EXP_ITEM_ID, 5), item(6, item_type::TIMER, 3, 1)],
        cards,
        presents: all_presents.iter().filter(|p| p.deleted_at.is_none()).cloned().collect(),
        all_presents,
        present_all_histories: vec![UserPresentAllReceivedHistory {
            id,
            user_id: id,
            present_all_id: 1,
            received_at: SEEDED_AT,
            created_at: SEEDED_AT,
            updated_at: SEEDED_AT,
            deleted_at: None,
        }],
    }
}
