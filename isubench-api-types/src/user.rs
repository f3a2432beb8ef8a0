//! Per-user resources returned by the target service

use serde::{Deserialize, Serialize};

/// The user row itself
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: i64,
    pub isu_coin: i64,
    pub last_get_reward_at: i64,
    pub last_activated_at: i64,
    pub registered_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDevice {
    pub id: i64,
    pub user_id: i64,
    pub platform_id: String,
    pub platform_type: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserCard {
    pub id: i64,
    pub user_id: i64,
    pub card_id: i64,
    pub amount_per_sec: i64,
    pub level: i64,
    pub total_exp: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

/// Three-card deck; the card fields hold user-card ids
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDeck {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "cardId1")]
    pub card_id_1: i64,
    #[serde(rename = "cardId2")]
    pub card_id_2: i64,
    #[serde(rename = "cardId3")]
    pub card_id_3: i64,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
    #[serde(rename = "deletedAt")]
    pub deleted_at: Option<i64>,
}

impl UserDeck {
    pub fn card_ids(&self) -> [i64; 3] {
        [self.card_id_1, self.card_id_2, self.card_id_3]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserItem {
    pub id: i64,
    pub user_id: i64,
    pub item_type: i64,
    pub item_id: i64,
    pub amount: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserLoginBonus {
    pub id: i64,
    pub user_id: i64,
    pub login_bonus_id: i64,
    pub last_reward_sequence: i64,
    pub loop_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPresent {
    pub id: i64,
    pub user_id: i64,
    pub sent_at: i64,
    pub item_type: i64,
    pub item_id: i64,
    pub amount: i64,
    pub present_message: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPresentAllReceivedHistory {
    pub id: i64,
    pub user_id: i64,
    pub present_all_id: i64,
    pub received_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Admin session row returned by `POST /admin/login`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminSession {
    pub id: i64,
    pub user_id: i64,
    pub session_id: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub expired_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Resources a mutating endpoint reports as changed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatedResources {
    pub now: i64,
    pub user: User,
    pub user_device: UserDevice,
    pub user_cards: Vec<UserCard>,
    pub user_decks: Vec<UserDeck>,
    pub user_items: Vec<UserItem>,
    pub user_login_bonuses: Vec<UserLoginBonus>,
    pub user_presents: Vec<UserPresent>,
}
