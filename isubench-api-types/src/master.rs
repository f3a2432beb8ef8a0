//! Master data rows, as served by `GET /admin/master` and shipped in fixtures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VersionMaster {
    pub id: i64,
    pub master_version: String,
    pub status: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GachaMaster {
    pub id: i64,
    pub name: String,
    pub start_at: i64,
    pub end_at: i64,
    pub display_order: i64,
    pub created_at: i64,
}

impl GachaMaster {
    /// Whether the gacha is open at the given unix time; both bounds are exclusive
    pub fn is_active_at(&self, now: i64) -> bool {
        self.start_at < now && now < self.end_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GachaItemMaster {
    pub id: i64,
    pub gacha_id: i64,
    pub item_type: i64,
    pub item_id: i64,
    pub amount: i64,
    pub weight: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemMaster {
    pub id: i64,
    pub item_type: i64,
    pub name: String,
    pub description: String,
    pub amount_per_sec: Option<i64>,
    pub max_level: Option<i64>,
    pub max_amount_per_sec: Option<i64>,
    pub base_exp_per_level: Option<i64>,
    pub gained_exp: Option<i64>,
    pub shortening_min: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresentAllMaster {
    pub id: i64,
    pub registered_start_at: i64,
    pub registered_end_at: i64,
    pub item_type: i64,
    #[serde(rename = "itemID")]
    pub item_id: i64,
    pub amount: i64,
    pub present_message: String,
    pub created_at: i64,
}

impl PresentAllMaster {
    /// Whether a user registered at `now` receives this present
    pub fn is_open_at(&self, now: i64) -> bool {
        self.registered_start_at < now && now < self.registered_end_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginBonusMaster {
    pub id: i64,
    pub start_at: i64,
    pub end_at: i64,
    pub column_count: i64,
    pub looped: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginBonusRewardMaster {
    pub id: i64,
    pub login_bonus_id: i64,
    pub reward_sequence: i64,
    pub item_type: i64,
    pub item_id: i64,
    pub amount: i64,
}

/// Leveling parameters for a card, keyed by the card's item id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardMaster {
    #[serde(rename = "id")]
    pub card_id: i64,
    #[serde(rename = "baseExpPerLevel")]
    pub base_exp_per_level: i64,
    #[serde(rename = "maxAmountPerSec")]
    pub max_amount_per_sec: i64,
    #[serde(rename = "amountPerSec")]
    pub base_amount_per_sec: i64,
    #[serde(rename = "maxLevel")]
    pub max_level: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpItemMaster {
    pub id: i64,
    pub gained_exp: i64,
}
