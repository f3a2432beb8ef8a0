//! Response bodies returned by the target service

use serde::{Deserialize, Serialize};

use crate::master::{
    GachaItemMaster, GachaMaster, ItemMaster, LoginBonusMaster, LoginBonusRewardMaster,
    PresentAllMaster, VersionMaster,
};
use crate::user::{
    AdminSession, UpdatedResources, User, UserCard, UserDeck, UserDevice, UserItem, UserLoginBonus,
    UserPresent, UserPresentAllReceivedHistory,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InitializeResponse {
    pub language: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginResponse {
    pub viewer_id: String,
    pub session_id: String,
    pub updated_resources: UpdatedResources,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserResponse {
    pub user_id: i64,
    pub viewer_id: String,
    pub session_id: String,
    pub created_at: i64,
    pub updated_resources: UpdatedResources,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeResponse {
    pub now: i64,
    pub user: User,
    pub deck: UserDeck,
    pub total_amount_per_sec: i64,
    pub past_time: i64,
}

/// Body of endpoints that only report updated resources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatedResourcesResponse {
    pub updated_resources: UpdatedResources,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemListResponse {
    pub one_time_token: String,
    pub user: User,
    pub items: Vec<UserItem>,
    pub cards: Vec<UserCard>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListPresentResponse {
    pub presents: Vec<UserPresent>,
    pub is_next: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListGachaResponse {
    pub one_time_token: String,
    pub gachas: Vec<GachaData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GachaData {
    pub gacha: GachaMaster,
    #[serde(rename = "gachaItemList")]
    pub gacha_items: Vec<GachaItemMaster>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawGachaResponse {
    pub presents: Vec<UserPresent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminLoginResponse {
    pub session: AdminSession,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminUpdateMasterResponse {
    pub version_master: VersionMaster,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminMasterResponse {
    #[serde(rename = "versionMaster")]
    pub version_masters: Vec<VersionMaster>,
    pub items: Vec<ItemMaster>,
    pub gachas: Vec<GachaMaster>,
    #[serde(rename = "gachaItems")]
    pub gacha_items: Vec<GachaItemMaster>,
    #[serde(rename = "presentAlls")]
    pub present_alls: Vec<PresentAllMaster>,
    #[serde(rename = "loginBonuses")]
    pub login_bonuses: Vec<LoginBonusMaster>,
    #[serde(rename = "loginBonusRewards")]
    pub login_bonus_rewards: Vec<LoginBonusRewardMaster>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminUserResponse {
    pub user: User,
    pub user_devices: Vec<UserDevice>,
    pub user_cards: Vec<UserCard>,
    pub user_decks: Vec<UserDeck>,
    pub user_items: Vec<UserItem>,
    pub user_login_bonuses: Vec<UserLoginBonus>,
    pub user_presents: Vec<UserPresent>,
    pub user_present_all_received_history: Vec<UserPresentAllReceivedHistory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminBanResponse {
    pub user: User,
}

/// Error body the target returns on 4xx responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailResponse {
    pub status_code: i64,
    pub message: String,
}

impl FailResponse {
    pub fn new(status_code: i64, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}
