//! Pre-generated population snapshots loaded at startup

use serde::{Deserialize, Serialize};

use crate::user::{
    User, UserCard, UserDeck, UserDevice, UserItem, UserLoginBonus, UserPresent,
    UserPresentAllReceivedHistory,
};

/// A regular or banned user that logs in during the load phase
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFixture {
    pub user_id: i64,
    pub user_type: String,
    pub viewer_id: String,
}

/// An unregistered device identity consumed by the registration flow
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformFixture {
    pub platform_id: i64,
    pub platform_type: i64,
}

/// A user with its complete expected server state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationUserFixture {
    pub user_id: i64,
    pub user_type: String,
    pub viewer_id: String,
    #[serde(rename = "userLoginBonuses")]
    pub login_bonuses: Vec<UserLoginBonus>,
    #[serde(rename = "userLoginAppendPresents")]
    pub login_append_presents: Vec<UserPresent>,
    pub user: User,
    #[serde(rename = "userDeck")]
    pub deck: UserDeck,
    #[serde(rename = "userDevices")]
    pub devices: Vec<UserDevice>,
    #[serde(rename = "totalAmountPerSec")]
    pub total_amount_per_sec: i64,
    #[serde(rename = "userItem")]
    pub items: Vec<UserItem>,
    #[serde(rename = "userCard")]
    pub cards: Vec<UserCard>,
    #[serde(rename = "userPresent")]
    pub presents: Vec<UserPresent>,
    #[serde(rename = "userAllPresents")]
    pub all_presents: Vec<UserPresent>,
    #[serde(rename = "userPresentAllReceivedHistory")]
    pub present_all_histories: Vec<UserPresentAllReceivedHistory>,
}
