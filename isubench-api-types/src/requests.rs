//! Request bodies sent to the target service

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_id: i64,
    pub viewer_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub viewer_id: String,
    pub platform_type: i64,
}

/// Body for endpoints that only need the viewer id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRequest {
    pub viewer_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDeckRequest {
    pub viewer_id: String,
    pub card_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExpRequest {
    pub viewer_id: String,
    pub one_time_token: String,
    pub items: Vec<AddExpItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddExpItem {
    pub id: i64,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivePresentRequest {
    pub viewer_id: String,
    pub present_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawGachaRequest {
    pub viewer_id: String,
    pub one_time_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    pub user_id: i64,
    pub password: String,
}
