//! Wire types for the game-service protocol driven by isubench
//!
//! Every type here mirrors a JSON document exchanged with the target service
//! or loaded from a fixture snapshot. Structs deserialize leniently: missing
//! fields fall back to their zero value so a partial body reaches the
//! validators, which then report the concrete field that is wrong.

pub mod fixture;
pub mod master;
pub mod requests;
pub mod responses;
pub mod user;

pub use fixture::{PlatformFixture, UserFixture, ValidationUserFixture};
pub use master::{
    CardMaster, ExpItemMaster, GachaItemMaster, GachaMaster, ItemMaster, LoginBonusMaster,
    LoginBonusRewardMaster, PresentAllMaster, VersionMaster,
};
pub use requests::{
    AddExpItem, AddExpRequest, AdminLoginRequest, CreateUserRequest, DrawGachaRequest, LoginRequest,
    ReceivePresentRequest, RewardRequest, SetDeckRequest,
};
pub use responses::{
    AdminBanResponse, AdminLoginResponse, AdminMasterResponse, AdminUpdateMasterResponse,
    AdminUserResponse, CreateUserResponse, DrawGachaResponse, FailResponse, GachaData, HomeResponse,
    InitializeResponse, ItemListResponse, ListGachaResponse, ListPresentResponse, LoginResponse,
    UpdatedResourcesResponse,
};
pub use user::{
    AdminSession, UpdatedResources, User, UserCard, UserDeck, UserDevice, UserItem, UserLoginBonus,
    UserPresent, UserPresentAllReceivedHistory,
};

/// Item type codes shared by presents, items and master rows
pub mod item_type {
    pub const COIN: i64 = 1;
    pub const CARD: i64 = 2;
    pub const EXP: i64 = 3;
    pub const TIMER: i64 = 4;

    /// Item types that are stocked in the user's item inventory
    pub fn is_stocked(item_type: i64) -> bool {
        item_type == EXP || item_type == TIMER
    }
}
