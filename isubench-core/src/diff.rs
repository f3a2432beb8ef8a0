//! Structural diff oracle
//!
//! Each wire type declares its fields once through [`Diffable`], keyed by
//! their JSON names. [`diff`] walks two values of the same type in that
//! order, skips ignored names and reports the first mismatch against the
//! hint's endpoint and field path.

use crate::error::FailureResult;
use crate::validation::Hint;
use isubench_api_types::{
    AdminSession, FailResponse, GachaItemMaster, GachaMaster, ItemMaster, LoginBonusRewardMaster, User,
    UserCard, UserDeck, UserDevice, UserItem, UserLoginBonus, UserPresent, UserPresentAllReceivedHistory,
    VersionMaster,
};
use std::fmt;

/// A comparable leaf value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Int(i64),
    Bool(bool),
    Str(&'a str),
    Nullable(Option<i64>),
}

impl FieldValue<'_> {
    /// Leaf equality; nullable fields match only when both are unset or both hold the same value
    pub fn matches(&self, other: &FieldValue<'_>) -> bool {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Str(a), FieldValue::Str(b)) => a == b,
            (FieldValue::Nullable(a), FieldValue::Nullable(b)) => match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Str(v) => write!(f, "{}", v),
            FieldValue::Nullable(Some(v)) => write!(f, "{}", v),
            FieldValue::Nullable(None) => write!(f, "null"),
        }
    }
}

/// Declared field list of a wire type, in JSON names
pub trait Diffable {
    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)>;
}

/// Compare two values field by field; the first mismatch wins
pub fn diff<T: Diffable>(expected: &T, actual: &T, hint: &Hint, ignore: &[&str]) -> FailureResult<()> {
    let actual_fields = actual.fields();
    for (i, (name, expected_value)) in expected.fields().into_iter().enumerate() {
        if ignore.contains(&name) {
            continue;
        }
        let actual_value = actual_fields[i].1;
        if !expected_value.matches(&actual_value) {
            return Err(hint.field(name).mismatch(expected_value, actual_value));
        }
    }
    Ok(())
}

trait AsFieldValue {
    fn as_field_value(&self) -> FieldValue<'_>;
}

impl AsFieldValue for i64 {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Int(*self)
    }
}

impl AsFieldValue for bool {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self.as_str())
    }
}

impl AsFieldValue for Option<i64> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Nullable(*self)
    }
}

macro_rules! diffable {
    ($ty:ty { $($name:literal => $field:ident),* $(,)? }) => {
        impl Diffable for $ty {
            fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
                vec![$(($name, self.$field.as_field_value())),*]
            }
        }
    };
}

diffable!(User {
    "id" => id,
    "isuCoin" => isu_coin,
    "lastGetRewardAt" => last_get_reward_at,
    "lastActivatedAt" => last_activated_at,
    "registeredAt" => registered_at,
    "createdAt" => created_at,
    "updatedAt" => updated_at,
    "deletedAt" => deleted_at,
});

diffable!(UserDevice {
    "id" => id,
    "userId" => user_id,
    "platformId" => platform_id,
    "platformType" => platform_type,
    "createdAt" => created_at,
    "updatedAt" => updated_at,
    "deletedAt" => deleted_at,
});

diffable!(UserCard {
    "id" => id,
    "userId" => user_id,
    "cardId" => card_id,
    "amountPerSec" => amount_per_sec,
    "level" => level,
    "totalExp" => total_exp,
    "createdAt" => created_at,
    "updatedAt" => updated_at,
    "deletedAt" => deleted_at,
});

diffable!(UserDeck {
    "id" => id,
    "userId" => user_id,
    "cardId1" => card_id_1,
    "cardId2" => card_id_2,
    "cardId3" => card_id_3,
    "createdAt" => created_at,
    "updatedAt" => updated_at,
    "deletedAt" => deleted_at,
});

diffable!(UserItem {
    "id" => id,
    "userId" => user_id,
    "itemType" => item_type,
    "itemId" => item_id,
    "amount" => amount,
    "createdAt" => created_at,
    "updatedAt" => updated_at,
    "deletedAt" => deleted_at,
});

diffable!(UserLoginBonus {
    "id" => id,
    "userId" => user_id,
    "loginBonusId" => login_bonus_id,
    "lastRewardSequence" => last_reward_sequence,
    "loopCount" => loop_count,
    "createdAt" => created_at,
    "updatedAt" => updated_at,
    "deletedAt" => deleted_at,
});

diffable!(UserPresent {
    "id" => id,
    "userId" => user_id,
    "sentAt" => sent_at,
    "itemType" => item_type,
    "itemId" => item_id,
    "amount" => amount,
    "presentMessage" => present_message,
    "createdAt" => created_at,
    "updatedAt" => updated_at,
    "deletedAt" => deleted_at,
});

diffable!(UserPresentAllReceivedHistory {
    "id" => id,
    "userId" => user_id,
    "presentAllId" => present_all_id,
    "receivedAt" => received_at,
    "createdAt" => created_at,
    "updatedAt" => updated_at,
    "deletedAt" => deleted_at,
});

diffable!(AdminSession {
    "id" => id,
    "userId" => user_id,
    "sessionId" => session_id,
    "createdAt" => created_at,
    "updatedAt" => updated_at,
    "expiredAt" => expired_at,
    "deletedAt" => deleted_at,
});

diffable!(VersionMaster {
    "id" => id,
    "masterVersion" => master_version,
    "status" => status,
});

diffable!(GachaMaster {
    "id" => id,
    "name" => name,
    "startAt" => start_at,
    "endAt" => end_at,
    "displayOrder" => display_order,
    "createdAt" => created_at,
});

diffable!(GachaItemMaster {
    "id" => id,
    "gachaId" => gacha_id,
    "itemType" => item_type,
    "itemId" => item_id,
    "amount" => amount,
    "weight" => weight,
    "createdAt" => created_at,
});

diffable!(ItemMaster {
    "id" => id,
    "itemType" => item_type,
    "name" => name,
    "description" => description,
    "amountPerSec" => amount_per_sec,
    "maxLevel" => max_level,
    "maxAmountPerSec" => max_amount_per_sec,
    "baseExpPerLevel" => base_exp_per_level,
    "gainedExp" => gained_exp,
    "shorteningMin" => shortening_min,
});

diffable!(LoginBonusRewardMaster {
    "id" => id,
    "loginBonusId" => login_bonus_id,
    "rewardSequence" => reward_sequence,
    "itemType" => item_type,
    "itemId" => item_id,
    "amount" => amount,
});

diffable!(FailResponse {
    "status_code" => status_code,
    "message" => message,
});
