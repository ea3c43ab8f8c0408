use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Macros;
use crate::constants::PERSONAL_FAMILY_ID;

/// Whether data is scoped to one user or shared across a family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountKind {
    Personal,
    Family { family_id: String },
}

/// Who a fetch or write is performed for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub account: AccountKind,
}

impl Identity {
    pub fn personal(user_id: Uuid) -> Self {
        Self {
            user_id,
            account: AccountKind::Personal,
        }
    }

    pub fn family(user_id: Uuid, family_id: impl Into<String>) -> Self {
        Self {
            user_id,
            account: AccountKind::Family {
                family_id: family_id.into(),
            },
        }
    }

    pub fn is_family(&self) -> bool {
        matches!(self.account, AccountKind::Family { .. })
    }

    /// Family ID as sent on the wire; personal accounts send `"0"`.
    pub fn family_id(&self) -> &str {
        match &self.account {
            AccountKind::Personal => PERSONAL_FAMILY_ID,
            AccountKind::Family { family_id } => family_id,
        }
    }

    /// Account type flag as sent on the wire: 0 personal, 1 family.
    pub fn account_type_flag(&self) -> u8 {
        u8::from(self.is_family())
    }
}

/// The signed-in user's profile: identity plus daily targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub identity: Identity,
    pub targets: Macros,
}

impl UserProfile {
    pub fn new(identity: Identity, targets: Macros) -> Self {
        Self { identity, targets }
    }
}
