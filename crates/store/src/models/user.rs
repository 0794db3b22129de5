//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sundry_core::{Email, Role, UserId, Username};

/// An account.
///
/// The password hash deliberately lives outside this type; only the auth
/// paths in the account service ever see it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique.
    pub username: Username,
    /// Email address, unique.
    pub email: Email,
    /// Privilege level.
    pub role: Role,
    /// Spendable balance in whole currency units.
    pub balance: i64,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The logged-in identity carried in the session cookie.
///
/// A snapshot taken at login; role changes take effect on the next login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: Username,
    pub role: Role,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Session storage keys.
pub mod session_keys {
    /// Key under which [`super::CurrentUser`] is stored.
    pub const CURRENT_USER: &str = "current_user";
}
