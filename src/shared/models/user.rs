/**
 * User Types
 *
 * Roles, the public profile returned by the user endpoints, and the compact
 * summary embedded wherever a record references its owner.
 */
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Avatar assigned to users who never upload one
pub const DEFAULT_AVATAR: &str =
    "https://ui-avatars.com/api/?name=User&background=2563eb&color=fff";

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Student,
    Faculty,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Faculty => "Faculty",
            Role::Admin => "Admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Error message when a user of this role registers without a bio
    pub fn missing_bio_message(&self) -> Option<&'static str> {
        match self {
            Role::Student => Some("Bio is required for Students"),
            Role::Faculty => Some("Faculty must add bio/qualification"),
            Role::Admin => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Student" => Ok(Role::Student),
            "Faculty" => Ok(Role::Faculty),
            "Admin" => Ok(Role::Admin),
            _ => Err(SharedError::validation("role", "Invalid role selected")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Full profile of a user, as returned to that user or to an admin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub bio: Option<String>,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub department: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            fullname: self.fullname.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// The owner shape embedded in posts, comments, events, polls and resources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub fullname: String,
    pub avatar: String,
}

impl UserSummary {
    /// Stand-in for a reference whose user no longer exists
    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            username: "unknown".to_string(),
            fullname: "Unknown user".to_string(),
            avatar: DEFAULT_AVATAR.to_string(),
        }
    }
}
