use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Role assignments for a LoanDesk account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Technician,
    Borrower,
}

impl UserRole {
    /// Return the canonical string representation used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Technician => "technician",
            Self::Borrower => "borrower",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "technician" => Ok(Self::Technician),
            "borrower" => Ok(Self::Borrower),
            _ => Err("unknown user role"),
        }
    }
}

/// Immutable snapshot of another user, as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    /// Unique identifier for the user.
    pub id: Uuid,

    /// The user's username.
    pub username: String,

    /// Optional display name.
    pub full_name: Option<String>,

    /// Optional email address.
    pub email: Option<String>,

    /// The user's role.
    pub role: UserRole,
}

impl UserSummary {
    /// The name to show for this user: full name when present, username otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}
