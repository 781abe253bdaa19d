//! User and role models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Clinic role held by a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Veterinarian,
    Admin,
}

impl Role {
    /// All roles, in the order they are presented to admins.
    pub const ALL: [Role; 3] = [Role::Client, Role::Veterinarian, Role::Admin];

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Veterinarian => "veterinarian",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(Role::Client),
            "veterinarian" => Ok(Role::Veterinarian),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// A registered clinic user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Local UUID
    pub id: String,
    /// Subject identifier issued by the identity provider
    pub external_id: String,
    /// Contact email (unique)
    pub email: String,
    /// Display name
    pub name: String,
    /// Self-declared gender
    pub gender: String,
    /// Current role
    pub role: Role,
    /// Loyalty balance spendable in the shop
    pub vital_coins: i64,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl User {
    /// Create a new client with the given starting balance.
    pub fn new(
        external_id: String,
        email: String,
        name: String,
        gender: String,
        vital_coins: i64,
    ) -> Self {
        let now = super::now_timestamp();
        Self {
            id: super::new_id(),
            external_id,
            email,
            name,
            gender,
            role: Role::Client,
            vital_coins,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Builder-style role override.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_veterinarian(&self) -> bool {
        self.role == Role::Veterinarian
    }

    pub fn is_client(&self) -> bool {
        self.role == Role::Client
    }
}
