//! Principals that can own a volume or appear in a grant.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// The kind of principal a grant applies to.
///
/// Parsing is exact and case-sensitive: `user` is accepted, `User` is not.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PrincipalType {
    User,
    Group,
    /// Every authenticated principal. The name is optional and kept as given,
    /// conventionally empty (`world::r`).
    World,
    /// Unauthenticated callers. The name is optional and kept as given.
    Anonymous,
}

impl PrincipalType {
    /// Whether a grant of this type must carry a principal name.
    pub fn requires_name(&self) -> bool {
        matches!(self, Self::User | Self::Group)
    }
}

/// The user that owns a volume (e.g. `dr.strange`).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Owner(String);

impl Owner {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Owner {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Owner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("owner must not be empty".to_string());
        }
        if s.chars().any(char::is_whitespace) {
            return Err("owner must not contain whitespace".to_string());
        }
        if s.contains(':') {
            return Err("owner must not contain ':'".to_string());
        }
        Ok(Owner(s.to_string()))
    }
}
