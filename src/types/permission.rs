//! Permission symbols used in compact grant strings.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use utoipa::ToSchema;

/// A single right a principal may hold on a container.
///
/// Each right has a one-character symbol used in grant strings, e.g. the
/// `rw` in `user:alice:rw`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Permission {
    Read,
    Write,
    Create,
    List,
    Delete,
    ReadAcl,
    WriteAcl,
    All,
    None,
}

impl Permission {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'r' => Some(Self::Read),
            'w' => Some(Self::Write),
            'c' => Some(Self::Create),
            'l' => Some(Self::List),
            'd' => Some(Self::Delete),
            'x' => Some(Self::ReadAcl),
            'y' => Some(Self::WriteAcl),
            'a' => Some(Self::All),
            'n' => Some(Self::None),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
            Self::Create => 'c',
            Self::List => 'l',
            Self::Delete => 'd',
            Self::ReadAcl => 'x',
            Self::WriteAcl => 'y',
            Self::All => 'a',
            Self::None => 'n',
        }
    }
}

/// The set of rights carried by one access-control entry.
#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct Permissions(BTreeSet<Permission>);

impl Permissions {
    pub fn new<I: IntoIterator<Item = Permission>>(permissions: I) -> Self {
        Permissions(permissions.into_iter().collect())
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }
}

/// Renders the canonical symbol string, e.g. `rw`.
impl Display for Permissions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0.iter().map(Permission::symbol).join(""))
    }
}

impl FromStr for Permissions {
    type Err = String;

    /// Repeated symbols collapse into one; unknown symbols are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("no permission symbols given".to_string());
        }

        let mut set = BTreeSet::new();
        for symbol in s.chars() {
            let permission = Permission::from_symbol(symbol).ok_or_else(|| {
                format!("unknown permission symbol '{symbol}' (expected any of rwcldxyan)")
            })?;
            set.insert(permission);
        }
        Ok(Permissions(set))
    }
}
