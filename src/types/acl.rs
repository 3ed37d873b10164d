//! Access-control entries and the compact grant string parser.
//!
//! A grant string has exactly three colon-separated segments:
//! `principalType:principalName:permissions`, e.g. `user:alice:rw` or
//! `world::r`. `user` and `group` grants need a name; `world` and
//! `anonymous` grants may leave it empty, and any name they carry is kept.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::debug;
use utoipa::ToSchema;

use crate::error::ProvisionError;

use super::permission::{Permission, Permissions};
use super::principal::PrincipalType;

const GRANT_SEGMENTS: usize = 3;

/// One principal and the rights it is granted on a container.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct AccessControlEntry {
    principal_type: PrincipalType,
    principal_name: String,
    permissions: Permissions,
}

impl AccessControlEntry {
    pub fn new<I>(principal_type: PrincipalType, principal_name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = Permission>,
    {
        AccessControlEntry {
            principal_type,
            principal_name: principal_name.into(),
            permissions: Permissions::new(permissions),
        }
    }

    pub fn principal_type(&self) -> PrincipalType {
        self.principal_type
    }

    pub fn principal_name(&self) -> &str {
        &self.principal_name
    }

    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }
}

impl Display for AccessControlEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}:{}:{}",
            self.principal_type, self.principal_name, self.permissions
        )
    }
}

impl FromStr for AccessControlEntry {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split(':').collect();
        if segments.len() != GRANT_SEGMENTS {
            return Err(ProvisionError::grant(
                s,
                format!(
                    "expected {GRANT_SEGMENTS} segments (type:name:permissions), found {}",
                    segments.len()
                ),
            ));
        }
        let (type_part, name, symbols) = (segments[0], segments[1], segments[2]);

        let principal_type = PrincipalType::from_str(type_part).map_err(|_| {
            ProvisionError::grant(
                s,
                format!(
                    "unknown principal type '{type_part}' (expected one of {})",
                    PrincipalType::iter().join(", ")
                ),
            )
        })?;

        if principal_type.requires_name() && name.is_empty() {
            return Err(ProvisionError::grant(
                s,
                format!("{principal_type} grants need a principal name"),
            ));
        }

        let permissions =
            Permissions::from_str(symbols).map_err(|reason| ProvisionError::grant(s, reason))?;

        debug!(
            event = "Grant",
            phase = "Parsed",
            principal_type = principal_type.as_ref(),
            principal_name = name,
            permissions = %permissions
        );

        Ok(AccessControlEntry {
            principal_type,
            principal_name: name.to_string(),
            permissions,
        })
    }
}

/// Parse a single compact grant string into one access-control entry.
///
/// ```rust
/// use provision_core::{parse_grant, Permission, PrincipalType};
///
/// let acl = parse_grant("user:alice:rw").unwrap();
/// assert_eq!(acl.principal_type(), PrincipalType::User);
/// assert_eq!(acl.principal_name(), "alice");
/// assert!(acl.permissions().contains(Permission::Write));
/// ```
pub fn parse_grant(grant: &str) -> Result<AccessControlEntry, ProvisionError> {
    grant.parse()
}
