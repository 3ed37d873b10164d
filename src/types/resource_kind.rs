//! The two kinds of storage container and their positional argument ladders.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Kind of container being provisioned.
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
pub enum ResourceKind {
    /// Top-level container (e.g. `vol1`)
    Volume,
    /// Container nested in exactly one volume (e.g. `vol1/bucket1`)
    Bucket,
}

/// A positional slot in a command line, after the identity tokens.
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
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Quota,
    Owner,
    StorageTier,
    Versioning,
    Acl,
}

impl ResourceKind {
    /// Names of the identity tokens that lead every command line.
    pub fn identity_roles(&self) -> &'static [&'static str] {
        match self {
            Self::Volume => &["volume"],
            Self::Bucket => &["volume", "bucket"],
        }
    }

    /// Optional roles in the order they must be supplied.
    pub fn optional_roles(&self) -> &'static [Role] {
        match self {
            Self::Volume => &[Role::Quota, Role::Owner, Role::Acl],
            Self::Bucket => &[Role::StorageTier, Role::Versioning, Role::Acl],
        }
    }

    pub fn min_args(&self) -> usize {
        self.identity_roles().len()
    }

    pub fn max_args(&self) -> usize {
        self.min_args() + self.optional_roles().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;
    use yare::parameterized;

    #[parameterized(
        volume = { ResourceKind::Volume, 1, 4 },
        bucket = { ResourceKind::Bucket, 2, 5 },
    )]
    fn test_arity_bounds(kind: ResourceKind, min: usize, max: usize) {
        assert_eq!(kind.min_args(), min);
        assert_eq!(kind.max_args(), max);
    }

    #[test]
    fn test_resource_kind_from_str() {
        assert_eq!(ResourceKind::from_str("volume").unwrap(), ResourceKind::Volume);
        assert_eq!(ResourceKind::from_str("bucket").unwrap(), ResourceKind::Bucket);
        assert!(ResourceKind::from_str("Volume").is_err());
        assert!(ResourceKind::from_str("key").is_err());
    }

    #[test]
    fn test_resource_kind_display() {
        let names: Vec<String> = ResourceKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(names, vec!["volume", "bucket"]);
    }

    #[test]
    fn test_acl_is_always_the_last_rung() {
        for kind in ResourceKind::iter() {
            assert_eq!(kind.optional_roles().last(), Some(&Role::Acl));
        }
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::StorageTier.to_string(), "storage_tier");
        assert_eq!(Role::Acl.as_ref(), "acl");
    }
}
