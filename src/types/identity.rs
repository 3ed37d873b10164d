//! Identity of the container a resolved configuration applies to.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::resource_kind::ResourceKind;

/// Which external resource to create (e.g. `vol1` or `vol1/bucket1`).
///
/// `parent` is set only for buckets. The kind is derived from it, so an
/// identity can never disagree with itself about what it names.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct ResourceIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    name: String,
}

impl ResourceIdentity {
    /// Identity of a top-level volume.
    pub fn volume(name: impl Into<String>) -> Self {
        ResourceIdentity {
            parent: None,
            name: name.into(),
        }
    }

    /// Identity of a bucket inside `volume`.
    pub fn bucket(volume: impl Into<String>, name: impl Into<String>) -> Self {
        ResourceIdentity {
            parent: Some(volume.into()),
            name: name.into(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self.parent {
            Some(_) => ResourceKind::Bucket,
            None => ResourceKind::Volume,
        }
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for ResourceIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.parent {
            Some(parent) => write!(f, "{parent}/{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;

    #[test]
    fn test_volume_identity() {
        let id = ResourceIdentity::volume("vol1");
        assert_eq!(id.kind(), ResourceKind::Volume);
        assert_eq!(id.parent(), None);
        assert_eq!(id.to_string(), "vol1");
    }

    #[test]
    fn test_bucket_identity() {
        let id = ResourceIdentity::bucket("vol1", "bucket1");
        assert_eq!(id.kind(), ResourceKind::Bucket);
        assert_eq!(id.parent(), Some("vol1"));
        assert_eq!(id.name(), "bucket1");
        assert_eq!(id.to_string(), "vol1/bucket1");
    }

    #[test]
    fn test_volume_identity_omits_parent() {
        assert_json_snapshot!(ResourceIdentity::volume("vol1"), @r###"
        {
          "name": "vol1"
        }
        "###);
    }

    #[test]
    fn test_identity_serialization() {
        let id = ResourceIdentity::bucket("vol1", "bucket1");
        let serialized = serde_json::to_value(&id).unwrap();
        let deserialized: ResourceIdentity = serde_json::from_value(serialized).unwrap();
        assert_eq!(id, deserialized);
    }
}
