//! A resolved creation request: what to create and how.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ProvisionError;

use super::config::ResolvedConfiguration;
use super::identity::ResourceIdentity;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct ResolvedRequest {
    pub identity: ResourceIdentity,
    pub configuration: ResolvedConfiguration,
}

impl ResolvedRequest {
    /// Pair an identity with a configuration of the same kind.
    pub fn new(
        identity: ResourceIdentity,
        configuration: ResolvedConfiguration,
    ) -> Result<Self, ProvisionError> {
        ensure_same_kind(&identity, &configuration)?;
        Ok(ResolvedRequest {
            identity,
            configuration,
        })
    }
}

pub(crate) fn ensure_same_kind(
    identity: &ResourceIdentity,
    configuration: &ResolvedConfiguration,
) -> Result<(), ProvisionError> {
    if identity.kind() != configuration.kind() {
        return Err(ProvisionError::configuration(
            "identity",
            identity.to_string(),
            format!(
                "a {} configuration cannot be applied to a {}",
                configuration.kind(),
                identity.kind()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BucketConfig, StorageTier, VolumeConfig};
    use insta::assert_json_snapshot;

    #[test]
    fn test_request_serialization() {
        let request = ResolvedRequest::new(
            ResourceIdentity::bucket("vol1", "bucket1"),
            BucketConfig::default()
                .with_storage_tier(StorageTier::Ssd)
                .into(),
        )
        .unwrap();

        assert_json_snapshot!(request, @r###"
        {
          "identity": {
            "parent": "vol1",
            "name": "bucket1"
          },
          "configuration": {
            "kind": "bucket",
            "storage_tier": "SSD",
            "acls": []
          }
        }
        "###);
    }

    #[test]
    fn test_request_rejects_kind_mismatch() {
        let result = ResolvedRequest::new(
            ResourceIdentity::volume("vol1"),
            BucketConfig::default().into(),
        );
        match result {
            Err(ProvisionError::Configuration { field, value, .. }) => {
                assert_eq!(field, "identity");
                assert_eq!(value, "vol1");
            }
            other => panic!("Expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_request_accepts_matching_kind() {
        assert!(
            ResolvedRequest::new(
                ResourceIdentity::volume("vol1"),
                VolumeConfig::default().into()
            )
            .is_ok()
        );
    }
}
