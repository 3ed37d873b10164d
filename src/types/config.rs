//! Fully-resolved creation settings for volumes and buckets.
//!
//! Every optional field is independently settable. A field that was never set
//! stays `None` and is left for the storage service to default.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::acl::AccessControlEntry;
use super::principal::Owner;
use super::quota::Quota;
use super::resource_kind::ResourceKind;
use super::storage_tier::StorageTier;

/// Settings applied when a volume is created.
#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct VolumeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<Quota>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub acls: Vec<AccessControlEntry>,
}

impl VolumeConfig {
    pub fn with_quota(mut self, quota: Quota) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Append an entry; entries keep the order they were added in.
    pub fn with_acl(mut self, acl: AccessControlEntry) -> Self {
        self.acls.push(acl);
        self
    }
}

/// Settings applied when a bucket is created.
#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct BucketConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_tier: Option<StorageTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioning: Option<bool>,
    #[serde(default)]
    pub acls: Vec<AccessControlEntry>,
}

impl BucketConfig {
    pub fn with_storage_tier(mut self, tier: StorageTier) -> Self {
        self.storage_tier = Some(tier);
        self
    }

    pub fn with_versioning(mut self, enabled: bool) -> Self {
        self.versioning = Some(enabled);
        self
    }

    pub fn with_acl(mut self, acl: AccessControlEntry) -> Self {
        self.acls.push(acl);
        self
    }
}

/// The configuration produced by the resolver, tagged by container kind.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResolvedConfiguration {
    Volume(VolumeConfig),
    Bucket(BucketConfig),
}

impl ResolvedConfiguration {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Volume(_) => ResourceKind::Volume,
            Self::Bucket(_) => ResourceKind::Bucket,
        }
    }

    pub fn acls(&self) -> &[AccessControlEntry] {
        match self {
            Self::Volume(config) => &config.acls,
            Self::Bucket(config) => &config.acls,
        }
    }
}

impl From<VolumeConfig> for ResolvedConfiguration {
    fn from(config: VolumeConfig) -> Self {
        Self::Volume(config)
    }
}

impl From<BucketConfig> for ResolvedConfiguration {
    fn from(config: BucketConfig) -> Self {
        Self::Bucket(config)
    }
}
