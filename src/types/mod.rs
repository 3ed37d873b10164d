//! Data model for resolved creation requests.
//!
//! Canonical string forms:
//! - Grant: `user:alice:rw`, `group:admins:a`, `world::r`
//! - Quota: `50 GB` (unit case is ignored on input, `50gb` is accepted)
//! - Storage tier: `RAM_DISK`, `SSD`, `DISK`, `ARCHIVE`, `PROVIDED`, `NVDIMM`
//! - Identity: `vol1` for a volume, `vol1/bucket1` for a bucket
//!
//! Principal types, storage tiers and permission symbols are matched exactly.

mod acl;
mod config;
mod identity;
mod permission;
mod principal;
mod quota;
mod request;
mod resource_kind;
mod storage_tier;

pub use acl::{AccessControlEntry, parse_grant};
pub use config::{BucketConfig, ResolvedConfiguration, VolumeConfig};
pub use identity::ResourceIdentity;
pub use permission::{Permission, Permissions};
pub use principal::{Owner, PrincipalType};
pub use quota::{Quota, QuotaUnit};
pub use request::ResolvedRequest;
pub(crate) use request::ensure_same_kind;
pub use resource_kind::{ResourceKind, Role};
pub use storage_tier::StorageTier;
