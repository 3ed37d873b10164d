//! Turns classified tokens into a fully-resolved configuration.
//!
//! Each kind walks its ladder in a fixed order. A supplied token is parsed
//! into its target type or rejected; an omitted token leaves the field unset.

use std::str::FromStr;

use tracing::debug;

use crate::classifier::{ClassifiedArgs, classify};
use crate::error::ProvisionError;
use crate::types::{
    BucketConfig, Owner, Quota, ResolvedConfiguration, ResolvedRequest, ResourceKind, Role,
    StorageTier, VolumeConfig, parse_grant,
};

/// Resolve classified arguments into the configuration for their kind.
pub fn resolve(args: &ClassifiedArgs) -> Result<ResolvedConfiguration, ProvisionError> {
    let configuration = match args.kind() {
        ResourceKind::Volume => ResolvedConfiguration::Volume(resolve_volume(args)?),
        ResourceKind::Bucket => ResolvedConfiguration::Bucket(resolve_bucket(args)?),
    };

    debug!(
        event = "Resolve",
        phase = "Resolved",
        identity = %args.identity(),
        acls = configuration.acls().len()
    );

    Ok(configuration)
}

/// Resolve and pair the result with the classified identity.
pub fn resolve_request(args: &ClassifiedArgs) -> Result<ResolvedRequest, ProvisionError> {
    ResolvedRequest::new(args.identity().clone(), resolve(args)?)
}

/// Classify and resolve a positional command line in one step.
///
/// ```rust
/// use provision_core::{ResourceKind, resolve_command_line};
///
/// let request = resolve_command_line(ResourceKind::Bucket, &["vol1", "b1", "SSD"]).unwrap();
/// assert_eq!(request.identity.to_string(), "vol1/b1");
/// ```
pub fn resolve_command_line<S: AsRef<str>>(
    kind: ResourceKind,
    tokens: &[S],
) -> Result<ResolvedRequest, ProvisionError> {
    resolve_request(&classify(kind, tokens)?)
}

fn resolve_volume(args: &ClassifiedArgs) -> Result<VolumeConfig, ProvisionError> {
    let mut config = VolumeConfig::default();

    if let Some(raw) = args.get(Role::Quota) {
        config = config.with_quota(parse_field::<Quota>(Role::Quota, raw)?);
    }
    if let Some(raw) = args.get(Role::Owner) {
        config = config.with_owner(parse_field::<Owner>(Role::Owner, raw)?);
    }
    if let Some(raw) = args.get(Role::Acl) {
        config = config.with_acl(parse_grant(raw)?);
    }

    Ok(config)
}

fn resolve_bucket(args: &ClassifiedArgs) -> Result<BucketConfig, ProvisionError> {
    let mut config = BucketConfig::default();

    if let Some(raw) = args.get(Role::StorageTier) {
        let tier = StorageTier::from_str(raw).map_err(|_| {
            ProvisionError::configuration(
                Role::StorageTier,
                raw,
                "unknown storage tier (expected RAM_DISK, SSD, DISK, ARCHIVE, PROVIDED or NVDIMM)",
            )
        })?;
        config = config.with_storage_tier(tier);
    }
    if let Some(raw) = args.get(Role::Versioning) {
        config = config.with_versioning(parse_flag(Role::Versioning, raw)?);
    }
    if let Some(raw) = args.get(Role::Acl) {
        config = config.with_acl(parse_grant(raw)?);
    }

    Ok(config)
}

/// Exact, case-sensitive boolean: only `true` and `false` are accepted.
fn parse_flag(role: Role, raw: &str) -> Result<bool, ProvisionError> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ProvisionError::configuration(
            role,
            raw,
            "expected 'true' or 'false'",
        )),
    }
}

fn parse_field<T>(role: Role, raw: &str) -> Result<T, ProvisionError>
where
    T: FromStr<Err = String>,
{
    raw.parse::<T>()
        .map_err(|reason| ProvisionError::configuration(role, raw, reason))
}
