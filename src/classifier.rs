//! Maps a flat positional command line onto named roles.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::ProvisionError;
use crate::types::{ResourceIdentity, ResourceKind, Role};

/// Tokens sorted into identity and optional roles. Values are still raw text;
/// validation happens in the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedArgs {
    identity: ResourceIdentity,
    values: BTreeMap<Role, String>,
}

impl ClassifiedArgs {
    pub fn kind(&self) -> ResourceKind {
        self.identity.kind()
    }

    pub fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }

    /// Raw token for `role`, if it was supplied.
    pub fn get(&self, role: Role) -> Option<&str> {
        self.values.get(&role).map(String::as_str)
    }

    /// Number of optional roles that were supplied.
    pub fn populated(&self) -> usize {
        self.values.len()
    }
}

/// Classify `tokens` for `kind`.
///
/// The first tokens name the resource (`volume`, or `volume bucket`); each
/// following token fills the next rung of the kind's optional ladder.
pub fn classify<S: AsRef<str>>(
    kind: ResourceKind,
    tokens: &[S],
) -> Result<ClassifiedArgs, ProvisionError> {
    let (min, max) = (kind.min_args(), kind.max_args());
    if tokens.len() < min || tokens.len() > max {
        return Err(ProvisionError::Arity {
            kind,
            min,
            max,
            got: tokens.len(),
        });
    }

    let (identity_tokens, optional_tokens) = tokens.split_at(min);
    let identity = match kind {
        ResourceKind::Volume => ResourceIdentity::volume(identity_tokens[0].as_ref()),
        ResourceKind::Bucket => {
            ResourceIdentity::bucket(identity_tokens[0].as_ref(), identity_tokens[1].as_ref())
        }
    };

    let values: BTreeMap<Role, String> = kind
        .optional_roles()
        .iter()
        .zip(optional_tokens)
        .map(|(role, token)| (*role, token.as_ref().to_string()))
        .collect();

    debug!(
        event = "Classify",
        kind = kind.as_ref(),
        identity = %identity,
        optional = values.len()
    );

    Ok(ClassifiedArgs { identity, values })
}
