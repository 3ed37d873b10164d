use std::ops::{Deref, DerefMut};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::client::{Connection, StorageClient};
use crate::error::{ClientError, ProvisionError};
use crate::metrics;
use crate::timers::CallTimer;
use crate::types::{ResolvedConfiguration, ResolvedRequest, ResourceIdentity, ensure_same_kind};

/// Closes the wrapped connection when it goes out of scope.
struct ConnectionGuard<C: Connection> {
    connection: C,
}

impl<C: Connection> Deref for ConnectionGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.connection
    }
}

impl<C: Connection> DerefMut for ConnectionGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.connection
    }
}

impl<C: Connection> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        match self.connection.close() {
            Ok(()) => debug!(event = "Provision", phase = "Released"),
            Err(e) => warn!(event = "Provision", phase = "Released", error = %e),
        }
    }
}

/// Creates one container per call through a storage client.
///
/// Every call opens its own connection and releases it before returning,
/// on success and on failure. Failures are never retried.
///
/// # Example
///
/// ```rust
/// use provision_core::{InMemoryClient, Provisioner, ResourceIdentity, VolumeConfig};
///
/// let provisioner = Provisioner::new(InMemoryClient::new());
/// provisioner
///     .provision(&ResourceIdentity::volume("vol1"), &VolumeConfig::default().into())
///     .unwrap();
/// assert_eq!(provisioner.client().open_connections(), 0);
/// ```
pub struct Provisioner<C: StorageClient> {
    client: C,
}

impl<C: StorageClient> Provisioner<C> {
    /// Wrap `client`. No connection is opened until the first call.
    pub fn new(client: C) -> Self {
        Provisioner { client }
    }

    /// The storage client calls are made through.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Create the container named by `identity` with `configuration`.
    ///
    /// A volume identity must come with a volume configuration and a bucket
    /// identity with a bucket configuration.
    pub fn provision(
        &self,
        identity: &ResourceIdentity,
        configuration: &ResolvedConfiguration,
    ) -> Result<(), ProvisionError> {
        ensure_same_kind(identity, configuration)?;
        let kind = identity.kind();

        debug!(
            event = "Provision",
            phase = "Start",
            kind = kind.as_ref(),
            identity = %identity
        );

        let mut elapsed = Duration::ZERO;
        let result = {
            let _timer = CallTimer::new(&mut elapsed);
            self.create_once(identity, configuration)
        };

        metrics::record_provision(kind, identity.to_string(), elapsed, result.is_ok());

        match result {
            Ok(()) => {
                info!(
                    event = "Provision",
                    phase = "Created",
                    kind = kind.as_ref(),
                    identity = %identity,
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0
                );
                Ok(())
            }
            Err(source) => {
                warn!(
                    event = "Provision",
                    phase = "Failed",
                    kind = kind.as_ref(),
                    identity = %identity,
                    error = %source
                );
                Err(ProvisionError::Provisioning {
                    kind,
                    name: identity.to_string(),
                    source,
                })
            }
        }
    }

    /// Shorthand for [`Provisioner::provision`] on a resolved request.
    pub fn provision_request(&self, request: &ResolvedRequest) -> Result<(), ProvisionError> {
        self.provision(&request.identity, &request.configuration)
    }

    fn create_once(
        &self,
        identity: &ResourceIdentity,
        configuration: &ResolvedConfiguration,
    ) -> Result<(), ClientError> {
        let mut connection = ConnectionGuard {
            connection: self.client.connect()?,
        };

        match configuration {
            ResolvedConfiguration::Volume(config) => {
                connection.create_volume(identity.name(), config)
            }
            ResolvedConfiguration::Bucket(config) => {
                let volume = identity.parent().ok_or_else(|| {
                    ClientError::InvalidName(format!("bucket '{}' has no volume", identity.name()))
                })?;
                connection.create_bucket(volume, identity.name(), config)
            }
        }
    }
}
