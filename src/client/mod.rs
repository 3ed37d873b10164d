//! Contracts for the storage service that actually creates containers.
//!
//! A [`StorageClient`] hands out one [`Connection`] per invocation. The
//! connection is closed by the provisioner whether or not creation succeeds.

mod local;
mod memory;

pub use local::{LocalConnection, LocalStoreClient};
pub use memory::{CreateCall, InMemoryClient, InMemoryConnection};

use crate::error::ClientError;
use crate::types::{BucketConfig, VolumeConfig};

pub trait StorageClient {
    type Connection: Connection;

    /// Open a connection to the storage service.
    fn connect(&self) -> Result<Self::Connection, ClientError>;
}

pub trait Connection {
    /// Create a top-level volume. Fails with `AlreadyExists` if `name` is taken.
    fn create_volume(&mut self, name: &str, config: &VolumeConfig) -> Result<(), ClientError>;

    /// Create a bucket inside `volume`. Fails with `NotFound` if the volume
    /// does not exist and `AlreadyExists` if the bucket does.
    fn create_bucket(
        &mut self,
        volume: &str,
        name: &str,
        config: &BucketConfig,
    ) -> Result<(), ClientError>;

    /// Release the connection. Calling it more than once is a no-op.
    fn close(&mut self) -> Result<(), ClientError>;
}
