// src/lib.rs
//! Resolve positional provisioning command lines into typed volume and bucket
//! creation requests, and hand them to a storage client.
//!
//! ```rust
//! use provision_core::{InMemoryClient, Provisioner, ResourceKind, resolve_command_line};
//!
//! let provisioner = Provisioner::new(InMemoryClient::new());
//! let volume = resolve_command_line(ResourceKind::Volume, &["vol1", "50 GB"]).unwrap();
//! provisioner.provision_request(&volume).unwrap();
//!
//! let bucket = resolve_command_line(
//!     ResourceKind::Bucket,
//!     &["vol1", "bucket1", "SSD", "true", "user:bob:r"],
//! )
//! .unwrap();
//! provisioner.provision_request(&bucket).unwrap();
//! ```
pub use classifier::{ClassifiedArgs, classify};
pub use client::{
    Connection, CreateCall, InMemoryClient, InMemoryConnection, LocalConnection,
    LocalStoreClient, StorageClient,
};
pub use error::{ClientError, ProvisionError};
pub use provisioner::Provisioner;
pub use resolver::{resolve, resolve_command_line, resolve_request};
pub use types::*;

mod classifier;
mod client;
mod error;
pub mod metrics;
mod provisioner;
mod resolver;
mod timers;
mod types;
