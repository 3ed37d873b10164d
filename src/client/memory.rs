use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ClientError;
use crate::types::{BucketConfig, ResolvedConfiguration, ResourceIdentity, VolumeConfig};

use super::{Connection, StorageClient};

/// A creation call as seen by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCall {
    pub identity: ResourceIdentity,
    pub configuration: ResolvedConfiguration,
}

#[derive(Debug, Default)]
struct VolumeRecord {
    config: VolumeConfig,
    buckets: BTreeMap<String, BucketConfig>,
}

#[derive(Debug, Default)]
struct MemoryState {
    volumes: BTreeMap<String, VolumeRecord>,
    calls: Vec<CreateCall>,
    connects: usize,
    open_connections: usize,
}

/// In-process storage service. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClient {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration a volume was created with, if it exists.
    pub fn volume(&self, name: &str) -> Option<VolumeConfig> {
        let state = self.state.lock().ok()?;
        state.volumes.get(name).map(|v| v.config.clone())
    }

    /// Configuration a bucket was created with, if it exists.
    pub fn bucket(&self, volume: &str, name: &str) -> Option<BucketConfig> {
        let state = self.state.lock().ok()?;
        state.volumes.get(volume)?.buckets.get(name).cloned()
    }

    /// Every creation call received, including ones that failed.
    pub fn calls(&self) -> Vec<CreateCall> {
        self.state
            .lock()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    /// Number of connections ever opened.
    pub fn connects(&self) -> usize {
        self.state.lock().map(|s| s.connects).unwrap_or_default()
    }

    /// Connections opened and not yet closed.
    pub fn open_connections(&self) -> usize {
        self.state
            .lock()
            .map(|s| s.open_connections)
            .unwrap_or_default()
    }
}

fn lock(state: &Mutex<MemoryState>) -> Result<MutexGuard<'_, MemoryState>, ClientError> {
    state
        .lock()
        .map_err(|e| ClientError::Unavailable(format!("in-memory store poisoned: {e}")))
}

impl StorageClient for InMemoryClient {
    type Connection = InMemoryConnection;

    fn connect(&self) -> Result<Self::Connection, ClientError> {
        let mut state = lock(&self.state)?;
        state.connects += 1;
        state.open_connections += 1;
        Ok(InMemoryConnection {
            state: Arc::clone(&self.state),
            open: true,
        })
    }
}

/// A connection to an [`InMemoryClient`]. Refuses work once closed.
#[derive(Debug)]
pub struct InMemoryConnection {
    state: Arc<Mutex<MemoryState>>,
    open: bool,
}

impl InMemoryConnection {
    fn ensure_open(&self) -> Result<(), ClientError> {
        if self.open {
            Ok(())
        } else {
            Err(ClientError::Unavailable("connection is closed".to_string()))
        }
    }
}

impl Connection for InMemoryConnection {
    fn create_volume(&mut self, name: &str, config: &VolumeConfig) -> Result<(), ClientError> {
        self.ensure_open()?;
        let mut state = lock(&self.state)?;
        state.calls.push(CreateCall {
            identity: ResourceIdentity::volume(name),
            configuration: config.clone().into(),
        });

        if state.volumes.contains_key(name) {
            return Err(ClientError::AlreadyExists(format!("volume '{name}'")));
        }
        state.volumes.insert(
            name.to_string(),
            VolumeRecord {
                config: config.clone(),
                buckets: BTreeMap::new(),
            },
        );
        Ok(())
    }

    fn create_bucket(
        &mut self,
        volume: &str,
        name: &str,
        config: &BucketConfig,
    ) -> Result<(), ClientError> {
        self.ensure_open()?;
        let mut state = lock(&self.state)?;
        state.calls.push(CreateCall {
            identity: ResourceIdentity::bucket(volume, name),
            configuration: config.clone().into(),
        });

        let record = state
            .volumes
            .get_mut(volume)
            .ok_or_else(|| ClientError::NotFound(format!("volume '{volume}'")))?;
        if record.buckets.contains_key(name) {
            return Err(ClientError::AlreadyExists(format!("bucket '{volume}/{name}'")));
        }
        record.buckets.insert(name.to_string(), config.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), ClientError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        let mut state = lock(&self.state)?;
        state.open_connections -= 1;
        Ok(())
    }
}
