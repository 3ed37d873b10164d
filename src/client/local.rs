//! Directory-backed storage service.
//!
//! Layout under the store root:
//! - `<volume>/volume.json`
//! - `<volume>/<bucket>/bucket.json`
//! - `.lock` while a connection is open
//!
//! Metadata files are written to a temporary name and renamed into place.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::types::{BucketConfig, VolumeConfig};

use super::{Connection, StorageClient};

const LOCK_FILE: &str = ".lock";
const VOLUME_FILE: &str = "volume.json";
const BUCKET_FILE: &str = "bucket.json";

#[derive(Debug, Serialize, Deserialize)]
struct Stored<T> {
    name: String,
    created_at: DateTime<Utc>,
    configuration: T,
}

#[derive(Debug, Clone)]
pub struct LocalStoreClient {
    root: PathBuf,
}

impl LocalStoreClient {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStoreClient { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read back a volume's stored configuration.
    pub fn read_volume(&self, name: &str) -> Result<Option<VolumeConfig>, ClientError> {
        validate_name(name)?;
        read_metadata(&self.root.join(name).join(VOLUME_FILE))
    }

    /// Read back a bucket's stored configuration.
    pub fn read_bucket(&self, volume: &str, name: &str) -> Result<Option<BucketConfig>, ClientError> {
        validate_name(volume)?;
        validate_name(name)?;
        read_metadata(&self.root.join(volume).join(name).join(BUCKET_FILE))
    }
}

impl StorageClient for LocalStoreClient {
    type Connection = LocalConnection;

    fn connect(&self) -> Result<Self::Connection, ClientError> {
        fs::create_dir_all(&self.root)?;
        let lock_path = self.root.join(LOCK_FILE);
        match OpenOptions::new().write(true).create_new(true).open(&lock_path) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(ClientError::Unavailable(format!(
                    "store at {} is locked by another invocation",
                    self.root.display()
                )));
            }
            Err(e) => return Err(e.into()),
        }

        debug!(event = "Connect", root = %self.root.display());
        Ok(LocalConnection {
            root: self.root.clone(),
            lock_path,
            open: true,
        })
    }
}

#[derive(Debug)]
pub struct LocalConnection {
    root: PathBuf,
    lock_path: PathBuf,
    open: bool,
}

impl LocalConnection {
    fn ensure_open(&self) -> Result<(), ClientError> {
        if self.open {
            Ok(())
        } else {
            Err(ClientError::Unavailable("connection is closed".to_string()))
        }
    }
}

impl Connection for LocalConnection {
    fn create_volume(&mut self, name: &str, config: &VolumeConfig) -> Result<(), ClientError> {
        self.ensure_open()?;
        validate_name(name)?;

        let dir = self.root.join(name);
        create_with_metadata(&dir, || format!("volume '{name}'"), |dir| {
            write_metadata(&dir.join(VOLUME_FILE), name, config)
        })
    }

    fn create_bucket(
        &mut self,
        volume: &str,
        name: &str,
        config: &BucketConfig,
    ) -> Result<(), ClientError> {
        self.ensure_open()?;
        validate_name(volume)?;
        validate_name(name)?;

        let volume_dir = self.root.join(volume);
        if !volume_dir.join(VOLUME_FILE).is_file() {
            return Err(ClientError::NotFound(format!("volume '{volume}'")));
        }

        let dir = volume_dir.join(name);
        create_with_metadata(&dir, || format!("bucket '{volume}/{name}'"), |dir| {
            write_metadata(&dir.join(BUCKET_FILE), name, config)
        })
    }

    fn close(&mut self) -> Result<(), ClientError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        match fs::remove_file(&self.lock_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Names become directory names, so they must be a single path component
/// that cannot collide with a metadata file.
fn validate_name(name: &str) -> Result<(), ClientError> {
    if name.is_empty() || name.starts_with('.') {
        return Err(ClientError::InvalidName(format!("'{name}'")));
    }
    if name == VOLUME_FILE || name == BUCKET_FILE {
        return Err(ClientError::InvalidName(format!(
            "'{name}' is reserved for metadata"
        )));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(ClientError::InvalidName(format!(
            "'{name}' must not contain path separators"
        )));
    }
    Ok(())
}

fn create_exclusive_dir(dir: &Path, describe: impl FnOnce() -> String) -> Result<(), ClientError> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(ClientError::AlreadyExists(describe()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Create `dir` exclusively and fill it with `write`. The directory is
/// removed again if `write` fails, so a failed creation can be retried.
fn create_with_metadata<F>(
    dir: &Path,
    describe: impl FnOnce() -> String,
    write: F,
) -> Result<(), ClientError>
where
    F: FnOnce(&Path) -> Result<(), ClientError>,
{
    create_exclusive_dir(dir, describe)?;
    if let Err(e) = write(dir) {
        if let Err(cleanup) = fs::remove_dir_all(dir) {
            warn!(
                event = "Create",
                phase = "Cleanup",
                dir = %dir.display(),
                error = %cleanup
            );
        }
        return Err(e);
    }
    Ok(())
}

fn write_metadata<T: Serialize>(path: &Path, name: &str, configuration: &T) -> Result<(), ClientError> {
    let stored = Stored {
        name: name.to_string(),
        created_at: Utc::now(),
        configuration,
    };

    let tmp = path.with_extension("json.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut writer, &stored)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_metadata<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ClientError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let stored: Stored<T> = serde_json::from_reader(BufReader::new(file))?;
    Ok(Some(stored.configuration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Owner, Quota, QuotaUnit, StorageTier};
    use std::str::FromStr;
    use yare::parameterized;

    fn store() -> (tempfile::TempDir, LocalStoreClient) {
        let dir = tempfile::tempdir().unwrap();
        let client = LocalStoreClient::new(dir.path().join("store"));
        (dir, client)
    }

    #[test]
    fn test_volume_round_trips_through_disk() {
        let (_dir, client) = store();
        let config = VolumeConfig::default()
            .with_quota(Quota::new(50, QuotaUnit::Gb))
            .with_owner(Owner::from_str("dr.strange").unwrap());

        let mut conn = client.connect().unwrap();
        conn.create_volume("vol1", &config).unwrap();
        conn.close().unwrap();

        assert_eq!(client.read_volume("vol1").unwrap(), Some(config));
        assert_eq!(client.read_volume("vol2").unwrap(), None);
    }

    #[test]
    fn test_bucket_round_trips_through_disk() {
        let (_dir, client) = store();
        let config = BucketConfig::default()
            .with_storage_tier(StorageTier::Ssd)
            .with_versioning(true);

        let mut conn = client.connect().unwrap();
        conn.create_volume("vol1", &VolumeConfig::default()).unwrap();
        conn.create_bucket("vol1", "b1", &config).unwrap();
        conn.close().unwrap();

        assert_eq!(client.read_bucket("vol1", "b1").unwrap(), Some(config));
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let (_dir, client) = store();
        let mut conn = client.connect().unwrap();
        conn.create_volume("vol1", &VolumeConfig::default()).unwrap();
        assert_eq!(
            conn.create_volume("vol1", &VolumeConfig::default()),
            Err(ClientError::AlreadyExists("volume 'vol1'".to_string()))
        );

        conn.create_bucket("vol1", "b1", &BucketConfig::default()).unwrap();
        assert_eq!(
            conn.create_bucket("vol1", "b1", &BucketConfig::default()),
            Err(ClientError::AlreadyExists("bucket 'vol1/b1'".to_string()))
        );
        conn.close().unwrap();
    }

    #[test]
    fn test_bucket_in_missing_volume() {
        let (_dir, client) = store();
        let mut conn = client.connect().unwrap();
        assert_eq!(
            conn.create_bucket("nope", "b1", &BucketConfig::default()),
            Err(ClientError::NotFound("volume 'nope'".to_string()))
        );
        conn.close().unwrap();
    }

    #[test]
    fn test_lock_is_exclusive_and_released() {
        let (_dir, client) = store();
        let mut first = client.connect().unwrap();
        assert!(client.root().join(LOCK_FILE).exists());
        assert!(matches!(client.connect(), Err(ClientError::Unavailable(_))));

        first.close().unwrap();
        assert!(!client.root().join(LOCK_FILE).exists());

        let mut second = client.connect().unwrap();
        second.close().unwrap();
    }

    #[parameterized(
        empty = { "" },
        dot = { "." },
        parent = { ".." },
        hidden = { ".lock" },
        volume_metadata = { "volume.json" },
        bucket_metadata = { "bucket.json" },
        nested = { "a/b" },
        backslash = { "a\\b" },
    )]
    fn test_invalid_names(name: &str) {
        let (_dir, client) = store();
        let mut conn = client.connect().unwrap();
        assert!(matches!(
            conn.create_volume(name, &VolumeConfig::default()),
            Err(ClientError::InvalidName(_))
        ));
        conn.close().unwrap();
    }

    #[test]
    fn test_metadata_names_are_rejected_for_buckets() {
        let (_dir, client) = store();
        let mut conn = client.connect().unwrap();
        conn.create_volume("vol1", &VolumeConfig::default()).unwrap();
        assert!(matches!(
            conn.create_bucket("vol1", VOLUME_FILE, &BucketConfig::default()),
            Err(ClientError::InvalidName(_))
        ));
        conn.close().unwrap();
        assert_eq!(client.read_volume("vol1").unwrap(), Some(VolumeConfig::default()));
    }

    #[test]
    fn test_failed_write_removes_directory() {
        let (dir, _client) = store();
        let target = dir.path().join("vol1");

        let result = create_with_metadata(&target, || "volume 'vol1'".to_string(), |d| {
            fs::write(d.join("partial"), b"{")?;
            Err(ClientError::Io("disk full".to_string()))
        });
        assert_eq!(result, Err(ClientError::Io("disk full".to_string())));
        assert!(!target.exists());

        create_with_metadata(&target, || "volume 'vol1'".to_string(), |_| Ok(())).unwrap();
        assert!(target.is_dir());
    }
}
