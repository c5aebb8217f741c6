//! Durable snapshot of the payment vote ledger.
//!
//! Container layout, all integers little-endian:
//!
//! ```text
//! [version: i32][magic message: u64 length + bytes][network magic: 4 bytes]
//! [payload: bincode][checksum: Blake2b-256 of every preceding byte]
//! ```
//!
//! Writes go to a temporary file that is renamed over the old one, so a
//! crash mid-write leaves the previous snapshot in place.

pub mod error;

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use patriot_crypto::blake2b_256;
use patriot_types::NetworkId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

pub use error::{LoadError, StoreError};

/// Container format version.
pub const FORMAT_VERSION: i32 = 1;

/// Identifies the file's content.
pub const MAGIC_MESSAGE: &str = "PatriotnodePayments";

/// Default file name inside the data directory.
pub const DEFAULT_FILE_NAME: &str = "mnpayments.dat";

const CHECKSUM_LEN: usize = 32;

pub struct PaymentsDb {
    path: PathBuf,
    network: NetworkId,
    /// Serialises file I/O. Independent of any ledger lock.
    io: Mutex<()>,
}

impl PaymentsDb {
    pub fn new(path: impl Into<PathBuf>, network: NetworkId) -> Self {
        Self {
            path: path.into(),
            network,
            io: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `state` into the container and replace the file with it.
    pub fn write<T: Serialize>(&self, state: &T) -> Result<(), StoreError> {
        let bytes = encode_container(state, self.network)?;

        let _guard = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "wrote payment votes");
        Ok(())
    }

    /// Read and verify the container, then decode its payload.
    pub fn read<T: DeserializeOwned>(&self) -> Result<T, LoadError> {
        let bytes = {
            let _guard = self.io.lock().unwrap_or_else(PoisonError::into_inner);
            let mut file = fs::File::open(&self.path).map_err(LoadError::FileOpen)?;
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes).map_err(|_| LoadError::HashRead)?;
            bytes
        };
        let state = decode_container(&bytes, self.network)?;
        info!(path = %self.path.display(), "loaded payment votes");
        Ok(state)
    }
}

fn encode_container<T: Serialize>(state: &T, network: NetworkId) -> Result<Vec<u8>, StoreError> {
    let mut bytes = Vec::new();
    bincode::serialize_into(&mut bytes, &FORMAT_VERSION)?;
    bincode::serialize_into(&mut bytes, MAGIC_MESSAGE)?;
    bytes.extend_from_slice(&network.message_start());
    bincode::serialize_into(&mut bytes, state)?;
    let checksum = blake2b_256(&bytes);
    bytes.extend_from_slice(&checksum);
    Ok(bytes)
}

fn decode_container<T: DeserializeOwned>(bytes: &[u8], network: NetworkId) -> Result<T, LoadError> {
    if bytes.len() < CHECKSUM_LEN {
        return Err(LoadError::HashRead);
    }
    let (data, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if blake2b_256(data) != checksum {
        return Err(LoadError::ChecksumMismatch);
    }

    let format = |err: bincode::Error| LoadError::Format(err.to_string());
    let mut cursor = Cursor::new(data);
    let _version: i32 = bincode::deserialize_from(&mut cursor).map_err(format)?;
    let magic: String = bincode::deserialize_from(&mut cursor).map_err(format)?;
    if magic != MAGIC_MESSAGE {
        return Err(LoadError::MagicMessage);
    }

    let mut network_magic = [0u8; 4];
    cursor
        .read_exact(&mut network_magic)
        .map_err(|err| LoadError::Format(err.to_string()))?;
    if network_magic != network.message_start() {
        return Err(LoadError::NetworkMagic);
    }

    bincode::deserialize_from(&mut cursor).map_err(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn state() -> BTreeMap<u32, String> {
        (1..=5).map(|h| (h, format!("payee-{h}"))).collect()
    }

    fn db(dir: &tempfile::TempDir, network: NetworkId) -> PaymentsDb {
        PaymentsDb::new(dir.path().join(DEFAULT_FILE_NAME), network)
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let db = db(&dir, NetworkId::Main);
        db.write(&state()).unwrap();
        let loaded: BTreeMap<u32, String> = db.read().unwrap();
        assert_eq!(loaded, state());
    }

    #[test]
    fn write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh").join("node").join(DEFAULT_FILE_NAME);
        let db = PaymentsDb::new(&path, NetworkId::Main);
        db.write(&state()).unwrap();
        assert!(path.exists());
        assert_eq!(db.read::<BTreeMap<u32, String>>().unwrap(), state());
    }

    #[test]
    fn missing_file_is_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = db(&dir, NetworkId::Main).read::<BTreeMap<u32, String>>().unwrap_err();
        assert_eq!(err.code(), "file-error");
    }

    #[test]
    fn short_file_is_hash_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = db(&dir, NetworkId::Main);
        fs::write(db.path(), [1u8; 10]).unwrap();
        assert!(matches!(db.read::<u32>(), Err(LoadError::HashRead)));
    }

    #[test]
    fn other_network_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        db(&dir, NetworkId::Test).write(&state()).unwrap();
        let err = db(&dir, NetworkId::Main).read::<BTreeMap<u32, String>>().unwrap_err();
        assert!(matches!(err, LoadError::NetworkMagic));
    }

    #[test]
    fn wrong_magic_message_is_rejected() {
        let mut bytes = Vec::new();
        bincode::serialize_into(&mut bytes, &FORMAT_VERSION).unwrap();
        bincode::serialize_into(&mut bytes, "SomethingElse").unwrap();
        bytes.extend_from_slice(&NetworkId::Main.message_start());
        bincode::serialize_into(&mut bytes, &state()).unwrap();
        let checksum = blake2b_256(&bytes);
        bytes.extend_from_slice(&checksum);

        let err = decode_container::<BTreeMap<u32, String>>(&bytes, NetworkId::Main).unwrap_err();
        assert!(matches!(err, LoadError::MagicMessage));
    }

    #[test]
    fn undecodable_payload_is_format_error() {
        let bytes = encode_container(&7u8, NetworkId::Main).unwrap();
        let err = decode_container::<BTreeMap<u32, String>>(&bytes, NetworkId::Main).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn rewrite_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = db(&dir, NetworkId::Regtest);
        db.write(&state()).unwrap();
        let mut newer = state();
        newer.insert(6, "payee-6".to_string());
        db.write(&newer).unwrap();
        assert_eq!(db.read::<BTreeMap<u32, String>>().unwrap(), newer);
        assert!(!db.path().with_extension("tmp").exists());
    }
}
