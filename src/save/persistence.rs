use super::snapshot::SaveSnapshot;
use crate::core::constants::{SAVE_FILE_NAME, SAVE_VERSION_MAGIC};
use crate::core::error::{GameError, Result};
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

const MAGIC_LEN: usize = 8;
const LENGTH_LEN: usize = 4;
const CHECKSUM_LEN: usize = 32;

/// Saves and loads snapshots in a checksummed binary format.
///
/// File format:
/// - Version magic (8 bytes, little endian)
/// - Payload length (4 bytes, little endian)
/// - bincode payload (variable length)
/// - SHA-256 over everything above (32 bytes)
#[derive(Debug, Clone)]
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Uses the platform data directory from the `directories` crate.
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("", "", "hummingbird").ok_or(GameError::NoSaveDirectory)?;
        let data_dir = project_dirs.data_dir();
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            save_path: data_dir.join(SAVE_FILE_NAME),
        })
    }

    pub fn with_path(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
        }
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    pub fn save(&self, snapshot: &SaveSnapshot) -> Result<()> {
        let bytes = encode_snapshot(snapshot)?;
        write_bytes_atomic(&self.save_path, &bytes)?;
        Ok(())
    }

    pub fn load(&self) -> Result<SaveSnapshot> {
        let bytes = fs::read(&self.save_path)?;
        decode_snapshot(&bytes)
    }

    /// [`SaveManager::save`] with file I/O on the tokio runtime.
    pub async fn save_async(&self, snapshot: &SaveSnapshot) -> Result<()> {
        let bytes = encode_snapshot(snapshot)?;
        if let Some(parent) = self.save_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = temp_path_for(&self.save_path);
        tokio::fs::write(&tmp_path, &bytes).await?;
        if let Err(err) = tokio::fs::rename(&tmp_path, &self.save_path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }
        Ok(())
    }

    /// Loads the snapshot; `Ok(None)` when there is no save file yet.
    pub async fn load_async(&self) -> Result<Option<SaveSnapshot>> {
        match tokio::fs::read(&self.save_path).await {
            Ok(bytes) => decode_snapshot(&bytes).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

pub fn encode_snapshot(snapshot: &SaveSnapshot) -> Result<Vec<u8>> {
    let data = bincode::serialize(snapshot)?;
    let data_len = u32::try_from(data.len()).map_err(|_| GameError::Truncated("payload too large"))?;

    let mut bytes = Vec::with_capacity(MAGIC_LEN + LENGTH_LEN + data.len() + CHECKSUM_LEN);
    bytes.extend_from_slice(&SAVE_VERSION_MAGIC.to_le_bytes());
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.extend_from_slice(&data);
    let checksum = Sha256::digest(&bytes);
    bytes.extend_from_slice(&checksum);
    Ok(bytes)
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<SaveSnapshot> {
    let magic_bytes: [u8; MAGIC_LEN] = bytes
        .get(..MAGIC_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or(GameError::Truncated("version magic"))?;
    let found = u64::from_le_bytes(magic_bytes);
    if found != SAVE_VERSION_MAGIC {
        return Err(GameError::InvalidVersion {
            expected: SAVE_VERSION_MAGIC,
            found,
        });
    }

    let length_bytes: [u8; LENGTH_LEN] = bytes
        .get(MAGIC_LEN..MAGIC_LEN + LENGTH_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or(GameError::Truncated("payload length"))?;
    let data_len = u32::from_le_bytes(length_bytes) as usize;

    let data_end = MAGIC_LEN + LENGTH_LEN + data_len;
    let stored_checksum = bytes
        .get(data_end..data_end + CHECKSUM_LEN)
        .ok_or(GameError::Truncated("payload or checksum"))?;
    let file_end = data_end + CHECKSUM_LEN;
    if bytes.len() != file_end {
        return Err(GameError::TrailingBytes(bytes.len() - file_end));
    }

    let computed = Sha256::digest(&bytes[..data_end]);
    if stored_checksum != computed.as_slice() {
        return Err(GameError::ChecksumMismatch);
    }

    Ok(bincode::deserialize(&bytes[MAGIC_LEN + LENGTH_LEN..data_end])?)
}

/// Writes to a sibling temp file and renames it over the target.
fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, bytes)?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(SAVE_FILE_NAME);
    path.with_file_name(format!("{file_name}.tmp"))
}
