//! File-backed variable assets.
//!
//! Layout inside the store directory:
//! ```text
//! <name>.meta.json      - guid, schema version, format, payload hash
//! <name>.var.json       - payload, one of json / yaml / cbor.zst
//! <name>.var.yaml
//! <name>.var.cbor.zst
//! ```

use crate::codec::{CodecError, Format, VariableCodec};
use assetvar_common::AssetGuid;
use assetvar_core::AssetVariable;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Current schema version of the meta file.
const SCHEMA_VERSION: u32 = 1;

const META_SUFFIX: &str = ".meta.json";

/// Errors from file-backed store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
    #[error("variable not found: {0}")]
    NotFound(String),
    #[error("invalid variable name: {0:?}")]
    InvalidName(String),
}

/// Metadata stored next to each payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMeta {
    pub guid: AssetGuid,
    pub schema_version: u32,
    pub format: Format,
    pub sha256: String,
}

/// A directory of variable assets.
pub struct VariableStore {
    root: PathBuf,
}

impl VariableStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Get the path to the store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write the value of `var` under `name`.
    ///
    /// Re-saving an existing asset keeps its guid when the previous meta file
    /// is readable. Payload and meta are staged next to their targets and only
    /// moved into place once both are written; the payload of a previous
    /// format is removed last. A failed save leaves the previous asset intact.
    pub fn save<T: Serialize>(
        &self,
        name: &str,
        var: &AssetVariable<T>,
        format: Format,
    ) -> Result<AssetMeta, StoreError> {
        validate_name(name)?;
        let previous = if self.contains(name) {
            match self.meta(name) {
                Ok(meta) => Some(meta),
                Err(e) => {
                    warn!(name, error = %e, "ignoring unreadable meta, assigning a new guid");
                    None
                }
            }
        } else {
            None
        };

        let payload = format.encode(var)?;
        let meta = AssetMeta {
            guid: previous.as_ref().map(|m| m.guid).unwrap_or_default(),
            schema_version: SCHEMA_VERSION,
            format,
            sha256: sha256_hex(&payload),
        };

        let payload_path = self.payload_path(name, format);
        let meta_path = self.meta_path(name);
        let payload_tmp = staging_path(&payload_path);
        let meta_tmp = staging_path(&meta_path);

        let staged = std::fs::write(&payload_tmp, &payload)
            .map_err(StoreError::from)
            .and_then(|()| {
                let file = std::fs::File::create(&meta_tmp)?;
                serde_json::to_writer_pretty(file, &meta)?;
                Ok(())
            });
        if let Err(e) = staged {
            for tmp in [&payload_tmp, &meta_tmp] {
                let _ = std::fs::remove_file(tmp);
            }
            return Err(e);
        }

        std::fs::rename(&payload_tmp, &payload_path)?;
        std::fs::rename(&meta_tmp, &meta_path)?;

        if let Some(old) = previous.filter(|m| m.format != format) {
            let stale = self.payload_path(name, old.format);
            if let Err(e) = std::fs::remove_file(&stale) {
                warn!(path = %stale.display(), error = %e, "failed to remove stale payload");
            }
        }

        debug!(name, guid = %meta.guid, %format, bytes = payload.len(), "saved variable");
        Ok(meta)
    }

    /// Load a fresh variable with no subscribers.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<AssetVariable<T>, StoreError> {
        let (meta, payload) = self.read_verified(name)?;
        let var = meta.format.decode(&payload)?;
        debug!(name, guid = %meta.guid, "loaded variable");
        Ok(var)
    }

    /// Reload the stored value into a live variable.
    ///
    /// Subscribers stay registered and are notified once, as for any external
    /// edit. On error the variable is left untouched.
    pub fn reload_into<T: DeserializeOwned>(
        &self,
        name: &str,
        var: &mut AssetVariable<T>,
    ) -> Result<(), StoreError> {
        let (meta, payload) = self.read_verified(name)?;
        meta.format.decode_into(&payload, var)?;
        debug!(name, guid = %meta.guid, "reloaded variable");
        Ok(())
    }

    /// Read and validate the meta file of `name`.
    pub fn meta(&self, name: &str) -> Result<AssetMeta, StoreError> {
        validate_name(name)?;
        let path = self.meta_path(name);
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let meta: AssetMeta = serde_json::from_reader(std::fs::File::open(&path)?)?;
        if meta.schema_version != SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                file_version: meta.schema_version,
                expected_version: SCHEMA_VERSION,
            });
        }
        Ok(meta)
    }

    /// Stable guid of `name`.
    pub fn guid(&self, name: &str) -> Result<AssetGuid, StoreError> {
        Ok(self.meta(name)?.guid)
    }

    /// Whether an asset called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.meta_path(name).exists()
    }

    /// Names of all assets, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let file_name = entry?.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = file_name.strip_suffix(META_SUFFIX) {
                if validate_name(name).is_ok() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_verified(&self, name: &str) -> Result<(AssetMeta, Vec<u8>), StoreError> {
        let meta = self.meta(name)?;
        let payload = std::fs::read(self.payload_path(name, meta.format))?;
        let actual = sha256_hex(&payload);
        if actual != meta.sha256 {
            return Err(StoreError::IntegrityMismatch {
                expected: meta.sha256,
                actual,
            });
        }
        Ok((meta, payload))
    }

    fn meta_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}{META_SUFFIX}"))
    }

    fn payload_path(&self, name: &str, format: Format) -> PathBuf {
        self.root.join(format!("{name}.var.{}", format.extension()))
    }
}

/// Names become file stems, so keep them to a portable character set.
fn validate_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
