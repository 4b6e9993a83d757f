//! Serialize/deserialize hooks for asset variables.
//!
//! A codec turns a variable's persisted state (its value) into bytes and back.
//! The core crate only implements serde; picking a concrete format happens
//! here.

use assetvar_core::AssetVariable;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::str::FromStr;

/// Errors from encoding or decoding a variable.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("CBOR serialization error: {0}")]
    CborEncode(String),
    #[error("CBOR deserialization error: {0}")]
    CborDecode(String),
    #[error("unknown format: {0}")]
    UnknownFormat(String),
}

/// A pluggable persistence format for asset variables.
pub trait VariableCodec {
    /// Encode the persisted state of `var`.
    fn encode<T: Serialize>(&self, var: &AssetVariable<T>) -> Result<Vec<u8>, CodecError>;

    /// Decode a fresh variable with no subscribers.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<AssetVariable<T>, CodecError>;

    /// Decode into an existing variable, keeping its subscribers.
    ///
    /// This is an external edit: the value is overwritten without going
    /// through the setter, then subscribers are notified once. On error the
    /// variable is left untouched and nobody is notified.
    fn decode_into<T: DeserializeOwned>(
        &self,
        bytes: &[u8],
        var: &mut AssetVariable<T>,
    ) -> Result<(), CodecError> {
        let fresh: AssetVariable<T> = self.decode(bytes)?;
        *var.value_mut() = fresh.into_inner();
        var.on_external_edit();
        Ok(())
    }
}

/// Pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl VariableCodec for JsonCodec {
    fn encode<T: Serialize>(&self, var: &AssetVariable<T>) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec_pretty(var)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<AssetVariable<T>, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// YAML, the usual text format for engine assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl VariableCodec for YamlCodec {
    fn encode<T: Serialize>(&self, var: &AssetVariable<T>) -> Result<Vec<u8>, CodecError> {
        Ok(serde_yaml::to_string(var)?.into_bytes())
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<AssetVariable<T>, CodecError> {
        Ok(serde_yaml::from_slice(bytes)?)
    }
}

/// CBOR, zstd-compressed.
#[derive(Debug, Clone, Copy)]
pub struct CborCodec {
    /// zstd compression level.
    pub level: i32,
}

impl Default for CborCodec {
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl VariableCodec for CborCodec {
    fn encode<T: Serialize>(&self, var: &AssetVariable<T>) -> Result<Vec<u8>, CodecError> {
        let mut cbor = Vec::new();
        ciborium::into_writer(var, &mut cbor)
            .map_err(|e| CodecError::CborEncode(e.to_string()))?;
        let mut encoder = zstd::Encoder::new(Vec::new(), self.level)?;
        encoder.write_all(&cbor)?;
        Ok(encoder.finish()?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<AssetVariable<T>, CodecError> {
        let mut decoder = zstd::Decoder::new(bytes)?;
        let mut cbor = Vec::new();
        decoder.read_to_end(&mut cbor)?;
        ciborium::from_reader(cbor.as_slice()).map_err(|e| CodecError::CborDecode(e.to_string()))
    }
}

/// The formats a [`crate::VariableStore`] can write, recorded in each asset's
/// meta file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
    Cbor,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Yaml, Format::Cbor];

    /// File extension of the payload file.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Cbor => "cbor.zst",
        }
    }
}

impl VariableCodec for Format {
    fn encode<T: Serialize>(&self, var: &AssetVariable<T>) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Json => JsonCodec.encode(var),
            Self::Yaml => YamlCodec.encode(var),
            Self::Cbor => CborCodec::default().encode(var),
        }
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<AssetVariable<T>, CodecError> {
        match self {
            Self::Json => JsonCodec.decode(bytes),
            Self::Yaml => YamlCodec.decode(bytes),
            Self::Cbor => CborCodec::default().decode(bytes),
        }
    }
}

impl FromStr for Format {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "cbor" => Ok(Self::Cbor),
            _ => Err(CodecError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Cbor => "cbor",
        };
        f.write_str(name)
    }
}
