//! Encode/decode capability for the supported file formats
//!
//! Every manager owns exactly one codec, chosen from its [`EncodingFormat`].
//! The codecs are thin pass-throughs to `serde_json`, `serde_yaml` and `toml`;
//! the only extra behavior lives in [`Codec::decode_document`], which turns
//! the top level of a file into a [`Document`] keyed by section name.

mod backends;
mod document;
mod format;

pub use backends::{JsonCodec, TomlCodec, YamlCodec};
pub use document::{Document, Node};
pub use format::EncodingFormat;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Failure reported by a serialization backend
#[derive(Debug, Clone, Error)]
#[error("{format} codec error: {message}")]
pub struct CodecError {
    format: EncodingFormat,
    message: String,
}

impl CodecError {
    pub fn new<S: Into<String>>(format: EncodingFormat, message: S) -> Self {
        Self {
            format,
            message: message.into(),
        }
    }

    pub fn format(&self) -> EncodingFormat {
        self.format
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Two-way conversion between bytes and serde values for one format
pub trait Codec: Send + Sync {
    /// Format handled by this codec
    fn format(&self) -> EncodingFormat;

    /// Decode bytes into a typed value
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;

    /// Encode a value into bytes
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Convert a value into this codec's generic node type
    fn to_node<T: Serialize + ?Sized>(&self, value: &T) -> Result<Node, CodecError>;

    /// Decode a whole file into section-name keyed sub-documents
    fn decode_document(&self, bytes: &[u8]) -> Result<Document, CodecError>;
}

/// Codec selected at runtime from an [`EncodingFormat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCodec {
    Json(JsonCodec),
    Yaml(YamlCodec),
    Toml(TomlCodec),
}

impl FormatCodec {
    pub fn for_format(format: EncodingFormat) -> Self {
        match format {
            EncodingFormat::Json => Self::Json(JsonCodec),
            EncodingFormat::Yaml => Self::Yaml(YamlCodec),
            EncodingFormat::Toml => Self::Toml(TomlCodec),
        }
    }

    /// Build a codec from a format name such as `"yaml"`
    pub fn from_name(name: &str) -> crate::error::Result<Self> {
        Ok(Self::for_format(name.parse()?))
    }
}

impl Codec for FormatCodec {
    fn format(&self) -> EncodingFormat {
        match self {
            Self::Json(codec) => codec.format(),
            Self::Yaml(codec) => codec.format(),
            Self::Toml(codec) => codec.format(),
        }
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        match self {
            Self::Json(codec) => codec.decode(bytes),
            Self::Yaml(codec) => codec.decode(bytes),
            Self::Toml(codec) => codec.decode(bytes),
        }
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Json(codec) => codec.encode(value),
            Self::Yaml(codec) => codec.encode(value),
            Self::Toml(codec) => codec.encode(value),
        }
    }

    fn to_node<T: Serialize + ?Sized>(&self, value: &T) -> Result<Node, CodecError> {
        match self {
            Self::Json(codec) => codec.to_node(value),
            Self::Yaml(codec) => codec.to_node(value),
            Self::Toml(codec) => codec.to_node(value),
        }
    }

    fn decode_document(&self, bytes: &[u8]) -> Result<Document, CodecError> {
        match self {
            Self::Json(codec) => codec.decode_document(bytes),
            Self::Yaml(codec) => codec.decode_document(bytes),
            Self::Toml(codec) => codec.decode_document(bytes),
        }
    }
}
