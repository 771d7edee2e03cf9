//! JSON, YAML and TOML codec implementations

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::document::{Document, Node};
use super::format::EncodingFormat;
use super::{Codec, CodecError};

fn codec_error<E: std::fmt::Display>(format: EncodingFormat) -> impl Fn(E) -> CodecError {
    move |e| CodecError::new(format, e.to_string())
}

/// JSON codec, writes pretty-printed output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn format(&self) -> EncodingFormat {
        EncodingFormat::Json
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(codec_error(self.format()))
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec_pretty(value).map_err(codec_error(self.format()))
    }

    fn to_node<T: Serialize + ?Sized>(&self, value: &T) -> Result<Node, CodecError> {
        serde_json::to_value(value)
            .map(Node::Json)
            .map_err(codec_error(self.format()))
    }

    fn decode_document(&self, bytes: &[u8]) -> Result<Document, CodecError> {
        let map = match self.decode::<serde_json::Value>(bytes)? {
            serde_json::Value::Null => return Ok(Document::new()),
            serde_json::Value::Object(map) => map,
            other => {
                return Err(CodecError::new(
                    self.format(),
                    format!("expected an object at the top level, found {}", json_kind(&other)),
                ))
            }
        };

        Ok(map
            .into_iter()
            .map(|(name, value)| (name, Node::Json(value)))
            .collect())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// YAML codec
///
/// YAML mappings may use non-string keys. Only the top level is keyed by
/// section name, so number and bool keys there are rendered to their string
/// form; any other key type can never name a section and is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn format(&self) -> EncodingFormat {
        EncodingFormat::Yaml
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_yaml::from_slice(bytes).map_err(codec_error(self.format()))
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_yaml::to_string(value)
            .map(String::into_bytes)
            .map_err(codec_error(self.format()))
    }

    fn to_node<T: Serialize + ?Sized>(&self, value: &T) -> Result<Node, CodecError> {
        serde_yaml::to_value(value)
            .map(Node::Yaml)
            .map_err(codec_error(self.format()))
    }

    fn decode_document(&self, bytes: &[u8]) -> Result<Document, CodecError> {
        let mapping = match self.decode::<serde_yaml::Value>(bytes)? {
            serde_yaml::Value::Null => return Ok(Document::new()),
            serde_yaml::Value::Mapping(mapping) => mapping,
            other => {
                return Err(CodecError::new(
                    self.format(),
                    format!(
                        "expected a mapping at the top level, found {}",
                        yaml_kind(&other)
                    ),
                ))
            }
        };

        let mut document = Document::new();
        for (key, value) in mapping {
            let Some(name) = yaml_key_name(&key) else {
                debug!("Ignoring top-level YAML key of type {}", yaml_kind(&key));
                continue;
            };

            if document.contains_key(&name) {
                warn!("Top-level YAML key '{}' appears more than once, keeping the first", name);
                continue;
            }
            document.insert(name, Node::Yaml(value));
        }

        Ok(document)
    }
}

fn yaml_key_name(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(name) => Some(name.clone()),
        serde_yaml::Value::Number(number) => Some(number.to_string()),
        serde_yaml::Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "bool",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

/// TOML codec, writes pretty-printed output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TomlCodec;

impl Codec for TomlCodec {
    fn format(&self) -> EncodingFormat {
        EncodingFormat::Toml
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        let text = std::str::from_utf8(bytes).map_err(codec_error(self.format()))?;
        toml::from_str(text).map_err(codec_error(self.format()))
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        toml::to_string_pretty(value)
            .map(String::into_bytes)
            .map_err(codec_error(self.format()))
    }

    fn to_node<T: Serialize + ?Sized>(&self, value: &T) -> Result<Node, CodecError> {
        toml::Value::try_from(value)
            .map(Node::Toml)
            .map_err(codec_error(self.format()))
    }

    fn decode_document(&self, bytes: &[u8]) -> Result<Document, CodecError> {
        let table: toml::Table = self.decode(bytes)?;
        Ok(table
            .into_iter()
            .map(|(name, value)| (name, Node::Toml(value)))
            .collect())
    }
}
