//! Generic, format-neutral view of a configuration document
//!
//! A [`Document`] is always keyed by section name. Each value is a [`Node`]
//! holding the sub-document in the native generic type of the codec that
//! produced it, so nested data is never forced through another format's
//! data model.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::format::EncodingFormat;

/// One section's sub-document in its codec's native value type
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Json(serde_json::Value),
    Yaml(serde_yaml::Value),
    Toml(toml::Value),
}

impl Node {
    /// Format whose codec produced this node
    pub fn format(&self) -> EncodingFormat {
        match self {
            Self::Json(_) => EncodingFormat::Json,
            Self::Yaml(_) => EncodingFormat::Yaml,
            Self::Toml(_) => EncodingFormat::Toml,
        }
    }

    /// Whether the node is a keyed aggregate (object, mapping or table)
    pub fn is_aggregate(&self) -> bool {
        match self {
            Self::Json(value) => value.is_object(),
            Self::Yaml(value) => value.is_mapping(),
            Self::Toml(value) => value.is_table(),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Json(value) => value.serialize(serializer),
            Self::Yaml(value) => value.serialize(serializer),
            Self::Toml(value) => value.serialize(serializer),
        }
    }
}

/// Top-level aggregate: section name to sub-document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: BTreeMap<String, Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Insert a sub-document, returning the one it replaced
    pub fn insert<S: Into<String>>(&mut self, name: S, node: Node) -> Option<Node> {
        self.entries.insert(name.into(), node)
    }

    /// Section names in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Node)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_keys_are_sorted() {
        let mut document = Document::new();
        document.insert("zeta", Node::Json(json!({})));
        document.insert("alpha", Node::Json(json!({})));

        let keys: Vec<&str> = document.keys().collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_node_serializes_transparently() {
        let document: Document = vec![(
            "web_server".to_string(),
            Node::Json(json!({ "port": 8080 })),
        )]
        .into_iter()
        .collect();

        let rendered = serde_json::to_value(&document).unwrap();
        assert_eq!(rendered, json!({ "web_server": { "port": 8080 } }));
    }

    #[test]
    fn test_is_aggregate() {
        assert!(Node::Json(json!({ "a": 1 })).is_aggregate());
        assert!(!Node::Json(json!(1)).is_aggregate());
        assert!(!Node::Yaml(serde_yaml::Value::Null).is_aggregate());
        assert!(Node::Toml(toml::Value::Table(toml::Table::new())).is_aggregate());
    }
}
