//! Predicate construction
//!
//! A selector is a `docType` discriminator plus an ordered list of
//! `(field, value)` equality constraints. It renders to the host query
//! syntax `{"selector":{"docType":..., field: value, ...}}` in insertion
//! order, with values JSON-escaped.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::errors::StoreResult;

/// Discriminator field present on every stored document
pub const DOC_TYPE_FIELD: &str = "docType";

/// Equality selector over one document type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    doc_type: String,
    fields: Vec<(String, String)>,
}

impl Selector {
    /// Match every document of `doc_type`
    pub fn doc_type(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            fields: Vec::new(),
        }
    }

    /// Add an equality constraint
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Render to the host's query string
    pub fn to_query_string(&self) -> StoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

struct SelectorBody<'a>(&'a Selector);

impl Serialize for SelectorBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.0.fields.len()))?;
        map.serialize_entry(DOC_TYPE_FIELD, &self.0.doc_type)?;
        for (name, value) in &self.0.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("selector", &SelectorBody(self))?;
        map.end()
    }
}
