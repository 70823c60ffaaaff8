//! Relation-name to attribute-layout registry.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::types::AttrDesc;

/// Errors raised by [`Catalog`] registration and lookup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("relation '{0}' already exists")]
    AlreadyExists(String),

    #[error("relation '{0}' not found")]
    NotFound(String),
}

/// Result type alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Layout of one relation: its ordered attributes.
#[derive(Debug, Clone, Default)]
pub struct RelationDesc {
    /// Attributes in on-page order.
    pub attrs: Vec<AttrDesc>,
}

impl RelationDesc {
    /// Creates a relation description from its attributes.
    #[must_use]
    pub fn new(attrs: Vec<AttrDesc>) -> Self {
        Self { attrs }
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&AttrDesc> {
        self.attrs.iter().find(|a| a.name == name)
    }

    /// Total record length implied by the attribute layout.
    #[must_use]
    pub fn record_len(&self) -> usize {
        self.attrs
            .iter()
            .map(|a| a.offset + a.length)
            .max()
            .unwrap_or(0)
    }
}

/// Registry mapping relation name to its [`RelationDesc`].
///
/// Populated programmatically; there is no DDL parser in scope.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    relations: HashMap<String, Arc<RelationDesc>>,
}

impl Catalog {
    /// Creates a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            relations: HashMap::new(),
        }
    }

    /// Registers a new relation.
    ///
    /// # Errors
    ///
    /// Returns an error if a relation with the same name already exists.
    pub fn create_relation(&mut self, name: impl Into<String>, desc: RelationDesc) -> Result<()> {
        let name = name.into();
        if self.relations.contains_key(&name) {
            return Err(CatalogError::AlreadyExists(name));
        }
        self.relations.insert(name, Arc::new(desc));
        Ok(())
    }

    /// Retrieves a relation's layout by name.
    #[must_use]
    pub fn get_relation(&self, name: &str) -> Option<Arc<RelationDesc>> {
        self.relations.get(name).cloned()
    }

    /// Retrieves a relation's layout by name, or an error if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if no relation named `name` is registered.
    pub fn require_relation(&self, name: &str) -> Result<Arc<RelationDesc>> {
        self.get_relation(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// Checks whether a relation is registered.
    #[must_use]
    pub fn relation_exists(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    /// Returns all registered relation names.
    #[must_use]
    pub fn relation_names(&self) -> Vec<&str> {
        self.relations.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttrType;

    fn sample_desc() -> RelationDesc {
        RelationDesc::new(vec![
            AttrDesc::new("id", 0, 4, AttrType::Integer),
            AttrDesc::new("name", 4, 32, AttrType::String),
        ])
    }

    #[test]
    fn create_then_get_round_trips() {
        let mut catalog = Catalog::new();
        catalog.create_relation("students", sample_desc()).unwrap();
        let desc = catalog.get_relation("students").unwrap();
        assert_eq!(desc.attrs.len(), 2);
        assert_eq!(desc.record_len(), 36);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut catalog = Catalog::new();
        catalog.create_relation("students", sample_desc()).unwrap();
        match catalog.create_relation("students", sample_desc()) {
            Err(CatalogError::AlreadyExists(name)) => assert_eq!(name, "students"),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
    }

    #[test]
    fn missing_relation_errors_on_require() {
        let catalog = Catalog::new();
        assert!(catalog.get_relation("ghost").is_none());
        match catalog.require_relation("ghost") {
            Err(CatalogError::NotFound(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn attr_lookup_by_name() {
        let desc = sample_desc();
        assert_eq!(desc.attr("name").unwrap().length, 32);
        assert!(desc.attr("missing").is_none());
    }
}
