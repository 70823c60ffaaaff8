//! Catalog: relation-name to attribute-layout registry.

mod schema;

pub use schema::{Catalog, CatalogError, RelationDesc};
