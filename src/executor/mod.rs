//! Thin query-operator stand-ins (select/insert/delete/hash-join), mirroring
//! the shape of the out-of-scope query glue without a parser, optimizer, or
//! sort-merge join.

pub mod delete;
pub mod hash_join;
pub mod insert;
pub mod select;

pub use delete::delete;
pub use hash_join::hash_join;
pub use insert::insert;
pub use select::{select, CompareOp, Filter};
