//! minirel - a teaching relational database's storage core.
//!
//! The buffer pool ([`storage::buffer_pool`]) and join hash table
//! ([`join_hash_table`]) are the two real data structures here; the catalog,
//! heap file, and query operators above them exist to give those two
//! something realistic to serve.

pub mod catalog;
pub mod error;
pub mod executor;
pub mod heap_file;
pub mod join_hash_table;
pub mod storage;
pub mod types;

pub use error::{PoolError, Result};
pub use join_hash_table::JoinHashTable;
pub use storage::{BufferPool, BufferPoolConfig};
