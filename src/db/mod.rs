//! Database connection pool and operations.

pub mod attendance;
pub mod connection;
pub mod shift;
mod store;

pub use connection::{TableCounts, connect, ensure_schema, get_table_counts, get_version, test_connection};
pub use store::SqlStore;
