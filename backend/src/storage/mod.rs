//! Persistence: SQLite repositories behind the `traits` seam, plus the
//! on-disk upload store.

pub mod connection;
pub mod file_store;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use file_store::FileStore;
