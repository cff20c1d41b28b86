//! Strategy store implementations.
//!
//! - [`MemoryStrategyStore`] - in-memory, for tests and development
//! - `SqliteStrategyStore` - file-backed, behind the `sqlite` feature

mod memory;

pub use memory::MemoryStrategyStore;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStrategyStore;
