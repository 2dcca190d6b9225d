//! Datasource backends.

pub mod memory;

pub use memory::{InMemoryDataSource, InsertedRow};
