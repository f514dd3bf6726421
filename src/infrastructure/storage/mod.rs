//! Key-value storage adapters

mod file_store;

pub use file_store::FileKeyValueStore;
