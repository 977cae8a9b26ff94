//! Storage outbound adapters.
//!
//! This module provides the file-backed implementation of the
//! `KeyValueStore` port.

mod atomic_io;
mod file_store;

pub use file_store::FileKeyValueStore;
