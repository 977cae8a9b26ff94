//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed `HttpTransport`
//! - **storage**: directory-backed `KeyValueStore` with atomic writes
//!
//! Adapters translate between domain types and wire or file representations.
//! They contain no business logic.

pub mod http;
pub mod storage;
