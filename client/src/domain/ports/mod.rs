//! Domain ports and supporting types for the adapter boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod http_transport;
mod key_value_store;
mod layout;

#[cfg(test)]
pub use http_transport::MockHttpTransport;
pub use http_transport::{
    HttpMethod, HttpTransport, HttpTransportError, TransportBody, TransportRequest,
    TransportResponse,
};
#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{InMemoryKeyValueStore, KeyValueStore, KeyValueStoreError};
pub use layout::{Layout, RecordingLayout};
