//! Page cursor and pagination metadata primitives for the Tarmeez client.
//!
//! Every list endpoint of the remote API answers with a `data` array plus a
//! `meta` object describing the page layout. This crate owns the decoded
//! `meta` shape, the 1-based cursor the HTTP client advances between list
//! requests, and the query parameters used to ask for one page.
//!
//! # Example
//!
//! ```
//! use pagination::{PageCursor, PaginationMeta};
//!
//! let meta = PaginationMeta::from_json(&serde_json::json!({ "last_page": 3 }))
//!     .expect("valid meta");
//! let mut cursor = PageCursor::new();
//!
//! assert!(cursor.advance(&meta));
//! assert_eq!(cursor.page(), 2);
//! ```

mod cursor;
mod error;
mod meta;
mod request;

pub use cursor::PageCursor;
pub use error::PaginationError;
pub use meta::PaginationMeta;
pub use request::PageRequest;
