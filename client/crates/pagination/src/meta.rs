//! Decoded `meta` object attached to paginated list responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PaginationError;

/// Page layout reported by the remote API alongside a list payload.
///
/// Only `last_page` is required; the remaining fields are informational and
/// default to `None` when the server omits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Page the server answered with, when reported.
    #[serde(default)]
    pub current_page: Option<u32>,
    /// Highest page number available for the listing.
    pub last_page: u32,
    /// Number of records per page, when reported.
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Total number of records across all pages, when reported.
    #[serde(default)]
    pub total: Option<u64>,
}

impl PaginationMeta {
    /// Build metadata that only carries the last page number.
    #[must_use]
    pub const fn with_last_page(last_page: u32) -> Self {
        Self {
            current_page: None,
            last_page,
            per_page: None,
            total: None,
        }
    }

    /// Decode metadata from the raw `meta` JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidMeta`] when `last_page` is missing
    /// or any field has an unexpected type.
    pub fn from_json(value: &Value) -> Result<Self, PaginationError> {
        // Derived struct deserializers also accept sequences in field order.
        if !value.is_object() {
            return Err(PaginationError::InvalidMeta {
                message: "meta must be a JSON object".to_owned(),
            });
        }
        Self::deserialize(value).map_err(|err| PaginationError::InvalidMeta {
            message: err.to_string(),
        })
    }
}
