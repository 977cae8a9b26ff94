//! Query parameters selecting one page of a listing.

use url::Url;

use crate::cursor::PageCursor;

/// Page selection sent as `page` and optional `limit` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// One-based page number.
    pub page: u32,
    /// Maximum number of records per page; the server default applies when
    /// absent.
    pub limit: Option<u32>,
}

impl PageRequest {
    /// Request the page the cursor currently points at.
    #[must_use]
    pub const fn from_cursor(cursor: &PageCursor, limit: Option<u32>) -> Self {
        Self {
            page: cursor.page(),
            limit,
        }
    }

    /// Query pairs in the order they are appended to a URL.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_owned(), limit.to_string()));
        }
        pairs.push(("page".to_owned(), self.page.to_string()));
        pairs
    }

    /// Append the page selection to `url`, keeping any existing query pairs.
    pub fn append_to(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        for (key, value) in self.query_pairs() {
            query.append_pair(&key, &value);
        }
    }
}
