//! One-based page cursor advanced across paginated list requests.

use crate::meta::PaginationMeta;

/// Page counter for an incrementally loaded listing.
///
/// The cursor starts at page 1 and moves forward one page at a time while the
/// last response reports further pages. It never resets on its own; callers
/// that restart a listing call [`PageCursor::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
}

impl PageCursor {
    /// First page of every listing.
    pub const FIRST_PAGE: u32 = 1;

    /// Create a cursor positioned on the first page.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            page: Self::FIRST_PAGE,
        }
    }

    /// Current page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Whether `meta` reports pages beyond the current one.
    #[must_use]
    pub const fn has_more(&self, meta: &PaginationMeta) -> bool {
        self.page < meta.last_page
    }

    /// Move to the next page if `meta` reports one.
    ///
    /// Returns `true` when the cursor moved.
    pub fn advance(&mut self, meta: &PaginationMeta) -> bool {
        if !self.has_more(meta) {
            return false;
        }
        self.page = self.page.saturating_add(1);
        true
    }

    /// Return to the first page.
    pub const fn reset(&mut self) {
        self.page = Self::FIRST_PAGE;
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}
