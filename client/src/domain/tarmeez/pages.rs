//! Navigable pages of the Tarmeez client.

use crate::domain::router::{RouteParams, RouteTemplateError, Router};
use crate::domain::session::UserId;

/// Path of the post feed.
pub const FEED_PATH: &str = "/";
/// Template of a user profile.
pub const PROFILE_TEMPLATE: &str = "/users/:id";

/// View selected by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Paginated post feed.
    Feed,
    /// A user's profile and posts.
    Profile {
        /// Raw `:id` segment.
        id: String,
    },
}

impl Page {
    /// Numeric user id of a profile page, when the segment parses.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Feed => None,
            Self::Profile { id } => id.parse().ok(),
        }
    }

    /// Path that leads to this page.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Feed => FEED_PATH.to_owned(),
            Self::Profile { id } => format!("/users/{id}"),
        }
    }
}

/// Router with the feed first, so unknown paths fall back to it.
///
/// # Errors
///
/// Propagates [`RouteTemplateError`] from template parsing.
pub fn tarmeez_routes() -> Result<Router<Page>, RouteTemplateError> {
    Router::new()
        .route(FEED_PATH, |_: &RouteParams| Page::Feed)?
        .route(PROFILE_TEMPLATE, |params: &RouteParams| Page::Profile {
            id: params.get("id").unwrap_or_default().to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("/", Page::Feed)]
    #[case("/users/42", Page::Profile { id: "42".to_owned() })]
    #[case("/nowhere", Page::Feed)]
    fn resolves_known_and_unknown_paths(#[case] path: &str, #[case] expected: Page) {
        let router = tarmeez_routes().expect("static templates");
        assert_eq!(router.build(path), Some(expected));
    }

    #[test]
    fn profile_ids_parse_when_numeric() {
        assert_eq!(
            Page::Profile { id: "42".to_owned() }.user_id(),
            Some(UserId::new(42))
        );
        assert_eq!(Page::Profile { id: "me".to_owned() }.user_id(), None);
        assert_eq!(Page::Profile { id: "9".to_owned() }.path(), "/users/9");
    }
}
