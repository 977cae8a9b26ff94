//! Records returned by the Tarmeez API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::session::UserRecord;

/// One post in the feed or on a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post identifier.
    pub id: u64,
    /// Optional title.
    #[serde(default, deserialize_with = "non_empty_string")]
    pub title: Option<String>,
    /// Post text; empty when the API sends `null`.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub body: String,
    /// Author profile.
    pub author: UserRecord,
    /// Image URL; the API sends `{}` for posts without one.
    #[serde(default, deserialize_with = "non_empty_string")]
    pub image: Option<String>,
    /// Tags, kept opaque.
    #[serde(default)]
    pub tags: Vec<Value>,
    /// Human-readable creation time (e.g. "2 hours ago").
    #[serde(default, deserialize_with = "non_empty_string")]
    pub created_at: Option<String>,
    /// Number of comments.
    #[serde(default)]
    pub comments_count: u64,
    /// Comments, only included when fetching a single post.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier.
    pub id: u64,
    /// Comment text.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub body: String,
    /// Comment author.
    pub author: UserRecord,
}

/// One page of the post feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsPage {
    /// Posts on this page, newest first.
    pub posts: Vec<Post>,
    /// Page number that was fetched.
    pub page: u32,
    /// Last page reported by the server, when known.
    pub last_page: Option<u32>,
    /// Whether later pages exist.
    pub has_more: bool,
}

fn non_empty_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        _ => None,
    })
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(non_empty_string(deserializer)?.unwrap_or_default())
}
