//! Tarmeez social API: records, write payloads, endpoints and pages.

mod api;
mod forms;
mod models;
mod pages;

pub use api::{INVALID_INPUT_STATUS, TarmeezApi, UNAUTHENTICATED_STATUS};
pub use forms::{FormValidationError, ImageUpload, PostDraft, ProfileUpdate};
pub use models::{Comment, Post, PostsPage};
pub use pages::{FEED_PATH, PROFILE_TEMPLATE, Page, tarmeez_routes};
