//! Typed facade over the Tarmeez REST endpoints.
//!
//! Every call goes through the shared [`HttpClient`]; login, registration
//! and profile updates feed their results into the shared [`SessionStore`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::forms::{FormValidationError, PostDraft, ProfileUpdate};
use super::models::{Comment, Post, PostsPage};
use crate::domain::auth::{LoginCredentials, Registration};
use crate::domain::envelope::{ErrorEnvelope, ResponseEnvelope};
use crate::domain::http_client::{Headers, HttpClient};
use crate::domain::load_gate::LoadGate;
use crate::domain::session::{Session, UserId, UserRecord};
use crate::domain::session_store::SessionStore;

/// Status used for writes attempted without a session.
pub const UNAUTHENTICATED_STATUS: u16 = 401;
/// Status used for payloads rejected before any network I/O.
pub const INVALID_INPUT_STATUS: u16 = 422;

const LOGIN_REQUIRED_MESSAGE: &str = "You must be logged in to do that";

/// Endpoint facade shared by every view.
pub struct TarmeezApi {
    http: Arc<HttpClient>,
    session: Arc<SessionStore>,
    feed_gate: LoadGate,
    feed_exhausted: AtomicBool,
    page_limit: Option<u32>,
}

impl TarmeezApi {
    /// Build the facade over shared services.
    #[must_use]
    pub const fn new(http: Arc<HttpClient>, session: Arc<SessionStore>) -> Self {
        Self {
            http,
            session,
            feed_gate: LoadGate::new(),
            feed_exhausted: AtomicBool::new(false),
            page_limit: None,
        }
    }

    /// Ask for `limit` posts per feed page.
    #[must_use]
    pub const fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = Some(limit);
        self
    }

    /// Shared session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Exchange credentials for a session and make it current.
    ///
    /// # Errors
    ///
    /// Returns the remote rejection, or an unexpected-payload envelope when
    /// the response lacks `user` or `token`.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, ErrorEnvelope> {
        let envelope = self
            .http
            .post("/login", credentials.to_json(), &Headers::new())
            .await?;
        self.adopt_session(&envelope)
    }

    /// Create an account and log into it.
    ///
    /// # Errors
    ///
    /// See [`TarmeezApi::login`].
    pub async fn register(&self, registration: &Registration) -> Result<Session, ErrorEnvelope> {
        let envelope = self
            .http
            .post("/register", registration.to_form(), &Headers::new())
            .await?;
        self.adopt_session(&envelope)
    }

    /// Forget the current session.
    pub fn logout(&self) {
        self.session.set_current_user(None);
    }

    /// Fetch the feed page the shared cursor points at.
    ///
    /// # Errors
    ///
    /// Returns the normalised failure from [`HttpClient::get_page`].
    pub async fn posts_page(&self) -> Result<PostsPage, ErrorEnvelope> {
        let requested = self.http.page();
        let envelope = self
            .http
            .get_page("/posts", self.page_limit, &Headers::new())
            .await?;
        let posts: Vec<Post> = envelope.decode()?;
        let meta = envelope.pagination.as_ref();
        let page = meta.and_then(|m| m.current_page).unwrap_or(requested);
        let last_page = meta.map(|m| m.last_page);
        Ok(PostsPage {
            posts,
            page,
            last_page,
            has_more: last_page.is_some_and(|last| page < last),
        })
    }

    /// Load the next feed page unless a load is in flight or the feed ended.
    ///
    /// Returns `Ok(None)` when nothing was requested.
    ///
    /// # Errors
    ///
    /// See [`TarmeezApi::posts_page`].
    pub async fn load_next_posts(&self) -> Result<Option<PostsPage>, ErrorEnvelope> {
        if self.feed_exhausted.load(Ordering::Acquire) {
            return Ok(None);
        }
        let Some(_permit) = self.feed_gate.try_acquire() else {
            debug!("feed load already in flight");
            return Ok(None);
        };
        let page = self.posts_page().await?;
        if !page.has_more {
            self.feed_exhausted.store(true, Ordering::Release);
        }
        Ok(Some(page))
    }

    /// Start the feed over from the first page.
    pub fn restart_feed(&self) {
        self.http.reset_page();
        self.feed_exhausted.store(false, Ordering::Release);
    }

    /// Whether a feed page is currently loading.
    #[must_use]
    pub fn is_loading_feed(&self) -> bool {
        self.feed_gate.is_loading()
    }

    /// Fetch one post with its comments.
    ///
    /// # Errors
    ///
    /// Returns the normalised request failure or an unexpected-payload
    /// envelope.
    pub async fn post(&self, id: u64) -> Result<Post, ErrorEnvelope> {
        self.fetch(&format!("/posts/{id}")).await
    }

    /// Publish a new post as the current user.
    ///
    /// # Errors
    ///
    /// Fails locally with status 401 when nobody is logged in.
    pub async fn create_post(&self, draft: &PostDraft) -> Result<Post, ErrorEnvelope> {
        let headers = self.auth_headers()?;
        self.http
            .post("/posts", draft.to_form(), &headers)
            .await?
            .decode()
    }

    /// Replace a post's content.
    ///
    /// # Errors
    ///
    /// Fails locally with status 401 when nobody is logged in.
    pub async fn update_post(&self, id: u64, draft: &PostDraft) -> Result<Post, ErrorEnvelope> {
        let headers = self.auth_headers()?;
        let form = draft.to_form().method_override("put");
        self.http
            .post(&format!("/posts/{id}"), form, &headers)
            .await?
            .decode()
    }

    /// Delete a post.
    ///
    /// # Errors
    ///
    /// Fails locally with status 401 when nobody is logged in.
    pub async fn delete_post(&self, id: u64) -> Result<(), ErrorEnvelope> {
        let headers = self.auth_headers()?;
        self.http.delete(&format!("/posts/{id}"), &headers).await?;
        Ok(())
    }

    /// Comment on a post.
    ///
    /// # Errors
    ///
    /// Fails locally with status 401 when nobody is logged in and with
    /// status 422 for blank text.
    pub async fn add_comment(&self, post_id: u64, body: &str) -> Result<Comment, ErrorEnvelope> {
        let headers = self.auth_headers()?;
        if body.trim().is_empty() {
            return Err(invalid_input(&FormValidationError::EmptyComment));
        }
        self.http
            .post(
                &format!("/posts/{post_id}/comments"),
                json!({ "body": body }),
                &headers,
            )
            .await?
            .decode()
    }

    /// Fetch a user profile.
    ///
    /// # Errors
    ///
    /// Returns the normalised request failure or an unexpected-payload
    /// envelope.
    pub async fn user(&self, id: UserId) -> Result<UserRecord, ErrorEnvelope> {
        self.fetch(&format!("/users/{id}")).await
    }

    /// Fetch every post written by a user.
    ///
    /// # Errors
    ///
    /// See [`TarmeezApi::user`].
    pub async fn user_posts(&self, id: UserId) -> Result<Vec<Post>, ErrorEnvelope> {
        self.fetch(&format!("/users/{id}/posts")).await
    }

    /// Update the logged-in user's profile and refresh the stored session.
    ///
    /// The bearer token is kept; only the user record is replaced.
    ///
    /// # Errors
    ///
    /// Fails locally with status 401 when nobody is logged in and with
    /// status 422 for an update that changes nothing.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserRecord, ErrorEnvelope> {
        let current = self.require_session()?;
        let form = update.to_form().map_err(|err| invalid_input(&err))?;
        let user: UserRecord = self
            .http
            .post(
                &format!("/updateProfile/{}", current.user.id),
                form,
                &bearer_headers(&current),
            )
            .await?
            .decode()?;

        match Session::new(user.clone(), current.token) {
            Ok(session) => {
                self.session.set_current_user(Some(session));
            }
            Err(err) => warn!(error = %err, "could not refresh session after profile update"),
        }
        Ok(user)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ErrorEnvelope> {
        self.http
            .get(path, std::iter::empty::<(&str, &str)>(), &Headers::new())
            .await?
            .decode()
    }

    fn adopt_session(&self, envelope: &ResponseEnvelope) -> Result<Session, ErrorEnvelope> {
        let session = session_from(&envelope.data)?;
        self.session.set_current_user(Some(session.clone()));
        Ok(session)
    }

    fn require_session(&self) -> Result<Session, ErrorEnvelope> {
        self.session.get_current_user().ok_or_else(|| {
            debug!("refusing authenticated request without a session");
            ErrorEnvelope::validation(UNAUTHENTICATED_STATUS, LOGIN_REQUIRED_MESSAGE)
        })
    }

    fn auth_headers(&self) -> Result<Headers, ErrorEnvelope> {
        self.require_session().map(|session| bearer_headers(&session))
    }
}

fn session_from(data: &Value) -> Result<Session, ErrorEnvelope> {
    Session::from_json(data).map_err(|err| {
        warn!(error = %err, "authentication response did not carry a session");
        ErrorEnvelope::unexpected_payload()
    })
}

fn bearer_headers(session: &Session) -> Headers {
    Headers::from([("Authorization".to_owned(), session.bearer())])
}

fn invalid_input(err: &FormValidationError) -> ErrorEnvelope {
    ErrorEnvelope::validation(INVALID_INPUT_STATUS, err.to_string())
}
