//! Client-side routing: ordered template matching, history navigation and
//! view mounting.
//!
//! Routes are tested in registration order and the first structural match
//! wins, so specific templates must be registered before general ones. A
//! path that matches nothing follows the router's [`UnmatchedPolicy`].

mod history;
mod mount;
mod navigator;
mod template;

use tracing::debug;

pub use history::History;
pub use mount::{MountTicket, ViewHost};
pub use navigator::Navigator;
pub use template::{RouteParams, RouteTemplate, RouteTemplateError};

use template::normalise_path;

type ViewFactory<V> = Box<dyn Fn(&RouteParams) -> V + Send + Sync>;
type NotFoundFactory<V> = Box<dyn Fn(&str) -> V + Send + Sync>;

/// What to do with a path no template matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedPolicy {
    /// Use the first registered route with empty parameters.
    #[default]
    FallbackToFirst,
    /// Report the path as not found.
    NotFound,
}

/// Route that matched (or was chosen as fallback) for a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Registration index of the route.
    pub index: usize,
    /// Template text of the route.
    pub template: String,
    /// Captured parameters.
    pub params: RouteParams,
}

/// Result of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A template matched the path.
    Matched(RouteMatch),
    /// Nothing matched; the first route was chosen.
    Fallback(RouteMatch),
    /// Nothing matched and the policy reports it.
    NotFound {
        /// The unmatched path, without query string or fragment.
        path: String,
    },
}

impl RouteOutcome {
    /// The chosen route, if any.
    #[must_use]
    pub const fn route(&self) -> Option<&RouteMatch> {
        match self {
            Self::Matched(route) | Self::Fallback(route) => Some(route),
            Self::NotFound { .. } => None,
        }
    }
}

struct Route<V> {
    template: RouteTemplate,
    factory: ViewFactory<V>,
}

/// Ordered route table producing views of type `V`.
///
/// # Examples
///
/// ```
/// use tarmeez_client::domain::Router;
///
/// let router = Router::new()
///     .route("/", |_| "home".to_owned())
///     .and_then(|router| {
///         router.route("/users/:id", |params| format!("user {}", params.get("id").unwrap_or("?")))
///     })
///     .unwrap();
///
/// assert_eq!(router.build("/users/42"), Some("user 42".to_owned()));
/// assert_eq!(router.build("/nowhere"), Some("home".to_owned()));
/// ```
pub struct Router<V> {
    routes: Vec<Route<V>>,
    policy: UnmatchedPolicy,
    not_found: Option<NotFoundFactory<V>>,
}

impl<V> Router<V> {
    /// Empty router that falls back to its first route.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            routes: Vec::new(),
            policy: UnmatchedPolicy::FallbackToFirst,
            not_found: None,
        }
    }

    /// Register `template` after every existing route.
    ///
    /// # Errors
    ///
    /// Returns [`RouteTemplateError`] when the template does not compile.
    pub fn route<F>(mut self, template: &str, factory: F) -> Result<Self, RouteTemplateError>
    where
        F: Fn(&RouteParams) -> V + Send + Sync + 'static,
    {
        self.routes.push(Route {
            template: RouteTemplate::parse(template)?,
            factory: Box::new(factory),
        });
        Ok(self)
    }

    /// Report unmatched paths as not found and build them with `factory`.
    #[must_use]
    pub fn with_not_found<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> V + Send + Sync + 'static,
    {
        self.policy = UnmatchedPolicy::NotFound;
        self.not_found = Some(Box::new(factory));
        self
    }

    /// Switch the unmatched-path policy.
    #[must_use]
    pub fn with_policy(mut self, policy: UnmatchedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active unmatched-path policy.
    #[must_use]
    pub const fn policy(&self) -> UnmatchedPolicy {
        self.policy
    }

    /// Registered templates in matching order.
    pub fn templates(&self) -> impl Iterator<Item = &RouteTemplate> {
        self.routes.iter().map(|route| &route.template)
    }

    /// Resolve `path` against the table.
    #[must_use]
    pub fn resolve(&self, path: &str) -> RouteOutcome {
        let normalised = normalise_path(path);
        let matched = self.routes.iter().enumerate().find_map(|(index, route)| {
            route.template.match_path(normalised).map(|params| RouteMatch {
                index,
                template: route.template.as_str().to_owned(),
                params,
            })
        });
        if let Some(route) = matched {
            return RouteOutcome::Matched(route);
        }

        match (self.policy, self.routes.first()) {
            (UnmatchedPolicy::FallbackToFirst, Some(first)) => {
                debug!(path = normalised, fallback = first.template.as_str(), "no route matched; using fallback");
                RouteOutcome::Fallback(RouteMatch {
                    index: 0,
                    template: first.template.as_str().to_owned(),
                    params: RouteParams::default(),
                })
            }
            _ => {
                debug!(path = normalised, "no route matched");
                RouteOutcome::NotFound {
                    path: normalised.to_owned(),
                }
            }
        }
    }

    /// Resolve `path` and build its view.
    ///
    /// Returns `None` only for a not-found outcome without a not-found
    /// factory.
    #[must_use]
    pub fn build(&self, path: &str) -> Option<V> {
        self.instantiate(&self.resolve(path))
    }

    /// Build the view for an already resolved outcome.
    #[must_use]
    pub fn instantiate(&self, outcome: &RouteOutcome) -> Option<V> {
        match outcome {
            RouteOutcome::Matched(route) | RouteOutcome::Fallback(route) => self
                .routes
                .get(route.index)
                .map(|entry| (entry.factory)(&route.params)),
            RouteOutcome::NotFound { path } => {
                self.not_found.as_ref().map(|factory| factory(path))
            }
        }
    }
}

impl<V> Default for Router<V> {
    fn default() -> Self {
        Self::new()
    }
}
