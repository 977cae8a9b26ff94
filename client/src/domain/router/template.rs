//! Path templates with literal and `:name` parameter segments.

use std::collections::BTreeMap;
use std::fmt;

/// Errors raised while compiling a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTemplateError {
    /// Templates must start with `/`.
    NotAbsolute {
        /// The rejected template.
        template: String,
    },
    /// A `:` segment had no name.
    EmptyParameterName {
        /// The rejected template.
        template: String,
    },
    /// The same parameter name appeared twice.
    DuplicateParameter {
        /// The repeated name.
        name: String,
    },
}

impl fmt::Display for RouteTemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAbsolute { template } => {
                write!(f, "route template must start with '/': {template}")
            }
            Self::EmptyParameterName { template } => {
                write!(f, "route template has an unnamed parameter: {template}")
            }
            Self::DuplicateParameter { name } => {
                write!(f, "route parameter '{name}' appears more than once")
            }
        }
    }
}

impl std::error::Error for RouteTemplateError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Parameters extracted from a matched path, keyed by placeholder name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
    /// Value captured for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// Compiled route template such as `/users/:id`.
///
/// Every parameter captures exactly one non-empty path segment; literal
/// segments must match exactly. Matching is structural: a path matches
/// only when it has the same number of segments.
///
/// # Examples
///
/// ```
/// use tarmeez_client::domain::RouteTemplate;
///
/// let template = RouteTemplate::parse("/users/:id").unwrap();
/// let params = template.match_path("/users/42").unwrap();
/// assert_eq!(params.get("id"), Some("42"));
/// assert!(template.match_path("/users/").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    /// Compile `template`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteTemplateError`] for relative templates, unnamed
    /// parameters or repeated parameter names.
    pub fn parse(template: &str) -> Result<Self, RouteTemplateError> {
        if !template.starts_with('/') {
            return Err(RouteTemplateError::NotAbsolute {
                template: template.to_owned(),
            });
        }

        let mut segments = Vec::new();
        for raw in split_segments(template) {
            let segment = match raw.strip_prefix(':') {
                Some("") => {
                    return Err(RouteTemplateError::EmptyParameterName {
                        template: template.to_owned(),
                    });
                }
                Some(name) => {
                    if segments
                        .iter()
                        .any(|existing| matches!(existing, Segment::Param(seen) if seen == name))
                    {
                        return Err(RouteTemplateError::DuplicateParameter {
                            name: name.to_owned(),
                        });
                    }
                    Segment::Param(name.to_owned())
                }
                None => Segment::Literal(raw.to_owned()),
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: template.to_owned(),
            segments,
        })
    }

    /// Template text as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parameter names in positional order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match `path` and capture parameters, pairing the Nth placeholder with
    /// the Nth captured segment.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<RouteParams> {
        let normalised = normalise_path(path);
        if !normalised.starts_with('/') {
            return None;
        }
        let mut candidate = split_segments(normalised);
        let mut captured = BTreeMap::new();
        for segment in &self.segments {
            let value = candidate.next()?;
            match segment {
                Segment::Literal(literal) if literal == value => {}
                Segment::Literal(_) => return None,
                Segment::Param(_) if value.is_empty() => return None,
                Segment::Param(name) => {
                    captured.insert(name.clone(), value.to_owned());
                }
            }
        }
        if candidate.next().is_some() {
            return None;
        }
        Some(RouteParams(captured))
    }

    /// Fill the template with `params`, producing a navigable path.
    #[must_use]
    pub fn render(&self, params: &RouteParams) -> Option<String> {
        if self.segments.is_empty() {
            return Some("/".to_owned());
        }
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Param(name) => path.push_str(params.get(name)?),
            }
        }
        Some(path)
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Drop the query string and fragment, and treat an empty path as `/`.
pub(crate) fn normalise_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path.get(..end).unwrap_or(path);
    if trimmed.is_empty() { "/" } else { trimmed }
}

// "/" has no segments; "/a/b" has ["a", "b"]; "/a/" has ["a", ""].
fn split_segments(path: &str) -> std::str::Split<'_, char> {
    let rest = path.strip_prefix('/').unwrap_or(path);
    let mut segments = rest.split('/');
    if rest.is_empty() {
        segments.next();
    }
    segments
}
