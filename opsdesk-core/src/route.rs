//! Route and history surface
//!
//! The client models its location as a path plus a raw query string. The
//! only parameter the framework itself recognizes is `expandTab`, the
//! deep link that selects and expands a section on load; everything else
//! passes through untouched.

use std::fmt;
use std::time::Duration;

/// Deep-link parameter naming the section index to select on load.
pub const EXPAND_TAB_PARAM: &str = "expandTab";

/// Delay before a consumed deep link performs its click-equivalent work.
pub const DEEP_LINK_DELAY: Duration = Duration::from_millis(300);

/// One location: path plus query string (no leading `?`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub query: String,
}

impl Route {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: String::new(),
        }
    }

    #[must_use]
    pub fn with_query(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    /// Split a raw location on the first `?`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('?') {
            Some((path, query)) => Self::with_query(path, query),
            None => Self::new(raw),
        }
    }

    /// Iterate `key=value` pairs in order. A segment without `=` yields an
    /// empty value.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.split_once('=').unwrap_or((segment, "")))
    }

    /// First value for `key`, if present.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query_pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query)
        }
    }
}

/// Consume the `expandTab` deep link from a route.
///
/// Returns the section index plus the route with every `expandTab` pair
/// removed (other parameters kept in order). A missing parameter, or one
/// that does not parse as a non-negative integer, returns `None` and the
/// route is left as it is.
///
/// Range checking is the caller's job: an index past the end of the
/// section list still consumes the parameter but must activate nothing.
#[must_use]
pub fn take_expand_tab(route: &Route) -> Option<(usize, Route)> {
    let raw = route.query_value(EXPAND_TAB_PARAM)?;
    let index: usize = raw.parse().ok()?;

    let remaining: Vec<&str> = route
        .query
        .split('&')
        .filter(|segment| {
            !segment.is_empty()
                && segment.split('=').next() != Some(EXPAND_TAB_PARAM)
        })
        .collect();

    Some((
        index,
        Route::with_query(route.path.clone(), remaining.join("&")),
    ))
}

/// Linear history of visited routes.
///
/// `replace` swaps the current entry in place, so consuming a deep link
/// never grows the stack.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Route>,
}

impl History {
    #[must_use]
    pub fn new(initial: Route) -> Self {
        Self {
            entries: vec![initial],
        }
    }

    pub fn push(&mut self, route: Route) {
        self.entries.push(route);
    }

    /// Replace the current entry without changing the stack length.
    pub fn replace(&mut self, route: Route) {
        match self.entries.last_mut() {
            Some(current) => *current = route,
            None => self.entries.push(route),
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Route> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
