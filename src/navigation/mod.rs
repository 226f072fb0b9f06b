//! Boundary between the list controllers and the host that owns the address bar.
use std::cell::RefCell;
use std::fmt::{Display, Formatter};

use serde::Serialize;

pub mod history;
#[cfg(feature = "test-mocks")]
pub mod mock;

/// Path and query string of the current address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    /// Query string without the leading `?`.
    pub query: String,
}

impl Location {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            path: path.into(),
            query: query.trim_start_matches('?').to_string(),
        }
    }

    /// Splits an href such as `/templates?page=2#top`; the fragment is dropped.
    pub fn parse(href: &str) -> Self {
        let href = href.split_once('#').map_or(href, |(before, _)| before);
        match href.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(href, ""),
        }
    }

    /// `path?query`, or the bare path when the query is empty.
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.href())
    }
}

/// Host navigation system: exposes the current address and accepts pushes.
///
/// A push only requests navigation; the host decides how re-rendering and
/// re-fetching follow from the new address.
pub trait Navigator {
    fn location(&self) -> Location;
    fn push(&self, path: &str, query: &str);
}

/// Navigator for one HTTP request: remembers the pushed address so the
/// response can redirect to it.
#[derive(Debug)]
pub struct RedirectNavigator {
    current: Location,
    target: RefCell<Option<Location>>,
}

impl RedirectNavigator {
    pub fn new(current: Location) -> Self {
        Self {
            current,
            target: RefCell::new(None),
        }
    }

    /// Where the client should go next: the pushed address, or back to the
    /// current one when nothing was pushed.
    pub fn into_target(self) -> Location {
        self.target.into_inner().unwrap_or(self.current)
    }
}

impl Navigator for RedirectNavigator {
    fn location(&self) -> Location {
        self.current.clone()
    }

    fn push(&self, path: &str, query: &str) {
        self.target.replace(Some(Location::new(path, query)));
    }
}
