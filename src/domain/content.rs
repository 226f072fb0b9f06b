//! Selection of what a list view shows for a fetch snapshot.
use serde::Serialize;

/// An item a list row can be selected by.
pub trait ListItem {
    fn id(&self) -> i32;
}

/// The four mutually exclusive states of a list body.
#[derive(Debug, PartialEq, Eq)]
pub enum ContentState<'a, E> {
    /// Nothing to show yet and a fetch is in flight.
    Loading,
    /// The last fetch failed.
    Error(&'a E),
    /// The fetch succeeded with no rows.
    Empty,
    /// Rows are available, even when a background refresh is running.
    Populated,
}

impl<'a, E> ContentState<'a, E> {
    /// Picks the state for a snapshot.
    ///
    /// The checks run in a fixed order: a loading flag only wins while the
    /// list is empty, so a background refresh never blanks rendered rows.
    /// A fetch error takes precedence over stale rows.
    pub fn select(has_content_loading: bool, items_len: usize, content_error: Option<&'a E>) -> Self {
        if has_content_loading && items_len == 0 {
            Self::Loading
        } else if let Some(error) = content_error {
            Self::Error(error)
        } else if items_len == 0 {
            Self::Empty
        } else {
            Self::Populated
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error(_) => "error",
            Self::Empty => "empty",
            Self::Populated => "populated",
        }
    }
}

/// Snapshot produced by the fetch collaborator for one set of parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListViewState<T, E> {
    pub items: Vec<T>,
    pub item_count: usize,
    pub has_content_loading: bool,
    pub content_error: Option<E>,
}

impl<T, E> ListViewState<T, E> {
    /// A fetch has started and nothing has arrived yet.
    pub fn loading() -> Self {
        Self {
            items: Vec::new(),
            item_count: 0,
            has_content_loading: true,
            content_error: None,
        }
    }

    pub fn loaded(items: Vec<T>, item_count: usize) -> Self {
        Self {
            items,
            item_count,
            has_content_loading: false,
            content_error: None,
        }
    }

    pub fn failed(error: E) -> Self {
        Self {
            items: Vec::new(),
            item_count: 0,
            has_content_loading: false,
            content_error: Some(error),
        }
    }

    /// A new snapshot of the same rows with a refresh in flight.
    #[must_use]
    pub fn refreshing(self) -> Self {
        Self {
            has_content_loading: true,
            ..self
        }
    }

    pub fn content_state(&self) -> ContentState<'_, E> {
        ContentState::select(
            self.has_content_loading,
            self.items.len(),
            self.content_error.as_ref(),
        )
    }
}
