//! Data handed to the list templates and the JSON API.

use serde::Serialize;

use crate::domain::columns::{EmptyStateControl, SearchColumn, SortColumn};
use crate::domain::query::{Parameters, SortDirection};
use crate::domain::resource::Resource;
use crate::pagination::PaginationModel;

/// One rendered table row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: i32,
    /// Cell texts, one per declared column.
    pub cells: Vec<String>,
    pub detail_url: Option<String>,
}

/// An active search filter, removable from the toolbar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    /// List-local query key, e.g. `name__icontains`.
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Toolbar state for the search and sort controls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolbarView {
    pub item_count: usize,
    pub search_columns: Vec<SearchColumn>,
    pub sort_columns: Vec<SortColumn>,
    pub searchable_keys: Vec<String>,
    pub related_searchable_keys: Vec<String>,
    /// Non-empty only while the list has no items and no filters.
    pub empty_state_controls: Vec<EmptyStateControl>,
    pub sort_key: Option<String>,
    pub sort_direction: Option<SortDirection>,
    pub chips: Vec<FilterChip>,
}

/// Everything the list partial needs to render one list.
#[derive(Debug, Serialize)]
pub struct ListPageData {
    pub slug: String,
    pub label: String,
    /// Address the list is rendered at; posted back by the controls.
    pub path: String,
    pub query: String,
    /// One of `loading`, `error`, `empty` or `populated`.
    pub state: &'static str,
    pub error: Option<String>,
    pub empty_title: Option<String>,
    pub empty_message: Option<String>,
    pub header: Vec<String>,
    pub rows: Vec<RowView>,
    pub toolbar: ToolbarView,
    pub pagination: PaginationModel,
    pub bottom_pagination: Option<PaginationModel>,
}

/// Response payload of `/api/v1/{list}`.
#[derive(Debug, Serialize)]
pub struct ApiListResponse {
    pub count: usize,
    pub params: Parameters,
    /// Backend query including defaults, as a fetch collaborator would send it.
    pub backend_query: String,
    pub pagination: PaginationModel,
    pub results: Vec<Resource>,
}
