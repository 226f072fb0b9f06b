use serde::Deserialize;
use validator::Validate;

use crate::domain::columns::SearchMode;
use crate::domain::query::SortDirection;
use crate::forms::{ListForm, local_path};

fn first_page() -> usize {
    1
}

#[derive(Debug, Deserialize, Validate)]
/// Jump to another page of a list.
pub struct SetPageForm {
    /// Address the list was rendered at.
    #[validate(custom(function = "local_path"))]
    pub path: String,
    #[serde(default)]
    pub query: String,
    #[validate(range(min = 1))]
    pub page: usize,
}

#[derive(Debug, Deserialize, Validate)]
/// Change how many rows a page shows.
pub struct SetPageSizeForm {
    #[validate(custom(function = "local_path"))]
    pub path: String,
    #[serde(default)]
    pub query: String,
    #[validate(range(min = 1))]
    pub page_size: usize,
    /// Page to land on after the change.
    #[serde(default = "first_page")]
    #[validate(range(min = 1))]
    pub page: usize,
}

#[derive(Debug, Deserialize, Validate)]
/// Add a search term from the toolbar.
pub struct SearchForm {
    #[validate(custom(function = "local_path"))]
    pub path: String,
    #[serde(default)]
    pub query: String,
    /// Search column key; blank means the toolbar's default column.
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default)]
    pub term: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SortForm {
    #[validate(custom(function = "local_path"))]
    pub path: String,
    #[serde(default)]
    pub query: String,
    #[validate(length(min = 1))]
    pub key: String,
    pub direction: SortDirection,
}

#[derive(Debug, Deserialize, Validate)]
/// Remove one value of an active filter chip.
pub struct RemoveFilterForm {
    #[validate(custom(function = "local_path"))]
    pub path: String,
    #[serde(default)]
    pub query: String,
    #[validate(length(min = 1))]
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClearFiltersForm {
    #[validate(custom(function = "local_path"))]
    pub path: String,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize, Validate)]
/// Open the row a user clicked.
pub struct SelectRowForm {
    #[validate(custom(function = "local_path"))]
    pub path: String,
    #[serde(default)]
    pub query: String,
    #[validate(length(min = 1))]
    pub id: String,
}

macro_rules! list_form {
    ($($form:ty),+ $(,)?) => {
        $(
            impl ListForm for $form {
                fn path(&self) -> &str {
                    &self.path
                }

                fn query(&self) -> &str {
                    &self.query
                }
            }
        )+
    };
}

list_form!(
    SetPageForm,
    SetPageSizeForm,
    SearchForm,
    SortForm,
    RemoveFilterForm,
    ClearFiltersForm,
    SelectRowForm,
);
