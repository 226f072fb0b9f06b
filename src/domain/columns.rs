//! Toolbar column descriptors: which fields can be searched and sorted.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lookup suffix applied to free-text searches.
const CONTAINS_LOOKUP: &str = "icontains";
/// Lookup suffix for searches across a related resource.
const RELATED_LOOKUP: &str = "search";

/// Errors raised while declaring or using toolbar columns.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColumnError {
    #[error("column key cannot be empty")]
    EmptyKey,
    #[error("duplicate column key: {0}")]
    DuplicateKey(String),
    #[error("more than one default search column")]
    MultipleDefaults,
    #[error("column {0} is not searchable")]
    NotSearchable(String),
    #[error("column {0} is not sortable")]
    NotSortable(String),
}

/// A field the toolbar search can target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchColumn {
    /// Display label.
    pub name: String,
    /// Backend field name.
    pub key: String,
    #[serde(default)]
    pub is_default: bool,
}

impl SearchColumn {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            is_default: false,
        }
    }

    #[must_use]
    pub fn default_column(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// A field the list can be ordered by.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortColumn {
    /// Display label.
    pub name: String,
    /// Backend field name.
    pub key: String,
}

impl SortColumn {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// A call to action offered in place of the toolbar while a list is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyStateControl {
    pub label: String,
    pub href: String,
}

impl EmptyStateControl {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// How a search term combines with the filters already applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Every filter must match.
    #[default]
    And,
    /// Any `or` filter may match.
    Or,
    /// Rows matching the filter are excluded.
    Not,
}

impl SearchMode {
    fn prefix(self) -> &'static str {
        match self {
            Self::And => "",
            Self::Or => "or__",
            Self::Not => "not__",
        }
    }
}

/// A parsed filter key such as `not__name__icontains`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterKey<'a> {
    pub mode: SearchMode,
    pub field: &'a str,
    pub lookup: Option<&'a str>,
}

impl<'a> FilterKey<'a> {
    pub fn parse(key: &'a str) -> Self {
        let (mode, rest) = if let Some(rest) = key.strip_prefix("not__") {
            (SearchMode::Not, rest)
        } else if let Some(rest) = key.strip_prefix("or__") {
            (SearchMode::Or, rest)
        } else {
            (SearchMode::And, key)
        };
        let (field, lookup) = match rest.rsplit_once("__") {
            Some((field, lookup)) => (field, Some(lookup)),
            None => (rest, None),
        };
        Self {
            mode,
            field,
            lookup,
        }
    }
}

/// Validated search and sort columns of one list toolbar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolbar {
    search_columns: Vec<SearchColumn>,
    sort_columns: Vec<SortColumn>,
    /// Further fields the advanced search accepts, matched by substring.
    searchable_keys: Vec<String>,
    /// Related resources the advanced search accepts, matched by `__search`.
    related_searchable_keys: Vec<String>,
}

impl Toolbar {
    /// Validates the column declarations.
    ///
    /// Empty declarations fall back to a single `Name` column. When no search
    /// column is flagged default, the first one becomes the default.
    pub fn try_new(
        search_columns: Vec<SearchColumn>,
        sort_columns: Vec<SortColumn>,
    ) -> Result<Self, ColumnError> {
        let mut search_columns = if search_columns.is_empty() {
            vec![SearchColumn::new("Name", "name").default_column()]
        } else {
            search_columns
        };
        let sort_columns = if sort_columns.is_empty() {
            vec![SortColumn::new("Name", "name")]
        } else {
            sort_columns
        };

        check_keys(search_columns.iter().map(|c| c.key.as_str()))?;
        check_keys(sort_columns.iter().map(|c| c.key.as_str()))?;

        match search_columns.iter().filter(|c| c.is_default).count() {
            0 => search_columns[0].is_default = true,
            1 => {}
            _ => return Err(ColumnError::MultipleDefaults),
        }

        Ok(Self {
            search_columns,
            sort_columns,
            searchable_keys: Vec::new(),
            related_searchable_keys: Vec::new(),
        })
    }

    /// Adds the keys the advanced search offers besides the search columns.
    ///
    /// Keys already declared as search columns keep their column behaviour.
    pub fn with_searchable_keys(
        mut self,
        searchable_keys: &[&str],
        related_searchable_keys: &[&str],
    ) -> Result<Self, ColumnError> {
        check_keys(searchable_keys.iter().chain(related_searchable_keys).copied())?;
        self.searchable_keys = searchable_keys.iter().map(|k| k.to_string()).collect();
        self.related_searchable_keys = related_searchable_keys.iter().map(|k| k.to_string()).collect();
        Ok(self)
    }

    pub fn search_columns(&self) -> &[SearchColumn] {
        &self.search_columns
    }

    pub fn sort_columns(&self) -> &[SortColumn] {
        &self.sort_columns
    }

    pub fn searchable_keys(&self) -> &[String] {
        &self.searchable_keys
    }

    pub fn related_searchable_keys(&self) -> &[String] {
        &self.related_searchable_keys
    }

    pub fn default_search_column(&self) -> &SearchColumn {
        self.search_columns
            .iter()
            .find(|c| c.is_default)
            .unwrap_or(&self.search_columns[0])
    }

    /// Builds the query key a free-text search on `column_key` is stored under.
    ///
    /// Related keys search the related resource instead of a plain field.
    pub fn search_key(&self, column_key: &str, mode: SearchMode) -> Result<String, ColumnError> {
        let lookup = if self.search_columns.iter().any(|c| c.key == column_key)
            || self.searchable_keys.iter().any(|k| k == column_key)
        {
            CONTAINS_LOOKUP
        } else if self.related_searchable_keys.iter().any(|k| k == column_key) {
            RELATED_LOOKUP
        } else {
            return Err(ColumnError::NotSearchable(column_key.to_string()));
        };
        Ok(format!("{}{column_key}__{lookup}", mode.prefix()))
    }

    pub fn sort_column(&self, key: &str) -> Result<&SortColumn, ColumnError> {
        self.sort_columns
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| ColumnError::NotSortable(key.to_string()))
    }
}

impl Default for Toolbar {
    fn default() -> Self {
        Self {
            search_columns: vec![SearchColumn::new("Name", "name").default_column()],
            sort_columns: vec![SortColumn::new("Name", "name")],
            searchable_keys: Vec::new(),
            related_searchable_keys: Vec::new(),
        }
    }
}

fn check_keys<'a>(keys: impl Iterator<Item = &'a str>) -> Result<(), ColumnError> {
    let mut seen = Vec::new();
    for key in keys {
        if key.is_empty() {
            return Err(ColumnError::EmptyKey);
        }
        if seen.contains(&key) {
            return Err(ColumnError::DuplicateKey(key.to_string()));
        }
        seen.push(key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toolbar() -> Toolbar {
        Toolbar::try_new(
            vec![
                SearchColumn::new("Name", "name").default_column(),
                SearchColumn::new("Description", "description"),
            ],
            vec![SortColumn::new("Name", "name"), SortColumn::new("Modified", "modified")],
        )
        .expect("valid toolbar")
    }

    #[test]
    fn empty_declarations_fall_back_to_name() {
        let toolbar = Toolbar::try_new(vec![], vec![]).unwrap();
        assert_eq!(toolbar, Toolbar::default());
        assert_eq!(toolbar.default_search_column().key, "name");
    }

    #[test]
    fn first_search_column_becomes_default() {
        let toolbar = Toolbar::try_new(
            vec![SearchColumn::new("Type", "type"), SearchColumn::new("Name", "name")],
            vec![],
        )
        .unwrap();
        assert_eq!(toolbar.default_search_column().key, "type");
    }

    #[test]
    fn rejects_conflicting_declarations() {
        let two_defaults = Toolbar::try_new(
            vec![
                SearchColumn::new("Name", "name").default_column(),
                SearchColumn::new("Type", "type").default_column(),
            ],
            vec![],
        );
        assert_eq!(two_defaults, Err(ColumnError::MultipleDefaults));

        let duplicate = Toolbar::try_new(
            vec![],
            vec![SortColumn::new("Name", "name"), SortColumn::new("Name again", "name")],
        );
        assert_eq!(duplicate, Err(ColumnError::DuplicateKey("name".to_string())));

        let empty = Toolbar::try_new(vec![SearchColumn::new("Nothing", "")], vec![]);
        assert_eq!(empty, Err(ColumnError::EmptyKey));
    }

    #[test]
    fn search_key_applies_mode_prefix() {
        let toolbar = toolbar();
        assert_eq!(
            toolbar.search_key("name", SearchMode::And).unwrap(),
            "name__icontains"
        );
        assert_eq!(
            toolbar.search_key("description", SearchMode::Not).unwrap(),
            "not__description__icontains"
        );
        assert_eq!(
            toolbar.search_key("status", SearchMode::Or),
            Err(ColumnError::NotSearchable("status".to_string()))
        );
    }

    #[test]
    fn searchable_keys_widen_the_search() {
        let toolbar = toolbar()
            .with_searchable_keys(&["id", "modified"], &["created_by"])
            .expect("valid keys");

        assert_eq!(toolbar.search_key("id", SearchMode::And).unwrap(), "id__icontains");
        assert_eq!(
            toolbar.search_key("created_by", SearchMode::Or).unwrap(),
            "or__created_by__search"
        );
        assert_eq!(
            toolbar.search_key("inventory", SearchMode::And),
            Err(ColumnError::NotSearchable("inventory".to_string()))
        );
        assert_eq!(toolbar.searchable_keys(), ["id", "modified"]);

        let overlapping = self::toolbar().with_searchable_keys(&["id"], &["id"]);
        assert_eq!(overlapping, Err(ColumnError::DuplicateKey("id".to_string())));
    }

    #[test]
    fn sort_column_must_be_declared() {
        let toolbar = toolbar();
        assert_eq!(toolbar.sort_column("modified").unwrap().name, "Modified");
        assert!(toolbar.sort_column("description").is_err());
    }

    #[test]
    fn filter_key_splits_mode_field_and_lookup() {
        assert_eq!(
            FilterKey::parse("not__name__icontains"),
            FilterKey {
                mode: SearchMode::Not,
                field: "name",
                lookup: Some("icontains"),
            }
        );
        assert_eq!(
            FilterKey::parse("type"),
            FilterKey {
                mode: SearchMode::And,
                field: "type",
                lookup: None,
            }
        );
    }
}
