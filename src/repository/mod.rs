use crate::domain::columns::{FilterKey, SearchMode};
use crate::domain::query::{Parameters, SortDirection};
use crate::domain::resource::Resource;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub mode: SearchMode,
    pub field: String,
    pub lookup: Option<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceListQuery {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, SortDirection)>,
    pub pagination: Option<Pagination>,
}

impl ResourceListQuery {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order_by: None,
            pagination: None,
        }
    }

    /// Builds the backend query for a list's resolved parameters.
    pub fn from_params(collection: impl Into<String>, params: &Parameters) -> Self {
        let mut query = Self::new(collection);
        for (key, value) in params.filters() {
            query = query.filter(key, value.to_query_values());
        }
        if let Some((field, direction)) = params.sort() {
            query = query.order_by(field, direction);
        }
        if let Some(per_page) = params.page_size() {
            query = query.paginate(params.page(), per_page);
        }
        query
    }

    pub fn filter(mut self, key: &str, values: Vec<String>) -> Self {
        let parsed = FilterKey::parse(key);
        self.filters.push(Filter {
            mode: parsed.mode,
            field: parsed.field.to_string(),
            lookup: parsed.lookup.map(str::to_string),
            values,
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Source of list rows. Returns the total match count and the requested page.
pub trait ResourceReader {
    fn list_resources(&self, query: ResourceListQuery) -> RepositoryResult<(usize, Vec<Resource>)>;
}
