//! In-memory resource collections backing the demo console and tests.
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::columns::SearchMode;
use crate::domain::query::SortDirection;
use crate::domain::resource::Resource;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{Filter, ResourceListQuery, ResourceReader};

#[derive(Clone, Default)]
pub struct InMemoryResources {
    collections: Arc<RwLock<HashMap<String, Vec<Resource>>>>,
}

impl InMemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, collection: &str, resources: Vec<Resource>) {
        match self.collections.write() {
            Ok(mut collections) => {
                collections.insert(collection.to_string(), resources);
            }
            Err(e) => log::error!("Failed to store collection {collection}: {e}"),
        }
    }

    /// Seeds job templates and jobs so the console has something to page through.
    pub fn demo() -> Self {
        let store = Self::new();
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap_or_default();

        let templates = (1..=42)
            .map(|id| {
                let workflow = id % 4 == 0;
                Resource {
                    id,
                    name: format!("{} {id:02}", if workflow { "Workflow" } else { "Deploy" }),
                    kind: if workflow {
                        "workflow_job_template"
                    } else {
                        "job_template"
                    }
                    .to_string(),
                    description: format!("Demo template number {id}"),
                    status: None,
                    created_by: Some(if id % 3 == 0 { "operator" } else { "admin" }.to_string()),
                    modified: shifted(base, id),
                }
            })
            .collect();

        let statuses = ["successful", "failed", "running", "pending"];
        let jobs = (1..=27)
            .map(|id| Resource {
                id,
                name: format!("Deploy {:02}", id % 10 + 1),
                kind: "job".to_string(),
                description: String::new(),
                status: Some(statuses[id as usize % statuses.len()].to_string()),
                created_by: Some("admin".to_string()),
                modified: shifted(base, id * 3),
            })
            .collect();

        store.insert("templates", templates);
        store.insert("jobs", jobs);
        store
    }
}

fn shifted(base: NaiveDateTime, hours: i32) -> NaiveDateTime {
    base + chrono::Duration::hours(i64::from(hours))
}

fn matches_value(actual: &str, lookup: Option<&str>, expected: &str) -> RepositoryResult<bool> {
    match lookup {
        None | Some("exact") => Ok(actual == expected),
        Some("iexact") => Ok(actual.to_lowercase() == expected.to_lowercase()),
        Some("icontains" | "search") => Ok(actual.to_lowercase().contains(&expected.to_lowercase())),
        Some(other) => Err(RepositoryError::InvalidFilter(format!("unsupported lookup {other}"))),
    }
}

fn matches_filter(resource: &Resource, filter: &Filter) -> RepositoryResult<bool> {
    let actual = resource
        .field(&filter.field)
        .ok_or_else(|| RepositoryError::InvalidFilter(format!("unknown field {}", filter.field)))?;

    let mut hits = 0;
    for expected in &filter.values {
        if matches_value(&actual, filter.lookup.as_deref(), expected)? {
            hits += 1;
        }
    }

    Ok(match filter.mode {
        SearchMode::Not => hits == 0,
        // Repeated values of one filter must all match, like repeated API filters.
        SearchMode::And => hits == filter.values.len(),
        SearchMode::Or => hits > 0,
    })
}

fn matches_all(resource: &Resource, filters: &[Filter]) -> RepositoryResult<bool> {
    let mut any_or = None;
    for filter in filters {
        let matched = matches_filter(resource, filter)?;
        if filter.mode == SearchMode::Or {
            any_or = Some(any_or.unwrap_or(false) || matched);
        } else if !matched {
            return Ok(false);
        }
    }
    Ok(any_or.unwrap_or(true))
}

fn compare(a: &Resource, b: &Resource, field: &str) -> Ordering {
    if field == "id" {
        return a.id.cmp(&b.id);
    }
    a.field(field).cmp(&b.field(field)).then(a.id.cmp(&b.id))
}

impl ResourceReader for InMemoryResources {
    fn list_resources(&self, query: ResourceListQuery) -> RepositoryResult<(usize, Vec<Resource>)> {
        let collections = self
            .collections
            .read()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        let resources = collections
            .get(&query.collection)
            .ok_or_else(|| RepositoryError::NotFound(query.collection.clone()))?;

        let mut matched = Vec::new();
        for resource in resources {
            if matches_all(resource, &query.filters)? {
                matched.push(resource.clone());
            }
        }

        if let Some((field, direction)) = &query.order_by {
            if Resource::default().field(field).is_none() {
                return Err(RepositoryError::InvalidFilter(format!("cannot order by {field}")));
            }
            matched.sort_by(|a, b| {
                let ordering = compare(a, b, field);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let total = matched.len();
        let page = match &query.pagination {
            Some(pagination) => matched
                .into_iter()
                .skip((pagination.page.max(1) - 1).saturating_mul(pagination.per_page))
                .take(pagination.per_page)
                .collect(),
            None => matched,
        };

        Ok((total, page))
    }
}
