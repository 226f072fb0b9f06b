//! Declarations of the lists the console shows.
//!
//! Each list owns its URL contract, toolbar columns and a row renderer. The
//! templates list is namespaced and the jobs list uses bare keys, so both can
//! share the dashboard address without stepping on each other.
use thiserror::Error;

use crate::domain::columns::{ColumnError, EmptyStateControl, SearchColumn, SortColumn, Toolbar};
use crate::domain::query::{QueryConfig, QueryConfigError};
use crate::domain::resource::Resource;
use crate::dto::list::RowView;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("invalid query config: {0}")]
    Query(#[from] QueryConfigError),

    #[error("invalid toolbar: {0}")]
    Column(#[from] ColumnError),
}

#[derive(Clone, Debug)]
pub struct ListDefinition {
    pub slug: &'static str,
    /// Standalone page showing only this list.
    pub path: &'static str,
    /// Backend collection the rows come from.
    pub collection: &'static str,
    pub pluralized_item_name: &'static str,
    pub columns: Vec<&'static str>,
    pub config: QueryConfig,
    pub toolbar: Toolbar,
    /// Offered while the list is empty and unfiltered.
    pub empty_state_controls: Vec<EmptyStateControl>,
    pub render_row: fn(&Resource) -> RowView,
}

/// `job_template` -> `Job Template`.
fn to_title_case(value: &str) -> String {
    value
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn timestamp(resource: &Resource) -> String {
    resource.modified.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

fn template_row(template: &Resource) -> RowView {
    RowView {
        id: template.id,
        cells: vec![
            template.name.clone(),
            to_title_case(&template.kind),
            timestamp(template),
        ],
        detail_url: Some(format!("/api/v1/templates/{}", template.id)),
    }
}

fn job_row(job: &Resource) -> RowView {
    RowView {
        id: job.id,
        cells: vec![
            format!("{} - {}", job.id, job.name),
            job.status.as_deref().map(to_title_case).unwrap_or_default(),
            timestamp(job),
        ],
        detail_url: Some(format!("/api/v1/jobs/{}", job.id)),
    }
}

/// The console's lists, looked up by slug.
#[derive(Clone, Debug)]
pub struct ListRegistry {
    lists: Vec<ListDefinition>,
}

impl ListRegistry {
    pub fn console(default_page_size: usize) -> Result<Self, DefinitionError> {
        let templates = ListDefinition {
            slug: "templates",
            path: "/templates",
            collection: "templates",
            pluralized_item_name: "Templates",
            columns: vec!["Name", "Type", "Last Modified"],
            config: QueryConfig::standard(Some("template"), default_page_size, "name")?,
            toolbar: Toolbar::try_new(
                vec![
                    SearchColumn::new("Name", "name").default_column(),
                    SearchColumn::new("Description", "description"),
                    SearchColumn::new("Type", "type"),
                ],
                vec![
                    SortColumn::new("Name", "name"),
                    SortColumn::new("Type", "type"),
                    SortColumn::new("Last Modified", "modified"),
                ],
            )?
            .with_searchable_keys(&["id", "modified"], &["created_by"])?,
            empty_state_controls: vec![EmptyStateControl::new("View jobs", "/jobs")],
            render_row: template_row,
        };

        let jobs = ListDefinition {
            slug: "jobs",
            path: "/jobs",
            collection: "jobs",
            pluralized_item_name: "Jobs",
            columns: vec!["Name", "Status", "Finished"],
            config: QueryConfig::standard(None, default_page_size, "-modified")?,
            toolbar: Toolbar::try_new(
                vec![
                    SearchColumn::new("Name", "name").default_column(),
                    SearchColumn::new("Status", "status"),
                ],
                vec![
                    SortColumn::new("Name", "name"),
                    SortColumn::new("Status", "status"),
                    SortColumn::new("Finished", "modified"),
                ],
            )?
            .with_searchable_keys(&["id", "type"], &["created_by"])?,
            empty_state_controls: vec![EmptyStateControl::new("Browse templates", "/templates")],
            render_row: job_row,
        };

        Ok(Self {
            lists: vec![templates, jobs],
        })
    }

    pub fn get(&self, slug: &str) -> Option<&ListDefinition> {
        self.lists.iter().find(|list| list.slug == slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListDefinition> {
        self.lists.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn resource(kind: &str, status: Option<&str>) -> Resource {
        Resource {
            id: 7,
            name: "Deploy".to_string(),
            kind: kind.to_string(),
            description: String::new(),
            status: status.map(str::to_string),
            created_by: None,
            modified: NaiveDate::from_ymd_opt(2024, 3, 5)
                .and_then(|d| d.and_hms_opt(14, 5, 9))
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn title_case_splits_snake_case() {
        assert_eq!(to_title_case("workflow_job_template"), "Workflow Job Template");
        assert_eq!(to_title_case("failed"), "Failed");
        assert_eq!(to_title_case(""), "");
    }

    #[test]
    fn rows_differ_per_resource_type() {
        let registry = ListRegistry::console(20).expect("valid lists");
        let templates = registry.get("templates").unwrap();
        let jobs = registry.get("jobs").unwrap();

        let template = (templates.render_row)(&resource("job_template", None));
        assert_eq!(
            template.cells,
            vec!["Deploy", "Job Template", "3/5/2024, 2:05:09 PM"]
        );
        assert_eq!(template.detail_url.as_deref(), Some("/api/v1/templates/7"));

        let job = (jobs.render_row)(&resource("job", Some("successful")));
        assert_eq!(job.cells[0], "7 - Deploy");
        assert_eq!(job.cells[1], "Successful");
        assert_eq!(job.detail_url.as_deref(), Some("/api/v1/jobs/7"));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(matches!(
            ListRegistry::console(0),
            Err(DefinitionError::Query(QueryConfigError::NonPositiveDefault(_)))
        ));
    }

    #[test]
    fn console_lists_use_distinct_namespaces() {
        let registry = ListRegistry::console(20).unwrap();
        let namespaces: Vec<_> = registry.iter().map(|l| l.config.namespace()).collect();
        assert_eq!(namespaces, vec![Some("template"), None]);
        assert!(registry.get("inventories").is_none());
    }
}
