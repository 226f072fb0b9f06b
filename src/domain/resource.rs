use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::content::ListItem;

/// A backend resource shown as one row of a list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Resource {
    pub id: i32,
    pub name: String,
    /// Resource type, e.g. `job_template` or `workflow_job_template`.
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    /// Lifecycle status for runnable resources such as jobs.
    pub status: Option<String>,
    /// Username of the related user that created the resource.
    pub created_by: Option<String>,
    pub modified: NaiveDateTime,
}

impl Resource {
    /// Returns the value of a filterable or sortable field as text.
    pub fn field(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            "type" => Some(self.kind.clone()),
            "description" => Some(self.description.clone()),
            "status" => Some(self.status.clone().unwrap_or_default()),
            "created_by" => Some(self.created_by.clone().unwrap_or_default()),
            "modified" => Some(self.modified.format("%Y-%m-%dT%H:%M:%S").to_string()),
            _ => None,
        }
    }
}

impl ListItem for Resource {
    fn id(&self) -> i32 {
        self.id
    }
}
