//! Mock resource reader for isolating services in tests.

use mockall::mock;

use crate::domain::resource::Resource;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ResourceListQuery, ResourceReader};

mock! {
    pub ResourceReader {}

    impl ResourceReader for ResourceReader {
        fn list_resources(&self, query: ResourceListQuery) -> RepositoryResult<(usize, Vec<Resource>)>;
    }
}
