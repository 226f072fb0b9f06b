use thiserror::Error;

use crate::domain::columns::ColumnError;
use crate::repository::errors::RepositoryError;

pub mod list_view;
pub mod lists;
pub mod pagination;
pub mod toolbar;

/// Errors surfaced by the list services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("column error: {0}")]
    Column(#[from] ColumnError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
