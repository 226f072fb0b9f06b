//! Form definitions backing the list controls.

use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::navigation::Location;

pub mod list;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Rejects anything but a path on this host, so redirects never leave the console.
pub(crate) fn local_path(path: &str) -> Result<(), ValidationError> {
    if path.starts_with('/') && !path.starts_with("//") && !path.contains(['\\', '?', '#']) {
        Ok(())
    } else {
        Err(ValidationError::new("local_path"))
    }
}

/// A form posted from a rendered list; it carries the address it came from.
pub trait ListForm: Validate {
    fn path(&self) -> &str;
    fn query(&self) -> &str;

    /// Validates the form and returns the address the control was rendered at.
    fn location(&self) -> Result<Location, FormError> {
        self.validate()?;
        Ok(Location::new(self.path(), self.query()))
    }
}
