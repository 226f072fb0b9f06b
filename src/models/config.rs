//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::pagination::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_page_size_options() -> Vec<usize> {
    PAGE_SIZE_OPTIONS.to_vec()
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Glob of the Tera templates, e.g. `templates/**/*`.
    pub templates_dir: String,
    /// Rows per page when the address does not say otherwise.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Choices of the per-page selector; empty hides it.
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
}
