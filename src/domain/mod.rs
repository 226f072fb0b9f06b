pub mod columns;
pub mod content;
pub mod query;
pub mod resource;
