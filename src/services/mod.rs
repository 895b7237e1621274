// Service exports
pub mod catalog;
pub mod image;
pub mod llm;
pub mod postgres;

pub use catalog::{CatalogError, CatalogStore};
pub use image::{ImageClient, ImageError};
pub use llm::{LlmClient, LlmError};
pub use postgres::{PostgresClient, PostgresError};
