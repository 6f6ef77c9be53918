//! Turns published API documentation into one canonical document model.
//!
//! Input may be an OpenAPI 3 / Swagger 2 document in JSON or YAML, or an
//! arbitrary HTML page. The [`pipeline::DocPipeline`] detects the format,
//! runs the matching extractor and assembles an [`models::ApiDoc`].

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod scraper;
pub mod storage;
pub mod web;

pub use error::{ApiDocError, ErrorKind, Result};
pub use models::{ApiDoc, ApiEndpoint, ApiParameter, ApiResponse, HttpMethod, ParameterLocation};
pub use parser::Format;
pub use pipeline::DocPipeline;
