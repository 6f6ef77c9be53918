//! Format selection and the structured (OpenAPI/Swagger) parsers.
//!
//! A document is routed to exactly one of three strategies:
//! - **JSON**: parsed as an OpenAPI 3 / Swagger 2 document
//! - **YAML**: converted into the equivalent JSON tree, then parsed as JSON
//! - **HTML**: mined heuristically by [`crate::scraper::html_extractor`]
//!
//! [`detect`] picks the strategy, [`candidate_formats`] lists the fallback
//! order a caller may walk, and [`extract`] runs a single strategy.

mod detect;
mod openapi;
mod yaml;

pub use detect::{candidate_formats, detect};
pub use openapi::{parse_openapi_json, parse_openapi_value};
pub use yaml::{parse_openapi_yaml, yaml_to_json};

use crate::error::{ApiDocError, Result};
use crate::models::ApiDoc;
use crate::scraper::html_extractor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extraction strategy for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
    Html,
}

impl Format {
    /// Strategies to try, in order, once this one has been selected.
    pub fn fallback_chain(self) -> &'static [Format] {
        match self {
            Format::Json => &[Format::Json, Format::Html],
            Format::Yaml => &[Format::Yaml, Format::Html],
            Format::Html => &[Format::Html],
        }
    }

    /// Identifier prefix of documents produced by this strategy.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Format::Json | Format::Yaml => "openapi",
            Format::Html => "html",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("JSON"),
            Format::Yaml => f.write_str("YAML"),
            Format::Html => f.write_str("HTML"),
        }
    }
}

impl FromStr for Format {
    type Err = ApiDocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "application/json" | "text/json" => Ok(Format::Json),
            "yaml" | "yml" | "application/yaml" | "text/yaml" | "application/x-yaml" => {
                Ok(Format::Yaml)
            }
            "html" | "text/html" => Ok(Format::Html),
            _ => Err(ApiDocError::UnsupportedContentType(s.to_string())),
        }
    }
}

/// Runs one strategy over `body`.
///
/// HTML extraction never fails; JSON and YAML fail with
/// [`ApiDocError::MalformedInput`] or [`ApiDocError::NotOpenApiDocument`].
pub fn extract(format: Format, body: &[u8]) -> Result<ApiDoc> {
    match format {
        Format::Json => parse_openapi_json(body),
        Format::Yaml => parse_openapi_yaml(body),
        Format::Html => Ok(html_extractor::extract(&String::from_utf8_lossy(body))),
    }
}
