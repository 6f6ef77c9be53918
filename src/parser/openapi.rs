//! OpenAPI 3 / Swagger 2 normalizer
//!
//! Only the parts of the document that feed the canonical model are typed:
//! `info`, `paths`, operations, parameters and responses. Everything else is
//! ignored, and schemas are never resolved.

use super::Format;
use crate::error::{ApiDocError, Result};
use crate::models::{ApiDoc, ApiEndpoint, ApiParameter, ApiResponse, HttpMethod, ParameterLocation};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// OpenAPI document root
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct OpenApiDocument {
    /// OpenAPI 3.x version (e.g., "3.0.0")
    #[serde(deserialize_with = "lenient_string")]
    openapi: String,

    /// Swagger 2.0 version
    #[serde(deserialize_with = "lenient_string")]
    swagger: String,

    /// API metadata
    info: Info,

    /// Path string → operations on it
    paths: BTreeMap<String, PathItem>,
}

impl OpenApiDocument {
    fn spec_version(&self) -> &str {
        if self.openapi.is_empty() {
            &self.swagger
        } else {
            &self.openapi
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Info {
    #[serde(deserialize_with = "lenient_string")]
    title: String,

    #[serde(deserialize_with = "lenient_string")]
    description: String,

    #[serde(deserialize_with = "lenient_string")]
    version: String,
}

/// Operations available on a single path
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PathItem {
    get: Option<Operation>,
    post: Option<Operation>,
    put: Option<Operation>,
    delete: Option<Operation>,
    options: Option<Operation>,
    head: Option<Operation>,
    patch: Option<Operation>,
}

impl PathItem {
    /// Present operations, paired with their verb.
    fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Options, &self.options),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Patch, &self.patch),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Operation {
    #[serde(deserialize_with = "lenient_string")]
    summary: String,

    #[serde(deserialize_with = "lenient_string")]
    description: String,

    parameters: Vec<Parameter>,

    /// Status code key → response object (kept untyped, may be a `$ref`)
    responses: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Parameter {
    #[serde(deserialize_with = "lenient_string")]
    name: String,

    /// query, path, header, cookie, body, formData
    #[serde(rename = "in", deserialize_with = "lenient_string")]
    location: String,

    #[serde(deserialize_with = "lenient_string")]
    description: String,

    required: bool,

    /// OpenAPI 3 schema; only `type` is read
    schema: Option<Value>,

    /// Swagger 2.0 top-level type
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    legacy_type: String,
}

impl Parameter {
    fn resolved_type(&self) -> String {
        self.schema
            .as_ref()
            .and_then(|schema| schema.get("type"))
            .and_then(type_name)
            .unwrap_or_else(|| self.legacy_type.clone())
    }
}

/// `type` is a string, or in OpenAPI 3.1 a list such as `["string", "null"]`.
fn type_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .find(|s| *s != "null")
            .map(str::to_string),
        _ => None,
    }
}

/// Accepts any scalar where a string is expected (YAML `version: 1.0`).
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn location_of(raw: &str) -> ParameterLocation {
    match raw.to_ascii_lowercase().as_str() {
        "query" => ParameterLocation::Query,
        "path" => ParameterLocation::Path,
        "header" => ParameterLocation::Header,
        "cookie" => ParameterLocation::Cookie,
        "body" | "formdata" => ParameterLocation::Body,
        other => {
            debug!(location = other, "Unknown parameter location, treating as query");
            ParameterLocation::Query
        }
    }
}

/// `"default"` and anything that is not a decimal integer map to `0`.
/// Out-of-range integers such as `"70000"` or `"-1"` are kept as written.
pub(crate) fn parse_status_code(key: &str) -> i32 {
    if key == "default" {
        return 0;
    }
    key.trim().parse::<i32>().unwrap_or(0)
}

/// Opaque `$ref` of the response body schema, when written inline.
fn schema_ref(response: &Value) -> Option<String> {
    let direct = response.get("schema");
    let from_content = || {
        response
            .get("content")
            .and_then(Value::as_object)
            .and_then(|media| media.values().find_map(|m| m.get("schema")))
    };
    direct
        .or_else(from_content)
        .and_then(|schema| schema.get("$ref"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn has_version_field(value: &Value) -> bool {
    ["openapi", "swagger"].iter().any(|key| match value.get(key) {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    })
}

/// Parses JSON bytes as an OpenAPI/Swagger document.
pub fn parse_openapi_json(body: &[u8]) -> Result<ApiDoc> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiDocError::malformed(Format::Json, e))?;
    parse_openapi_value(value, Format::Json)
}

/// Normalizes an already-parsed JSON tree. YAML input arrives here too, with
/// `source` naming the format the tree was read from.
pub fn parse_openapi_value(value: Value, source: Format) -> Result<ApiDoc> {
    if !has_version_field(&value) {
        return Err(ApiDocError::NotOpenApiDocument);
    }

    let spec: OpenApiDocument =
        serde_json::from_value(value).map_err(|e| ApiDocError::malformed(source, e))?;

    let mut doc = ApiDoc::new(
        Format::Json.id_prefix(),
        spec.info.title.clone(),
        spec.info.description.clone(),
        spec.info.version.clone(),
    );

    for (path, item) in &spec.paths {
        for (method, operation) in item.operations() {
            doc.push_endpoint(convert_operation(path, method, operation));
        }
    }

    info!(
        format = %source,
        version = spec.spec_version(),
        title = %doc.title,
        endpoints = doc.endpoints.len(),
        "Parsed OpenAPI document"
    );
    Ok(doc)
}

fn convert_operation(path: &str, method: HttpMethod, operation: &Operation) -> ApiEndpoint {
    let mut endpoint = ApiEndpoint::new(method, path);
    endpoint.summary = operation.summary.clone();
    endpoint.description = operation.description.clone();

    endpoint.parameters = operation
        .parameters
        .iter()
        .map(|param| ApiParameter {
            name: param.name.clone(),
            location: location_of(&param.location),
            required: param.required,
            param_type: param.resolved_type(),
            description: param.description.clone(),
        })
        .collect();

    endpoint.responses = operation
        .responses
        .iter()
        .map(|(code, response)| ApiResponse {
            status_code: parse_status_code(code),
            description: response
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            schema: schema_ref(response),
        })
        .collect();

    endpoint
}
