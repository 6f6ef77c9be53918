//! YAML → JSON tree conversion

use super::Format;
use super::openapi::parse_openapi_value;
use crate::error::{ApiDocError, Result};
use crate::models::ApiDoc;
use serde_json::{Map, Number, Value as JsonValue};
use serde_yaml::Value as YamlValue;

/// Parses YAML bytes as an OpenAPI/Swagger document by way of the JSON path.
pub fn parse_openapi_yaml(body: &[u8]) -> Result<ApiDoc> {
    let mut value: YamlValue =
        serde_yaml::from_slice(body).map_err(|e| ApiDocError::malformed(Format::Yaml, e))?;
    value
        .apply_merge()
        .map_err(|e| ApiDocError::malformed(Format::Yaml, e))?;
    parse_openapi_value(yaml_to_json(value), Format::Yaml)
}

/// Converts a YAML tree into the equivalent JSON tree.
///
/// Mapping keys that are not strings (`200:` is an integer in YAML) are
/// rendered as their scalar text so that the shape survives.
pub fn yaml_to_json(value: YamlValue) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => yaml_number(&n),
        YamlValue::String(s) => JsonValue::String(s),
        YamlValue::Sequence(items) => JsonValue::Array(items.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                object.insert(key_text(key), yaml_to_json(value));
            }
            JsonValue::Object(object)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> JsonValue {
    if let Some(i) = n.as_i64() {
        JsonValue::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        JsonValue::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            // .inf / .nan have no JSON number form
            .unwrap_or_else(|| JsonValue::String(n.to_string()))
    }
}

fn key_text(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        YamlValue::Tagged(tagged) => key_text(tagged.value),
        complex => serde_yaml::to_string(&complex)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
