use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP verbs an endpoint can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// All recognized verbs, in the order heading text is scanned.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
    ];

    /// Verbs looked for inside request examples.
    pub const REQUEST_VERBS: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown HTTP method: {}", s))
    }
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
    Body,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiParameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// `0` stands for the OpenAPI `default` response or a code that did not parse.
    pub status_code: i32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub path: String,
    pub method: HttpMethod,
    pub summary: String,
    pub description: String,
    pub parameters: Vec<ApiParameter>,
    pub responses: Vec<ApiResponse>,
}

impl ApiEndpoint {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            summary: String::new(),
            description: String::new(),
            parameters: Vec::new(),
            responses: Vec::new(),
        }
    }

    pub fn same_route(&self, method: HttpMethod, path: &str) -> bool {
        self.method == method && self.path == path
    }
}

/// Canonical description of one API, whatever format it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDoc {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub version: String,
    pub endpoints: Vec<ApiEndpoint>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApiDoc {
    /// Creates a document with a fresh identifier of the form `{prefix}-{uuid}`.
    pub fn new(prefix: &str, title: String, description: String, version: String) -> Self {
        let now = Utc::now();
        Self {
            id: format!("{}-{}", prefix, uuid::Uuid::new_v4().simple()),
            url: String::new(),
            title,
            description,
            version,
            endpoints: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends the endpoint unless one with the same method and path exists.
    /// Returns whether it was added.
    pub fn push_endpoint(&mut self, endpoint: ApiEndpoint) -> bool {
        if self.find_endpoint(endpoint.method, &endpoint.path).is_some() {
            return false;
        }
        self.endpoints.push(endpoint);
        true
    }

    pub fn find_endpoint(&self, method: HttpMethod, path: &str) -> Option<&ApiEndpoint> {
        self.endpoints.iter().find(|e| e.same_route(method, path))
    }
}

/// Body of a documentation submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}
