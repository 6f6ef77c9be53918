use crate::parser::Format;
use thiserror::Error;

/// Errors raised while turning a document into an [`ApiDoc`](crate::models::ApiDoc).
#[derive(Error, Debug)]
pub enum ApiDocError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("failed to parse {format} input: {message}")]
    MalformedInput { format: Format, message: String },

    #[error("document does not appear to be an OpenAPI/Swagger document")]
    NotOpenApiDocument,

    #[error("HTTP request failed with status code: {status_code}")]
    Network { status_code: u16 },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API doc not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stable classification of an [`ApiDocError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedContentType,
    MalformedInput,
    NotOpenApiDocument,
    Network,
    Transport,
    NotFound,
    Storage,
    Io,
}

impl ApiDocError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiDocError::UnsupportedContentType(_) => ErrorKind::UnsupportedContentType,
            ApiDocError::MalformedInput { .. } => ErrorKind::MalformedInput,
            ApiDocError::NotOpenApiDocument => ErrorKind::NotOpenApiDocument,
            ApiDocError::Network { .. } => ErrorKind::Network,
            ApiDocError::Transport(_) => ErrorKind::Transport,
            ApiDocError::NotFound(_) => ErrorKind::NotFound,
            ApiDocError::Storage(_) => ErrorKind::Storage,
            ApiDocError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn malformed(format: Format, err: impl std::fmt::Display) -> Self {
        ApiDocError::MalformedInput {
            format,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiDocError>;
