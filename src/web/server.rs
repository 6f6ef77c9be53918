use crate::config::ServerConfig;
use crate::error::ApiDocError;
use crate::models::{ApiDoc, SubmitRequest};
use crate::parser::Format;
use crate::pipeline::DocPipeline;
use crate::scraper::HttpFetcher;
use crate::storage::{MemoryStorage, Storage};
use crate::web::rate_limiter::RateLimiter;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

const MAX_RAW_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// Shared by every route.
pub struct AppState {
    pub pipeline: DocPipeline,
    pub storage: Arc<dyn Storage>,
    pub limiter: RateLimiter,
}

#[derive(Debug, Deserialize)]
struct RawQuery {
    description: Option<String>,
    url: Option<String>,
    format: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn json_reply<T: Serialize>(body: &T, status: StatusCode) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(body), status)
}

fn error_reply(message: impl Into<String>, status: StatusCode) -> WithStatus<Json> {
    json_reply(
        &ErrorResponse {
            error: message.into(),
        },
        status,
    )
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Saves a freshly assembled document and renders the response.
fn store_and_reply(state: &AppState, result: crate::error::Result<ApiDoc>) -> WithStatus<Json> {
    let doc = match result {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "Extraction failed");
            return error_reply(
                format!("Failed to scrape API documentation: {}", e),
                StatusCode::INTERNAL_SERVER_ERROR,
            );
        }
    };

    if let Err(e) = state.storage.save(doc.clone()) {
        error!(error = %e, id = %doc.id, "Failed to save API doc");
        return error_reply(
            format!("Failed to save API documentation: {}", e),
            StatusCode::INTERNAL_SERVER_ERROR,
        );
    }

    info!(id = %doc.id, endpoints = doc.endpoints.len(), "Stored API doc");
    json_reply(&doc, StatusCode::OK)
}

async fn submit_doc(
    request: SubmitRequest,
    state: Arc<AppState>,
) -> Result<WithStatus<Json>, Rejection> {
    let url = request.url.trim();
    if url.is_empty() {
        return Ok(error_reply("URL is required", StatusCode::BAD_REQUEST));
    }

    if !state.limiter.allow(url) {
        return Ok(error_reply(
            "Rate limit exceeded for this domain. Please try again later.",
            StatusCode::TOO_MANY_REQUESTS,
        ));
    }

    let result = state
        .pipeline
        .ingest_url(url, request.description.as_deref())
        .await;
    Ok(store_and_reply(&state, result))
}

async fn submit_raw_doc(
    content_type: Option<String>,
    query: RawQuery,
    body: Bytes,
    state: Arc<AppState>,
) -> Result<WithStatus<Json>, Rejection> {
    let source_url = query.url.as_deref().unwrap_or_default();
    let description = query.description.as_deref();

    let result = match query.format.as_deref().map(str::parse::<Format>) {
        Some(Err(e)) => return Ok(error_reply(e.to_string(), StatusCode::BAD_REQUEST)),
        Some(Ok(format)) => state
            .pipeline
            .ingest_with_format(format, &body, source_url, description),
        None => state.pipeline.ingest_bytes(
            content_type.as_deref().unwrap_or_default(),
            &body,
            source_url,
            description,
        ),
    };
    Ok(store_and_reply(&state, result))
}

async fn list_docs(state: Arc<AppState>) -> Result<WithStatus<Json>, Rejection> {
    Ok(match state.storage.list_all() {
        Ok(docs) => json_reply(&docs, StatusCode::OK),
        Err(e) => error_reply(
            format!("Failed to get API docs: {}", e),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    })
}

async fn get_doc(id: String, state: Arc<AppState>) -> Result<WithStatus<Json>, Rejection> {
    Ok(match state.storage.get(&id) {
        Ok(doc) => json_reply(&doc, StatusCode::OK),
        Err(e @ ApiDocError::NotFound(_)) => error_reply(e.to_string(), StatusCode::NOT_FOUND),
        Err(e) => error_reply(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR),
    })
}

/// All routes of the service.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health_route = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "ok"})));

    let submit_route = warp::path!("api" / "v1" / "docs")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(submit_doc);

    let submit_raw_route = warp::path!("api" / "v1" / "docs" / "raw")
        .and(warp::post())
        .and(warp::header::optional::<String>("content-type"))
        .and(warp::query::<RawQuery>())
        .and(warp::body::content_length_limit(MAX_RAW_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_state(state.clone()))
        .and_then(submit_raw_doc);

    let list_route = warp::path!("api" / "v1" / "docs")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(list_docs);

    let get_route = warp::path!("api" / "v1" / "docs" / String)
        .and(warp::get())
        .and(with_state(state))
        .and_then(get_doc);

    health_route
        .or(submit_raw_route)
        .or(submit_route)
        .or(list_route)
        .or(get_route)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_methods(vec!["GET", "POST"])
                .allow_headers(vec!["content-type"]),
        )
        .with(warp::trace::request())
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    config.validate()?;

    let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);
    let state = Arc::new(AppState {
        pipeline: DocPipeline::new(fetcher).with_html_fallback(config.html_fallback),
        storage: Arc::new(MemoryStorage::new()),
        limiter: RateLimiter::new(config.rate_limit),
    });

    let (addr, server) = warp::serve(routes(state))
        .try_bind_with_graceful_shutdown(config.socket_addr(), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
        })?;

    info!(%addr, html_fallback = config.html_fallback, "Server running");
    server.await;
    info!("Server stopped");

    Ok(())
}
