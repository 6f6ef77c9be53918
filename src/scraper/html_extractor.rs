//! Heuristic endpoint mining for free-form HTML documentation.
//!
//! Two independent passes run over the parsed page:
//! - **headings**: `h1`–`h6` that look like endpoint titles, with parameter
//!   tables and status codes picked up from the section that follows
//! - **code blocks**: request lines such as `GET /users HTTP/1.1`
//!
//! Results are merged by (method, path), first occurrence wins. Extraction
//! never fails: unrecognized markup yields a document with no endpoints.

use crate::models::{ApiDoc, ApiEndpoint, ApiParameter, ApiResponse, HttpMethod, ParameterLocation};
use crate::parser::Format;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

const HEADINGS: &str = "h1, h2, h3, h4, h5, h6";
const CODE_BLOCKS: &str = "pre, code, .code";
const ENDPOINT_KEYWORDS: [&str; 4] = ["api", "endpoint", "route", "request"];
const SCANNED_STATUS_CODES: [i32; 7] = [200, 201, 400, 401, 403, 404, 500];
const MAX_DESCRIPTION_CHARS: usize = 200;

/// Extracts a canonical document from an HTML page.
pub fn extract(html: &str) -> ApiDoc {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut doc = ApiDoc::new(
        Format::Html.id_prefix(),
        extract_title(root),
        extract_description(root),
        "Unknown".to_string(),
    );

    for endpoint in endpoints_from_headings(root) {
        doc.push_endpoint(endpoint);
    }
    let from_headings = doc.endpoints.len();

    for endpoint in endpoints_from_code_blocks(root) {
        doc.push_endpoint(endpoint);
    }

    info!(
        title = %doc.title,
        from_headings,
        from_code_blocks = doc.endpoints.len() - from_headings,
        "Extracted endpoints from HTML"
    );
    doc
}

fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => {
            warn!(selector = css, "Skipping invalid selector");
            Vec::new()
        }
    }
}

fn matches_selector(element: ElementRef<'_>, css: &str) -> bool {
    Selector::parse(css).is_ok_and(|selector| selector.matches(&element))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn is_heading(element: ElementRef<'_>) -> bool {
    matches!(element.value().name(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn extract_title(root: ElementRef<'_>) -> String {
    select_all(root, "title")
        .into_iter()
        .map(text_of)
        .find(|title| !title.is_empty())
        .unwrap_or_else(|| "Unknown API".to_string())
}

fn extract_description(root: ElementRef<'_>) -> String {
    let meta = select_all(root, r#"meta[name="description"]"#)
        .into_iter()
        .find_map(|meta| meta.value().attr("content").map(|c| c.trim().to_string()))
        .filter(|content| !content.is_empty());
    if let Some(content) = meta {
        return content;
    }

    let first_text = |css: &str| {
        select_all(root, css)
            .into_iter()
            .map(text_of)
            .find(|text| !text.is_empty())
    };
    let fallback = first_text("p").or_else(|| first_text("div")).unwrap_or_default();
    truncate_description(fallback)
}

fn truncate_description(text: String) -> String {
    if text.chars().count() <= MAX_DESCRIPTION_CHARS {
        return text;
    }
    let mut truncated: String = text.chars().take(MAX_DESCRIPTION_CHARS - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Whether a heading reads like an endpoint title.
fn is_endpoint_heading(text: &str) -> bool {
    let lower = text.to_lowercase();
    if ENDPOINT_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return true;
    }
    // substring match: "Posting a comment" counts as POST
    if HttpMethod::REQUEST_VERBS
        .iter()
        .any(|verb| lower.contains(&verb.as_str().to_lowercase()))
    {
        return true;
    }
    text.split_whitespace()
        .any(|token| token.contains('/') && (token.contains('{') || token.contains(':')))
}

/// Method (default GET) and path (default "Unknown") named by a heading.
fn method_and_path(text: &str) -> (HttpMethod, String) {
    let upper = text.to_uppercase();
    let method = HttpMethod::ALL
        .into_iter()
        .find(|verb| upper.contains(verb.as_str()))
        .unwrap_or(HttpMethod::Get);
    let path = text
        .split_whitespace()
        .find(|word| word.starts_with('/'))
        .unwrap_or("Unknown")
        .to_string();
    (method, path)
}

fn endpoints_from_headings(root: ElementRef<'_>) -> Vec<ApiEndpoint> {
    let mut endpoints = Vec::new();

    for heading in select_all(root, HEADINGS) {
        let text = text_of(heading);
        if text.is_empty() || !is_endpoint_heading(&text) {
            continue;
        }

        let (method, path) = method_and_path(&text);
        let mut endpoint = ApiEndpoint::new(method, path);
        endpoint.summary = text;

        let mut siblings = heading.next_siblings().filter_map(ElementRef::wrap).peekable();
        endpoint.description = siblings.peek().map(|next| text_of(*next)).unwrap_or_default();

        let section: Vec<ElementRef<'_>> = siblings.take_while(|el| !is_heading(*el)).collect();
        endpoint.parameters = parameters_from_tables(&section, &endpoint.path);
        endpoint.responses = responses_from_code(&section);

        debug!(
            method = %endpoint.method,
            path = %endpoint.path,
            parameters = endpoint.parameters.len(),
            responses = endpoint.responses.len(),
            "Parsed endpoint heading"
        );
        endpoints.push(endpoint);
    }

    endpoints
}

/// Rows of every table in the section; the first row overall is the header.
fn parameters_from_tables(section: &[ElementRef<'_>], path: &str) -> Vec<ApiParameter> {
    section
        .iter()
        .flat_map(|el| select_all(*el, "tr"))
        .skip(1)
        .filter_map(|row| {
            let cells = select_all(row, "td");
            if cells.len() < 2 {
                return None;
            }
            let name = text_of(cells[0]);
            let in_path = path.contains(&format!("{{{}}}", name)) || path.contains(&format!(":{}", name));
            Some(ApiParameter {
                location: if in_path {
                    ParameterLocation::Path
                } else {
                    ParameterLocation::Query
                },
                required: in_path,
                param_type: "string".to_string(),
                description: text_of(cells[1]),
                name,
            })
        })
        .collect()
}

fn responses_from_code(section: &[ElementRef<'_>]) -> Vec<ApiResponse> {
    let mut responses: Vec<ApiResponse> = Vec::new();

    for el in section {
        let mut blocks = Vec::new();
        if matches_selector(*el, CODE_BLOCKS) {
            blocks.push(*el);
        }
        blocks.extend(select_all(*el, CODE_BLOCKS));

        for block in blocks {
            let text = text_of(block);
            for code in SCANNED_STATUS_CODES {
                let seen = responses.iter().any(|r| r.status_code == code);
                if !seen && text.contains(&code.to_string()) {
                    responses.push(ApiResponse {
                        status_code: code,
                        description: status_description(code).to_string(),
                        schema: None,
                    });
                }
            }
        }
    }

    responses
}

fn endpoints_from_code_blocks(root: ElementRef<'_>) -> Vec<ApiEndpoint> {
    let mut endpoints: Vec<ApiEndpoint> = Vec::new();

    for block in select_all(root, CODE_BLOCKS) {
        let text: String = block.text().collect();
        for verb in HttpMethod::REQUEST_VERBS {
            for line in text.lines().filter(|line| line.contains(verb.as_str())) {
                let fields: Vec<&str> = line.split_whitespace().collect();
                if fields.len() < 2 {
                    continue;
                }
                let path = strip_scheme_and_host(fields[1]);
                if endpoints.iter().any(|e| e.same_route(verb, &path)) {
                    continue;
                }

                let mut endpoint = ApiEndpoint::new(verb, path);
                endpoint.summary = line.trim().to_string();
                endpoint.responses.push(ApiResponse {
                    status_code: 200,
                    description: "OK".to_string(),
                    schema: None,
                });
                endpoints.push(endpoint);
            }
        }
    }

    endpoints
}

/// `https://api.example.com/v1/users` → `/v1/users`
fn strip_scheme_and_host(candidate: &str) -> String {
    let rest = candidate
        .strip_prefix("http://")
        .or_else(|| candidate.strip_prefix("https://"))
        .unwrap_or(candidate);
    match rest.find('/') {
        Some(idx) if idx > 0 => rest[idx..].to_string(),
        _ => rest.to_string(),
    }
}

/// Reason phrase for the status codes the extractor knows about.
pub fn status_description(code: i32) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown Status Code",
    }
}
