use universal_apidocs::scraper::html_extractor;
use universal_apidocs::{HttpMethod, ParameterLocation};

const USERS_HTML: &str = include_str!("fixtures/users.html");

/// Layout with sub-headings between an endpoint and its details.
const SECTIONED_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Test API Documentation</title>
    <meta name="description" content="API documentation for testing">
</head>
<body>
    <h1>Test API</h1>
    <p>This is a test API for demonstration purposes.</p>
    <h2>API Endpoints</h2>
    <h3>GET /users</h3>
    <p>Returns a list of users.</p>
    <h4>Parameters</h4>
    <table>
        <tr><th>Name</th><th>Description</th></tr>
        <tr><td>limit</td><td>Maximum number of users to return</td></tr>
    </table>
    <h3>POST /users</h3>
    <p>Creates a new user.</p>
</body>
</html>"#;

#[test]
fn test_endpoint_headings_with_tables_and_status_codes() {
    let doc = html_extractor::extract(USERS_HTML);

    assert!(doc.id.starts_with("html-"));
    assert_eq!(doc.title, "Users Service");
    assert_eq!(doc.description, "Reference for the users service");
    assert_eq!(doc.version, "Unknown");

    let get = doc.find_endpoint(HttpMethod::Get, "/users").unwrap();
    assert_eq!(get.summary, "GET /users");
    assert_eq!(get.description, "Returns a list of users.");
    assert_eq!(get.parameters.len(), 1);
    assert_eq!(get.parameters[0].name, "limit");
    assert_eq!(get.parameters[0].location, ParameterLocation::Query);
    let codes: Vec<i32> = get.responses.iter().map(|r| r.status_code).collect();
    assert_eq!(codes, vec![200, 400]);

    let post = doc.find_endpoint(HttpMethod::Post, "/users").unwrap();
    assert_eq!(post.parameters.len(), 2);
    let codes: Vec<i32> = post.responses.iter().map(|r| r.status_code).collect();
    assert_eq!(codes, vec![201, 400]);
    assert_eq!(post.responses[0].description, "Created");
}

#[test]
fn test_path_parameters_are_required() {
    let doc = html_extractor::extract(USERS_HTML);
    let by_id = doc.find_endpoint(HttpMethod::Get, "/users/{id}").unwrap();

    assert_eq!(by_id.parameters.len(), 1);
    assert_eq!(by_id.parameters[0].location, ParameterLocation::Path);
    assert!(by_id.parameters[0].required);
    assert_eq!(by_id.responses.len(), 1);
    assert_eq!(by_id.responses[0].status_code, 404);
}

#[test]
fn test_heading_and_code_block_endpoint_is_kept_once() {
    let doc = html_extractor::extract(USERS_HTML);

    // GET /users/{id} appears as a heading and as a request line
    let matching = doc
        .endpoints
        .iter()
        .filter(|e| e.method == HttpMethod::Get && e.path == "/users/{id}")
        .count();
    assert_eq!(matching, 1);
    assert_eq!(doc.endpoints.len(), 3);

    // the heading pass ran first, so its richer entry wins
    let by_id = doc.find_endpoint(HttpMethod::Get, "/users/{id}").unwrap();
    assert_eq!(by_id.summary, "GET /users/{id}");
}

#[test]
fn test_sub_headings_end_the_section() {
    let doc = html_extractor::extract(SECTIONED_HTML);

    assert_eq!(doc.title, "Test API Documentation");
    assert_eq!(doc.description, "API documentation for testing");

    let get = doc.find_endpoint(HttpMethod::Get, "/users").unwrap();
    assert_eq!(get.description, "Returns a list of users.");
    assert!(get.parameters.is_empty());
    assert!(doc.find_endpoint(HttpMethod::Post, "/users").is_some());

    // "Test API" and "API Endpoints" both collapse into GET Unknown
    let unknown = doc.find_endpoint(HttpMethod::Get, "Unknown").unwrap();
    assert_eq!(unknown.summary, "Test API");
    assert_eq!(doc.endpoints.len(), 3);
}

#[test]
fn test_request_lines_in_code_blocks() {
    let html = r#"<html><body>
        <pre>
curl example
POST https://api.example.com/v2/orders HTTP/1.1
DELETE /v2/orders/42
        </pre>
    </body></html>"#;
    let doc = html_extractor::extract(html);

    assert_eq!(doc.title, "Unknown API");
    let post = doc.find_endpoint(HttpMethod::Post, "/v2/orders").unwrap();
    assert_eq!(post.summary, "POST https://api.example.com/v2/orders HTTP/1.1");
    assert_eq!(post.responses[0].status_code, 200);
    assert!(doc.find_endpoint(HttpMethod::Delete, "/v2/orders/42").is_some());
}

#[test]
fn test_page_without_endpoints_still_extracts() {
    let doc = html_extractor::extract("<html><body><div>Just a blog post.</div></body></html>");
    assert_eq!(doc.title, "Unknown API");
    assert_eq!(doc.description, "Just a blog post.");
    assert!(doc.endpoints.is_empty());
}
