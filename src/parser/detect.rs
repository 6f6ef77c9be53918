//! Content-type and content sniffing

use super::Format;

/// Picks the extraction strategy for a document.
///
/// The content-type hint wins when it names a format; otherwise the body is
/// sniffed. HTML is the terminal fallback, so this never fails.
pub fn detect(content_type: &str, body: &[u8]) -> Format {
    if let Some(format) = format_from_hint(content_type) {
        return format;
    }

    let text = String::from_utf8_lossy(body);
    if looks_like_json(&text) {
        Format::Json
    } else if looks_like_yaml(&text) {
        Format::Yaml
    } else {
        Format::Html
    }
}

/// Ordered strategies a caller may try for this document.
pub fn candidate_formats(content_type: &str, body: &[u8]) -> Vec<Format> {
    detect(content_type, body).fallback_chain().to_vec()
}

fn format_from_hint(content_type: &str) -> Option<Format> {
    let hint = content_type.to_ascii_lowercase();
    if hint.contains("json") {
        Some(Format::Json)
    } else if hint.contains("yaml") || hint.contains("yml") {
        Some(Format::Yaml)
    } else if hint.contains("html") {
        Some(Format::Html)
    } else {
        None
    }
}

fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim();
    (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
}

fn looks_like_yaml(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with(['{', '[', '<', '#']))
        .any(has_mapping_colon)
}

/// A `:` that is not closing a quoted JSON key or a brace.
fn has_mapping_colon(line: &str) -> bool {
    let mut prev: Option<char> = None;
    for c in line.chars() {
        if c == ':' && prev.is_some_and(|p| !matches!(p, '"' | '\'' | '{' | '}')) {
            return true;
        }
        prev = Some(c);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_routes_to_format() {
        assert_eq!(detect("application/json", b""), Format::Json);
        assert_eq!(detect("application/vnd.oai.openapi+json; charset=utf-8", b""), Format::Json);
        assert_eq!(detect("application/x-yaml", b""), Format::Yaml);
        assert_eq!(detect("text/yml", b""), Format::Yaml);
        assert_eq!(detect("text/html; charset=utf-8", b""), Format::Html);
    }

    #[test]
    fn test_hint_beats_content() {
        assert_eq!(detect("text/html", br#"{"openapi": "3.0.0"}"#), Format::Html);
    }

    #[test]
    fn test_sniff_json() {
        assert_eq!(detect("", br#"{"name": "test"}"#), Format::Json);
        assert_eq!(detect("text/plain", b"  [1, 2, 3]\n"), Format::Json);
    }

    #[test]
    fn test_sniff_yaml() {
        assert_eq!(detect("", b"name: test"), Format::Yaml);
        assert_eq!(detect("text/plain", b"foo: bar\nbaz: qux"), Format::Yaml);
        assert_eq!(detect("", b"# comment\nopenapi: 3.0.0\n"), Format::Yaml);
    }

    #[test]
    fn test_sniff_falls_back_to_html() {
        assert_eq!(detect("", b"<html></html>"), Format::Html);
        assert_eq!(detect("", b"<a href=\"https://example.com\">x</a>"), Format::Html);
        assert_eq!(detect("", b""), Format::Html);
        assert_eq!(detect("application/octet-stream", b"plain words only"), Format::Html);
    }

    #[test]
    fn test_json_shaped_colons_are_not_yaml() {
        assert!(!looks_like_yaml(r#"{"name": "test"}"#));
        assert!(!looks_like_yaml("\"key\": 1"));
        assert!(looks_like_yaml("key: 1"));
    }

    #[test]
    fn test_detect_is_deterministic() {
        let body = b"openapi: 3.0.0\ninfo:\n  title: x\n";
        let first = detect("", body);
        for _ in 0..10 {
            assert_eq!(detect("", body), first);
        }
    }

    #[test]
    fn test_candidate_formats() {
        assert_eq!(
            candidate_formats("application/json", b"{}"),
            vec![Format::Json, Format::Html]
        );
        assert_eq!(candidate_formats("text/html", b""), vec![Format::Html]);
    }
}
