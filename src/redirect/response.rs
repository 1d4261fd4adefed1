//! Redirect response construction.
//!
//! # Responsibilities
//! - Build the 302 Found response for a matched path
//! - Resolve relative destinations against the request path
//! - Keep the `Location` header valid for any destination string
//!
//! # Design Decisions
//! - Destinations with a scheme or authority are never rewritten, nor are
//!   strings that do not parse as a URI reference
//! - Relative destinations are joined to the request's directory and cleaned
//! - GET receives a tiny HTML body so clients without redirect support still
//!   see the link; other methods get an empty body

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, StatusCode},
    response::Response,
};
use percent_encoding::{utf8_percent_encode, CONTROLS};

/// Build a `302 Found` response pointing at `destination`.
///
/// `request_path` is the decoded path the destination was looked up with.
pub fn found(method: &Method, request_path: &str, destination: &str) -> Response {
    let location = resolve_location(request_path, destination);

    let body = if method == Method::GET {
        Body::from(format!("<a href=\"{}\">Found</a>.\n", escape_html(&location)))
    } else {
        Body::empty()
    };

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::FOUND;

    let header_value = utf8_percent_encode(&location, CONTROLS).to_string();
    match HeaderValue::from_str(&header_value) {
        Ok(value) => {
            response.headers_mut().insert(header::LOCATION, value);
        }
        Err(e) => {
            tracing::warn!(location = %header_value, error = %e, "Unrepresentable redirect location");
        }
    }

    if method == Method::GET || method == Method::HEAD {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
    }

    response
}

/// Resolve a configured destination into the value sent as `Location`.
///
/// Destinations with a scheme, network-path references and strings that are
/// not well-formed URI references pass through untouched. Anything else is a
/// path relative to the directory of `request_path`, cleaned of `.` and `..`
/// segments.
pub fn resolve_location(request_path: &str, destination: &str) -> String {
    if destination.starts_with("//") || has_scheme(destination) || !is_relative_reference(destination) {
        return destination.to_string();
    }

    let joined = if destination.starts_with('/') {
        destination.to_string()
    } else {
        let current = if request_path.is_empty() { "/" } else { request_path };
        let dir = match current.rfind('/') {
            Some(idx) => &current[..=idx],
            None => "",
        };
        format!("{}{}", dir, destination)
    };

    let (path, query) = match joined.find('?') {
        Some(idx) => joined.split_at(idx),
        None => (joined.as_str(), ""),
    };

    let mut cleaned = clean_path(path);
    if path.ends_with('/') && !cleaned.ends_with('/') {
        cleaned.push('/');
    }
    cleaned.push_str(query);
    cleaned
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"` prefix.
fn has_scheme(destination: &str) -> bool {
    let Some(colon) = destination.find(':') else {
        return false;
    };
    let scheme = &destination[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

/// Whether a scheme-less destination parses as a relative reference: no
/// control bytes, well-formed `%XX` escapes, and no `:` in the first path
/// segment.
fn is_relative_reference(destination: &str) -> bool {
    let bytes = destination.as_bytes();
    if bytes.iter().any(|b| *b < 0x20 || *b == 0x7f) {
        return false;
    }

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let end = destination.find(['/', '?', '#']).unwrap_or(destination.len());
    !destination[..end].contains(':')
}

/// Lexically normalise a slash-separated path.
fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_sets_location() {
        let response = found(&Method::GET, "/urlshort", "https://example.com");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://example.com");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }

    #[test]
    fn test_found_non_get_has_no_content_type() {
        let response = found(&Method::POST, "/urlshort", "https://example.com");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://example.com");
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn test_found_body_escapes_html() {
        let response = found(&Method::GET, "/q", "https://example.com/?a=1&b=<2>");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        assert_eq!(
            &body[..],
            b"<a href=\"https://example.com/?a=1&amp;b=&lt;2&gt;\">Found</a>.\n"
        );
    }

    #[test]
    fn test_absolute_destinations_untouched() {
        assert_eq!(resolve_location("/a/b", "https://godoc.org/x/../y"), "https://godoc.org/x/../y");
        assert_eq!(resolve_location("/a/b", "//cdn.example.com/x"), "//cdn.example.com/x");
        assert_eq!(resolve_location("/a/b", "mailto:ops@example.com"), "mailto:ops@example.com");
    }

    #[test]
    fn test_relative_destinations_resolved() {
        assert_eq!(resolve_location("/a/b", "/x"), "/x");
        assert_eq!(resolve_location("/a/b", "c"), "/a/c");
        assert_eq!(resolve_location("/a/b", "../c"), "/c");
        assert_eq!(resolve_location("/a/b", "./c/"), "/a/c/");
        assert_eq!(resolve_location("/a/b", "/x/./y/../z?q=1"), "/x/z?q=1");
        assert_eq!(resolve_location("/a/b", ""), "/a/");
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("/../.."), "/");
        assert_eq!(clean_path("a//b/./c/.."), "a/b");
        assert_eq!(clean_path("../a"), "../a");
        assert_eq!(clean_path("a/.."), ".");
    }

    #[test]
    fn test_scheme_destinations_not_rewritten() {
        // Port out of range: not a valid URL, still an absolute one.
        assert_eq!(resolve_location("/a/b", "http://localhost:99999/x"), "http://localhost:99999/x");
        assert_eq!(resolve_location("/a/c", "https://exa mple.com/"), "https://exa mple.com/");
        assert_eq!(resolve_location("/a/b", "git+ssh://host/repo"), "git+ssh://host/repo");

        let response = found(&Method::GET, "/a/b", "http://localhost:99999/x");
        assert_eq!(response.headers()[header::LOCATION], "http://localhost:99999/x");
    }

    #[test]
    fn test_malformed_references_not_rewritten() {
        assert_eq!(resolve_location("/a/b", "bad%zzescape"), "bad%zzescape");
        assert_eq!(resolve_location("/a/b", "1host:80/x"), "1host:80/x");
        assert_eq!(resolve_location("/a/b", "tab\there"), "tab\there");
    }

    #[test]
    fn test_scheme_detection() {
        assert!(has_scheme("https://example.com"));
        assert!(has_scheme("mailto:ops@example.com"));
        assert!(!has_scheme("/a:b"));
        assert!(!has_scheme("1http://x"));
        assert!(!has_scheme("relative/path"));
    }

    #[tokio::test]
    async fn test_body_uses_unescaped_location() {
        let response = found(&Method::GET, "/", "https://example.com/caf\u{e9}?a&b");
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://example.com/caf%C3%A9?a&b"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            "<a href=\"https://example.com/caf\u{e9}?a&amp;b\">Found</a>.\n"
        );
    }

    #[test]
    fn test_header_escaping() {
        let response = found(&Method::GET, "/", "https://example.com/caf\u{e9}\r\nX: y");
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://example.com/caf%C3%A9%0D%0AX: y"
        );
    }
}
