//! Project-specific utilities live here.

use axum::http::{header, HeaderMap};

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whether the caller wants a data (JSON/fragment) response instead of a full page:
/// an XMLHttpRequest marker, a JSON `Accept`, or an explicit `ajax` parameter.
pub fn wants_data(headers: &HeaderMap, ajax_param: bool) -> bool {
    if ajax_param {
        return true;
    }

    let xhr = headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"));
    let json = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    xhr || json
}

/// Parse an untrusted integer query value, falling back to `default` when absent or malformed.
pub fn int_param(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
