//! HTTP Headers Utility
//!
//! Conversions between the caller's string map and `reqwest`'s `HeaderMap`,
//! plus masking for log output.

use crate::defaults;
use crate::error::AdapterError;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// Caller headers prepared for a multipart request.
#[derive(Debug, Clone, Default)]
pub struct MultipartHeaders {
    /// Headers to send alongside the form
    pub headers: HeaderMap,
    /// Caller-supplied `Content-Type` that the form boundary replaces
    pub replaced_content_type: Option<String>,
}

/// Convert caller headers into a `HeaderMap` for a multipart request.
///
/// Every caller header is kept except `Content-Type`: the multipart encoder
/// owns it because it carries the boundary. Invalid names or values are a
/// configuration error.
pub fn multipart_headers(
    caller: &HashMap<String, String>,
) -> Result<MultipartHeaders, AdapterError> {
    let mut out = MultipartHeaders::default();
    for (key, value) in caller {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            AdapterError::ConfigurationError(format!("Invalid header name '{key}': {e}"))
        })?;
        if name == CONTENT_TYPE {
            out.replaced_content_type = Some(value.clone());
            continue;
        }
        let value = HeaderValue::from_str(value).map_err(|e| {
            AdapterError::ConfigurationError(format!("Invalid header value for '{key}': {e}"))
        })?;
        out.headers.insert(name, value);
    }
    Ok(out)
}

/// Convert reqwest HeaderMap to HashMap<String, String>
///
/// Names come out lower-case. Invalid UTF-8 header values are filtered out;
/// repeated headers are joined with `", "`.
pub fn headermap_to_hashmap(headers: &HeaderMap) -> HashMap<String, String> {
    let mut map: HashMap<String, String> = HashMap::new();
    for (k, v) in headers {
        let Ok(v_str) = v.to_str() else {
            continue;
        };
        map.entry(k.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(v_str);
            })
            .or_insert_with(|| v_str.to_string());
    }
    map
}

/// Mask a secret, keeping a short prefix and suffix for correlation
pub fn mask_sensitive_value(value: &str) -> String {
    fn ends(s: &str, head: usize, tail: usize) -> (String, String) {
        let chars: Vec<char> = s.chars().collect();
        (
            chars[..head].iter().collect(),
            chars[chars.len() - tail..].iter().collect(),
        )
    }

    if let Some(token) = value.strip_prefix("Bearer ")
        && token.chars().count() > 8
    {
        let (head, tail) = ends(token, 4, 4);
        return format!("Bearer {head}...{tail}");
    }
    if value.chars().count() > 16 {
        let (head, tail) = ends(value, 6, 4);
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}

/// Render headers for logs with sensitive values masked
pub fn format_headers_for_logging(headers: &HashMap<String, String>) -> String {
    let mut entries: Vec<(String, String)> = headers
        .iter()
        .map(|(k, v)| {
            let lower = k.to_ascii_lowercase();
            let value = if defaults::logging::SENSITIVE_HEADERS.contains(&lower.as_str()) {
                mask_sensitive_value(v)
            } else {
                v.clone()
            };
            (k.clone(), value)
        })
        .collect();
    entries.sort();
    let map: serde_json::Map<String, serde_json::Value> = entries
        .into_iter()
        .map(|(k, v)| (k, serde_json::Value::String(v)))
        .collect();
    serde_json::Value::Object(map).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_headers_keep_caller_headers_and_drop_content_type() {
        let caller = HashMap::from([
            ("X-Tenant".to_string(), "acme".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), "Bearer abc".to_string()),
        ]);

        let prepared = multipart_headers(&caller).unwrap();
        assert_eq!(prepared.headers.get("x-tenant").unwrap(), "acme");
        assert_eq!(prepared.headers.get("authorization").unwrap(), "Bearer abc");
        assert!(prepared.headers.get(CONTENT_TYPE).is_none());
        assert_eq!(
            prepared.replaced_content_type.as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn multipart_headers_reject_invalid_names() {
        let caller = HashMap::from([("Invalid Header".to_string(), "v".to_string())]);
        let err = multipart_headers(&caller).unwrap_err();
        assert!(matches!(err, AdapterError::ConfigurationError(_)));
    }

    #[test]
    fn headermap_to_hashmap_joins_repeated_values() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        headers.insert("X-Trace", HeaderValue::from_static("t"));

        let map = headermap_to_hashmap(&headers);
        assert_eq!(map.get("set-cookie").unwrap(), "a=1, b=2");
        assert_eq!(map.get("x-trace").unwrap(), "t");
    }

    #[test]
    fn logging_masks_sensitive_headers() {
        let headers = HashMap::from([
            (
                "Authorization".to_string(),
                "Bearer sk-1234567890abcdef".to_string(),
            ),
            ("x-api-key".to_string(), "short".to_string()),
            ("accept".to_string(), "application/json".to_string()),
        ]);
        let rendered = format_headers_for_logging(&headers);
        assert!(rendered.contains("Bearer sk-1...cdef"));
        assert!(rendered.contains(r#""x-api-key":"***""#));
        assert!(rendered.contains(r#""accept":"application/json""#));
        assert!(!rendered.contains("1234567890"));
    }
}
