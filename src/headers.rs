//! Conversions between HAR header pairs, transport header lines and raw
//! header text captured off the wire.

use crate::error::HarError;
use crate::har::Header;
use regex::Regex;
use std::sync::OnceLock;

/// `content-type` / `content-encoding` values found while scanning a header list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentHeaders {
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
}

/// A response status line, e.g. `HTTP/1.1 404 Not Found`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub http_version: String,
    pub status: u16,
    pub reason: String,
}

/// Turn header pairs into `"name: value"` lines, preserving order.
pub fn to_transport_headers(pairs: &[Header]) -> Result<Vec<String>, HarError> {
    pairs
        .iter()
        .enumerate()
        .map(|(index, h)| {
            let name = h
                .name
                .as_deref()
                .ok_or(HarError::MalformedHeader { index, missing: "name" })?;
            let value = h
                .value
                .as_deref()
                .ok_or(HarError::MalformedHeader { index, missing: "value" })?;
            Ok(format!("{}: {}", name, value))
        })
        .collect()
}

/// Parse CRLF separated header text into pairs.
///
/// Lines without a colon (blank lines, status lines) are skipped. Exactly one
/// space after the colon is dropped from the value.
pub fn headers_from_text(raw: &[u8]) -> Vec<Header> {
    let text = String::from_utf8_lossy(raw);

    text.split("\r\n")
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| {
            let value = value.strip_prefix(' ').unwrap_or(value);
            Header::new(name, value)
        })
        .collect()
}

/// Scan a header list for content headers. A later duplicate overrides an
/// earlier one.
pub fn detect_content_headers(pairs: &[Header]) -> ContentHeaders {
    let mut found = ContentHeaders::default();

    for h in pairs {
        if h.is("content-encoding") {
            found.content_encoding = h.value.clone();
        }
        if h.is("content-type") {
            found.content_type = h.value.clone();
        }
    }

    found
}

/// Every status line in raw header text, in order of appearance.
pub fn status_lines(raw: &[u8]) -> Vec<StatusLine> {
    static STATUS_LINE: OnceLock<Regex> = OnceLock::new();
    let re = STATUS_LINE.get_or_init(|| {
        Regex::new(r"^(HTTP/[0-9.]+)\s+([0-9]{3})(?:\s+(.*))?$").expect("valid status line regex")
    });

    let text = String::from_utf8_lossy(raw);
    text.split("\r\n")
        .filter_map(|line| {
            let caps = re.captures(line)?;
            Some(StatusLine {
                http_version: caps[1].to_string(),
                status: caps[2].parse().ok()?,
                reason: caps.get(3).map_or("", |m| m.as_str()).to_string(),
            })
        })
        .collect()
}

/// First line of a header block, without its line terminator.
pub fn first_line(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let line = text.split("\r\n").next()?;
    (!line.is_empty()).then(|| line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_transport_headers_keeps_order() {
        let pairs = vec![
            Header::new("Accept", "*/*"),
            Header::new("X-Trace", "1"),
            Header::new("Accept", "text/html"),
        ];
        let lines = to_transport_headers(&pairs).unwrap();
        assert_eq!(lines, vec!["Accept: */*", "X-Trace: 1", "Accept: text/html"]);
    }

    #[test]
    fn test_to_transport_headers_missing_value() {
        let pairs = vec![
            Header::new("Accept", "*/*"),
            Header { name: Some("X-Broken".into()), ..Default::default() },
        ];
        let err = to_transport_headers(&pairs).unwrap_err();
        assert!(matches!(err, HarError::MalformedHeader { index: 1, missing: "value" }));
    }

    #[test]
    fn test_headers_from_text() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nX-Empty:\r\nX-Tight:v\r\nX-Time: 12:30\r\n\r\n";
        let headers = headers_from_text(raw);
        assert_eq!(
            headers,
            vec![
                Header::new("Content-Type", "text/plain"),
                Header::new("X-Empty", ""),
                Header::new("X-Tight", "v"),
                Header::new("X-Time", "12:30"),
            ]
        );
    }

    #[test]
    fn test_headers_from_text_strips_one_space_only() {
        let headers = headers_from_text(b"X-Pad:   three\r\n");
        assert_eq!(headers[0].value.as_deref(), Some("  three"));
    }

    #[test]
    fn test_round_trip() {
        let pairs = vec![
            Header::new("Set-Cookie", "a=1"),
            Header::new("Set-Cookie", "b=2"),
            Header::new("Cache-Control", "no-cache, no-store"),
        ];
        let text = to_transport_headers(&pairs).unwrap().join("\r\n");
        assert_eq!(headers_from_text(text.as_bytes()), pairs);
    }

    #[test]
    fn test_detect_content_headers_last_wins() {
        let pairs = vec![
            Header::new("content-type", "text/plain"),
            Header::new("Content-Encoding", "gzip"),
            Header::new("CONTENT-TYPE", "application/json"),
        ];
        let found = detect_content_headers(&pairs);
        assert_eq!(found.content_type.as_deref(), Some("application/json"));
        assert_eq!(found.content_encoding.as_deref(), Some("gzip"));
    }

    #[test]
    fn test_status_lines() {
        let raw = b"HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 404 Not Found\r\nServer: x\r\n\r\nHTTP/2 200\r\n";
        let lines = status_lines(raw);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].status, 404);
        assert_eq!(lines[1].reason, "Not Found");
        assert_eq!(lines[2].http_version, "HTTP/2");
        assert_eq!(lines[2].reason, "");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(
            first_line(b"GET / HTTP/1.1\r\nHost: x.test\r\n\r\n").as_deref(),
            Some("GET / HTTP/1.1")
        );
        assert_eq!(first_line(b""), None);
    }
}
