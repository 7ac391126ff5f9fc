use crate::har::QueryParam;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except the RFC 3986 unreserved characters gets escaped.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Append query params to a base URL as `&name=value` pairs.
///
/// Every pair is prefixed with `&`, the first one included. The caller is
/// expected to hand in a base URL that already ends its path with `?`.
pub fn compose_url(base: &str, params: &[QueryParam]) -> String {
    let mut url = String::from(base);

    for param in params {
        url.push('&');
        url.extend(utf8_percent_encode(&param.name, QUERY_ESCAPE));
        url.push('=');
        url.extend(utf8_percent_encode(&param.value, QUERY_ESCAPE));
    }

    url
}
