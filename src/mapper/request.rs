use crate::body::{RequestBody, build_body};
use crate::capture::Capture;
use crate::config::Config;
use crate::error::HarError;
use crate::har::{Entry, PostData};
use crate::headers::{detect_content_headers, first_line, headers_from_text, to_transport_headers};
use crate::transport::{Method, RequestPlan};
use crate::url::compose_url;
use tracing::debug;

/// Validate an entry and turn its `request` into a transport plan.
///
/// Records the detected `content-type` / `content-encoding` on the request.
/// Nothing is sent when this fails.
pub fn plan_request(entry: &mut Entry) -> Result<RequestPlan, HarError> {
    let Entry { request, response, .. } = entry;
    let request = request.as_mut().ok_or(HarError::NoRequest)?;
    if response.is_none() {
        return Err(HarError::NoResponse);
    }

    let method = request.method.as_deref().map(Method::parse).ok_or(HarError::NoMethod)?;
    let base = request.url.as_deref().ok_or(HarError::NoUrl)?;
    let url = compose_url(base, &request.query_string);

    let detected = detect_content_headers(&request.headers);
    request.content_type = detected.content_type;
    request.content_encoding = detected.content_encoding;
    let headers = to_transport_headers(&request.headers)?;

    if let Some(mime_type) = request.post_data.as_ref().and_then(|p| p.mime_type.clone()) {
        debug!("request.postData.mimeType: {}", mime_type);
        request.content_type = Some(mime_type);
    }
    let body = build_body(request.post_data.as_ref())?;

    Ok(RequestPlan { method, url, headers, body })
}

/// Echo what actually went out on the wire back into `request`.
pub fn record_outgoing(entry: &mut Entry, plan: &RequestPlan, capture: &Capture, config: &Config) {
    let Some(request) = entry.request.as_mut() else {
        return;
    };

    request.headers_size = capture.header_out.len() as i64;
    request.body_size = capture.body_out.len() as i64;

    if !config.verbose {
        return;
    }

    request.headers_text = Some(String::from_utf8_lossy(&capture.header_out).into_owned());
    request.request_line = first_line(&capture.header_out);
    if !capture.header_out.is_empty() {
        request.headers = headers_from_text(&capture.header_out);
    }
    if plan.body != RequestBody::Empty || request.post_data.is_some() {
        request
            .post_data
            .get_or_insert_with(PostData::default)
            .size = Some(capture.body_out.len() as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::{Header, Response, parse_str};

    fn entry(json: &str) -> Entry {
        let mut entry = parse_str(json).unwrap();
        entry.response.get_or_insert_with(Response::default);
        entry
    }

    #[test]
    fn test_validation_order() {
        let mut e = parse_str(r#"{}"#).unwrap();
        assert!(matches!(plan_request(&mut e), Err(HarError::NoRequest)));

        let mut e = parse_str(r#"{"request": {"method": "GET", "url": "http://x.test/"}}"#).unwrap();
        assert!(matches!(plan_request(&mut e), Err(HarError::NoResponse)));

        let mut e = entry(r#"{"request": {"url": "http://x.test/"}}"#);
        assert!(matches!(plan_request(&mut e), Err(HarError::NoMethod)));

        let mut e = entry(r#"{"request": {"method": "GET"}}"#);
        assert!(matches!(plan_request(&mut e), Err(HarError::NoUrl)));
    }

    #[test]
    fn test_plan_custom_method_with_query() {
        let mut e = entry(
            r#"{"request": {
                "method": "delete",
                "url": "http://x.test/?",
                "queryString": [{"name": "a", "value": "b c"}],
                "headers": [{"name": "Accept", "value": "*/*"}, {"name": "Content-Type", "value": "text/csv"}]
            }}"#,
        );
        let plan = plan_request(&mut e).unwrap();
        assert_eq!(plan.method, Method::Custom("DELETE".into()));
        assert_eq!(plan.url, "http://x.test/?&a=b%20c");
        assert_eq!(plan.headers, vec!["Accept: */*", "Content-Type: text/csv"]);
        assert_eq!(plan.body, RequestBody::Empty);

        let request = e.request.unwrap();
        assert_eq!(request.content_type.as_deref(), Some("text/csv"));
        assert!(request.content_encoding.is_none());
    }

    #[test]
    fn test_post_data_mime_type_overrides_header() {
        let mut e = entry(
            r#"{"request": {
                "method": "POST",
                "url": "http://x.test/",
                "headers": [{"name": "Content-Type", "value": "text/plain"}],
                "postData": {"mimeType": "application/json", "text": "{}"}
            }}"#,
        );
        let plan = plan_request(&mut e).unwrap();
        assert_eq!(plan.body, RequestBody::Raw(b"{}".to_vec()));
        assert_eq!(e.request.unwrap().content_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_conflict_and_malformed_header_abort() {
        let mut e = entry(
            r#"{"request": {
                "method": "POST",
                "url": "http://x.test/",
                "postData": {"text": "x", "params": [{"name": "a", "value": "1"}]}
            }}"#,
        );
        assert!(matches!(plan_request(&mut e), Err(HarError::TextAndParamsConflict)));

        let mut e = entry(
            r#"{"request": {"method": "GET", "url": "http://x.test/", "headers": [{"value": "x"}]}}"#,
        );
        assert!(matches!(
            plan_request(&mut e),
            Err(HarError::MalformedHeader { index: 0, missing: "name" })
        ));
    }

    #[test]
    fn test_record_outgoing() {
        let mut e = entry(
            r#"{"request": {"method": "POST", "url": "http://x.test/", "postData": {"text": "a=1"}}}"#,
        );
        let plan = plan_request(&mut e).unwrap();
        let capture = Capture {
            header_out: b"POST / HTTP/1.1\r\nHost: x.test\r\nContent-Length: 3\r\n\r\n".to_vec(),
            body_out: b"a=1".to_vec(),
            ..Default::default()
        };

        let mut quiet = e.clone();
        record_outgoing(&mut quiet, &plan, &capture, &Config::default());
        let request = quiet.request.unwrap();
        assert_eq!(request.headers_size, capture.header_out.len() as i64);
        assert_eq!(request.body_size, 3);
        assert!(request.headers_text.is_none());
        assert!(request.headers.is_empty());
        assert_eq!(request.post_data.unwrap().size, None);

        let verbose = Config { verbose: true, ..Default::default() };
        record_outgoing(&mut e, &plan, &capture, &verbose);
        let request = e.request.unwrap();
        assert_eq!(request.request_line.as_deref(), Some("POST / HTTP/1.1"));
        assert_eq!(
            request.headers,
            vec![Header::new("Host", "x.test"), Header::new("Content-Length", "3")]
        );
        assert_eq!(request.post_data.unwrap().size, Some(3));
    }
}
