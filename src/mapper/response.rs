use crate::capture::Capture;
use crate::config::Config;
use crate::decompress::{WindowMode, decompress};
use crate::har::{Response, Timings};
use crate::headers::{detect_content_headers, headers_from_text, status_lines};
use crate::transport::{TransferTimes, TransportOutcome};
use std::time::Duration;
use tracing::{debug, warn};

/// Fill `response` from the transport's report and the captured bytes.
///
/// Runs whether or not the transfer succeeded; whatever was captured is
/// recorded.
pub fn record_response(response: &mut Response, outcome: &TransportOutcome, capture: Capture, config: &Config) {
    let Capture { header_in, body_in, .. } = capture;

    response.status = i64::from(outcome.status);
    if let Some(url) = &outcome.effective_url {
        response.redirect_url = Some(url.clone());
    }
    if let Some(failure) = &outcome.error {
        response.error = Some(failure.message.clone());
    }

    record_headers(response, &header_in, config);

    let captured_size = body_in.len() as i64;
    let body = inflate_body(response.content_encoding.as_deref(), body_in);

    response.content.mime_type = response.content_type.clone();
    response.content.set_body(body);
    response.content.size = captured_size;
    response.body_size = captured_size;
}

fn record_headers(response: &mut Response, header_in: &[u8], config: &Config) {
    response.headers_size = header_in.len() as i64;
    response.headers = headers_from_text(header_in);

    let detected = detect_content_headers(&response.headers);
    response.content_type = detected.content_type;
    response.content_encoding = detected.content_encoding;

    let lines = status_lines(header_in);
    if let Some(last) = lines.last() {
        response.http_version = Some(last.http_version.clone());
        response.status_text = Some(last.reason.clone());
    }

    if config.verbose {
        response.headers_text = Some(String::from_utf8_lossy(header_in).into_owned());
        response.status_line = lines.first().map(|l| {
            format!("{} {} {}", l.http_version, l.status, l.reason)
                .trim_end()
                .to_string()
        });
    }
}

/// Undo the content encoding when possible. On any failure the captured
/// bytes are returned untouched.
fn inflate_body(content_encoding: Option<&str>, body: Vec<u8>) -> Vec<u8> {
    let Some(encoding) = content_encoding else {
        return body;
    };

    let mode = WindowMode::from_encoding(Some(encoding));
    if !mode.inflates() {
        warn!("Unrecognized Content-Encoding {:?}, keeping body as received", encoding);
        return body;
    }

    match decompress(&body, mode) {
        Ok(plain) => {
            debug!("Inflated {} byte(s) of {} into {}", body.len(), encoding, plain.len());
            plain
        }
        Err(err) => {
            warn!("Could not inflate {} body: {}", encoding, err);
            body
        }
    }
}

fn ms(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// HAR timing phases from cumulative transport timers.
pub fn timings_from(times: &TransferTimes) -> Timings {
    let connected = times.connect.max(times.app_connect);
    let ssl = if times.app_connect.is_zero() {
        -1.0
    } else {
        ms(times.app_connect.saturating_sub(times.connect))
    };

    Timings {
        blocked: Some(-1.0),
        dns: Some(ms(times.name_lookup)),
        connect: Some(ms(connected.saturating_sub(times.name_lookup))),
        ssl: Some(ssl),
        send: Some(ms(times.pre_transfer.saturating_sub(connected))),
        wait: Some(ms(times.start_transfer.saturating_sub(times.pre_transfer))),
        receive: Some(ms(times.total.saturating_sub(times.start_transfer))),
        comment: None,
    }
}
