//! One entry in, one transfer, one completed entry out.

use crate::capture::CaptureSink;
use crate::config::Config;
use crate::error::HarError;
use crate::har::{Entry, Response};
use crate::mapper::{plan_request, record_outgoing, record_response, timings_from};
use crate::transport::{Transport, TransportFailure};
use chrono::{SecondsFormat, Utc};
use std::time::Instant;
use tracing::{debug, warn};

/// Replay `entry` through `transport`, rewriting it in place.
///
/// Structural problems with the entry abort before anything is sent. A
/// failed transfer does not: the entry is still completed from whatever was
/// captured, and the failure is handed back for the exit code.
pub fn replay<T: Transport>(
    entry: &mut Entry,
    transport: &mut T,
    config: &Config,
) -> Result<Option<TransportFailure>, HarError> {
    if entry.request.is_none() {
        return Err(HarError::NoRequest);
    }
    entry.response = Some(Response::default());

    let plan = plan_request(entry)?;
    debug!("Planned {} {}", plan.method.as_str(), plan.url);

    let started = Utc::now();
    let clock = Instant::now();
    let mut sink = CaptureSink::new(config.verbose);
    let outcome = transport.execute(&plan, &mut sink);
    let elapsed = clock.elapsed();

    if let Some(failure) = &outcome.error {
        warn!("Transfer reported code {}: {}", failure.code, failure.message);
    }

    let mut capture = sink.finish();
    entry.debug_info = capture.diagnostics.take();
    record_outgoing(entry, &plan, &capture, config);
    if let Some(response) = entry.response.as_mut() {
        record_response(response, &outcome, capture, config);
    }

    entry.started_date_time = Some(started.to_rfc3339_opts(SecondsFormat::Millis, true));
    entry.timings = outcome.times.as_ref().map(timings_from);
    let total = outcome.times.map_or(elapsed, |t| t.total);
    entry.time = Some(total.as_nanos() as f64 / 1_000_000.0);

    Ok(outcome.error)
}
