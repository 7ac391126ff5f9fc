//! The seam between the HAR mappers and whatever executes the HTTP request.

mod easy;

pub use easy::CurlTransport;

use crate::body::RequestBody;
use crate::capture::CaptureSink;
use std::time::Duration;

/// Request method as the transport understands it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Head,
    /// Any other token, uppercased
    Custom(String),
}

impl Method {
    pub fn parse(method: &str) -> Self {
        if method.eq_ignore_ascii_case("GET") {
            Method::Get
        } else if method.eq_ignore_ascii_case("POST") {
            Method::Post
        } else if method.eq_ignore_ascii_case("PUT") {
            Method::Put
        } else if method.eq_ignore_ascii_case("HEAD") {
            Method::Head
        } else {
            Method::Custom(method.to_ascii_uppercase())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Head => "HEAD",
            Method::Custom(m) => m.as_str(),
        }
    }
}

/// Everything needed to issue one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    pub method: Method,
    pub url: String,
    /// `"Name: value"` lines, in order
    pub headers: Vec<String>,
    pub body: RequestBody,
}

/// Cumulative timers reported by the transport, each measured from the
/// start of the transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransferTimes {
    pub name_lookup: Duration,
    pub connect: Duration,
    /// Zero when no TLS handshake took place
    pub app_connect: Duration,
    pub pre_transfer: Duration,
    pub start_transfer: Duration,
    pub total: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportFailure {
    pub code: i32,
    pub message: String,
}

/// Metadata the transport reports once the transfer is over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportOutcome {
    pub status: u32,
    pub effective_url: Option<String>,
    pub times: Option<TransferTimes>,
    /// Set when the transfer did not complete
    pub error: Option<TransportFailure>,
}

/// Executes a single request, pushing wire data into the sink as it flows.
///
/// Implementations must deliver every callback before returning. A failed
/// transfer is reported through [`TransportOutcome::error`] rather than an
/// `Err`, since whatever was captured up to that point is still recorded.
pub trait Transport {
    fn execute(&mut self, plan: &RequestPlan, sink: &mut CaptureSink) -> TransportOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("get"), Method::Get);
        assert_eq!(Method::parse("Post"), Method::Post);
        assert_eq!(Method::parse("PUT"), Method::Put);
        assert_eq!(Method::parse("head"), Method::Head);
        assert_eq!(Method::parse("patch"), Method::Custom("PATCH".into()));
        assert_eq!(Method::parse("propfind").as_str(), "PROPFIND");
    }
}
