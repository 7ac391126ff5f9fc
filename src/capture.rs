//! Byte accumulators fed by transport callbacks while a transfer runs.

/// Kind of data handed to the diagnostic callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugKind {
    Text,
    HeaderIn,
    HeaderOut,
    DataIn,
    DataOut,
    Other,
}

/// Collects everything one transaction sends and receives.
///
/// Lives for a single transfer and is consumed by [`CaptureSink::finish`].
#[derive(Debug, Default)]
pub struct CaptureSink {
    verbose: bool,
    header_out: Vec<u8>,
    body_out: Vec<u8>,
    header_in: Vec<u8>,
    body_in: Vec<u8>,
    diagnostics: Vec<String>,
}

/// What a finished transfer left behind.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Capture {
    pub header_out: Vec<u8>,
    pub body_out: Vec<u8>,
    pub header_in: Vec<u8>,
    pub body_in: Vec<u8>,
    /// Present in verbose mode only
    pub diagnostics: Option<Vec<String>>,
}

impl CaptureSink {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Default::default()
        }
    }

    /// Diagnostic callback: outgoing headers and body, plus trace text.
    ///
    /// Incoming data is taken from [`on_header`](Self::on_header) and
    /// [`on_write`](Self::on_write) instead.
    pub fn on_debug(&mut self, kind: DebugKind, data: &[u8]) {
        match kind {
            DebugKind::Text if self.verbose => {
                let line = String::from_utf8_lossy(data);
                self.diagnostics.push(line.trim_end_matches(['\r', '\n']).to_string());
            }
            DebugKind::HeaderOut => self.header_out.extend_from_slice(data),
            DebugKind::DataOut => self.body_out.extend_from_slice(data),
            _ => {}
        }
    }

    /// Response header callback, one header line per call.
    pub fn on_header(&mut self, data: &[u8]) {
        self.header_in.extend_from_slice(data);
    }

    /// Response body callback. Returns the number of bytes taken.
    pub fn on_write(&mut self, data: &[u8]) -> usize {
        self.body_in.extend_from_slice(data);
        data.len()
    }

    pub fn finish(self) -> Capture {
        Capture {
            header_out: self.header_out,
            body_out: self.body_out,
            header_in: self.header_in,
            body_in: self.body_in,
            diagnostics: self.verbose.then_some(self.diagnostics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_in_order() {
        let mut sink = CaptureSink::new(false);
        sink.on_debug(DebugKind::HeaderOut, b"GET / HTTP/1.1\r\n");
        sink.on_debug(DebugKind::HeaderOut, b"Host: x.test\r\n\r\n");
        sink.on_header(b"HTTP/1.1 200 OK\r\n");
        sink.on_header(b"Content-Length: 4\r\n");
        assert_eq!(sink.on_write(b"ab"), 2);
        assert_eq!(sink.on_write(b"cd"), 2);

        let capture = sink.finish();
        assert_eq!(capture.header_out, b"GET / HTTP/1.1\r\nHost: x.test\r\n\r\n");
        assert_eq!(capture.header_in, b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n");
        assert_eq!(capture.body_in, b"abcd");
        assert!(capture.body_out.is_empty());
    }

    #[test]
    fn test_diagnostics_only_when_verbose() {
        let mut sink = CaptureSink::new(false);
        sink.on_debug(DebugKind::Text, b"Connected to x.test\n");
        assert_eq!(sink.finish().diagnostics, None);

        let mut sink = CaptureSink::new(true);
        sink.on_debug(DebugKind::Text, b"Connected to x.test\n");
        sink.on_debug(DebugKind::Text, b"Closing connection\r\n");
        assert_eq!(
            sink.finish().diagnostics,
            Some(vec!["Connected to x.test".to_string(), "Closing connection".to_string()])
        );
    }

    #[test]
    fn test_incoming_debug_data_is_ignored() {
        let mut sink = CaptureSink::new(true);
        sink.on_debug(DebugKind::HeaderIn, b"HTTP/1.1 200 OK\r\n");
        sink.on_debug(DebugKind::DataIn, b"body");
        sink.on_debug(DebugKind::DataOut, b"a=1");

        let capture = sink.finish();
        assert!(capture.header_in.is_empty());
        assert!(capture.body_in.is_empty());
        assert_eq!(capture.body_out, b"a=1");
    }
}
