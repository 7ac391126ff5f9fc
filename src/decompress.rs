//! Content-Encoding inflate.

use flate2::{Decompress, FlushDecompress, Status};
use thiserror::Error;

const MAX_WBITS: u8 = 15;

/// Inflate configuration needed for a given `Content-Encoding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// gzip header and trailer
    Gzip,
    /// deflate wrapped in a zlib header
    Zlib,
    /// deflate without any wrapper
    RawDeflate,
    /// an encoding this tool cannot undo
    Unsupported,
    /// no encoding given
    None,
}

impl WindowMode {
    pub fn from_encoding(token: Option<&str>) -> Self {
        let Some(token) = token.map(str::trim) else {
            return WindowMode::None;
        };

        if token.eq_ignore_ascii_case("gzip") {
            WindowMode::Gzip
        } else if token.eq_ignore_ascii_case("deflate") {
            WindowMode::Zlib
        } else if token.eq_ignore_ascii_case("deflate-w-o-zlib") {
            WindowMode::RawDeflate
        } else {
            WindowMode::Unsupported
        }
    }

    /// Whether decompression should be attempted at all.
    pub fn inflates(self) -> bool {
        matches!(self, WindowMode::Gzip | WindowMode::Zlib | WindowMode::RawDeflate)
    }

    fn inflater(self) -> Option<Decompress> {
        match self {
            WindowMode::Gzip => Some(Decompress::new_gzip(MAX_WBITS)),
            WindowMode::Zlib => Some(Decompress::new_with_window_bits(true, MAX_WBITS)),
            WindowMode::RawDeflate => Some(Decompress::new_with_window_bits(false, MAX_WBITS)),
            WindowMode::Unsupported | WindowMode::None => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecompressError {
    #[error("{0:?} is not an inflatable window mode")]
    NotInflatable(WindowMode),

    #[error("data error: empty input")]
    EmptyInput,

    #[error("stream error: {0}")]
    Stream(#[from] flate2::DecompressError),

    #[error("premature end of stream after {consumed} of {total} bytes")]
    Truncated { consumed: u64, total: usize },

    #[error("stream ended after {consumed} of {total} bytes")]
    TrailingData { consumed: u64, total: usize },
}

/// Inflate `input` completely.
///
/// Succeeds only when the compressed stream reached its logical end and every
/// input byte was consumed.
pub fn decompress(input: &[u8], mode: WindowMode) -> Result<Vec<u8>, DecompressError> {
    let mut inflater = mode.inflater().ok_or(DecompressError::NotInflatable(mode))?;
    if input.is_empty() {
        return Err(DecompressError::EmptyInput);
    }

    let mut out = Vec::with_capacity(input.len() * 2 + 24);
    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }

        let consumed = inflater.total_in();
        let produced = inflater.total_out();
        let remaining = &input[consumed as usize..];

        match inflater.decompress_vec(remaining, &mut out, FlushDecompress::Finish)? {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                let stalled = inflater.total_in() == consumed && inflater.total_out() == produced;
                if stalled && out.len() < out.capacity() {
                    return Err(DecompressError::Truncated {
                        consumed: inflater.total_in(),
                        total: input.len(),
                    });
                }
            }
        }
    }

    if inflater.total_in() as usize != input.len() {
        return Err(DecompressError::TrailingData {
            consumed: inflater.total_in(),
            total: input.len(),
        });
    }

    Ok(out)
}
