use thiserror::Error;

/// Base of the exit-code range owned by this tool. Transport status codes
/// live below it and may be propagated as-is.
pub const EXIT_CODE_BASE: u8 = 0x80;

/// Errors that abort a replay and become the process exit code.
#[derive(Debug, Error)]
pub enum HarError {
    #[error("The request is missing")]
    NoRequest,

    #[error("The response is missing")]
    NoResponse,

    #[error("The method is missing")]
    NoMethod,

    #[error("The url property is missing, or was impossible to reconstruct with the information given")]
    NoUrl,

    #[error("Both text and params were given in request.postData; use one or the other")]
    TextAndParamsConflict,

    #[error("Header #{index} is missing its {missing}")]
    MalformedHeader { index: usize, missing: &'static str },

    #[error("Transport failed with code {code}: {message}")]
    Transport { code: i32, message: String },

    #[error("No HAR entry could be decoded from the input")]
    MalformedJson(#[source] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HarError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            HarError::Io(_) => EXIT_CODE_BASE,
            HarError::NoRequest => EXIT_CODE_BASE + 1,
            HarError::NoResponse => EXIT_CODE_BASE + 2,
            HarError::NoMethod => EXIT_CODE_BASE + 3,
            HarError::NoUrl => EXIT_CODE_BASE + 4,
            HarError::TextAndParamsConflict => EXIT_CODE_BASE + 5,
            HarError::Transport { code, .. } => match u8::try_from(*code) {
                Ok(code @ 1..=127) => code,
                _ => EXIT_CODE_BASE + 6,
            },
            HarError::MalformedHeader { .. } => EXIT_CODE_BASE + 8,
            HarError::MalformedJson(_) => EXIT_CODE_BASE + 9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_codes_start_above_transport_range() {
        assert_eq!(HarError::NoRequest.exit_code(), 129);
        assert_eq!(HarError::NoResponse.exit_code(), 130);
        assert_eq!(HarError::NoMethod.exit_code(), 131);
        assert_eq!(HarError::NoUrl.exit_code(), 132);
        assert_eq!(HarError::TextAndParamsConflict.exit_code(), 133);
    }

    #[test]
    fn test_transport_code_is_propagated_when_in_range() {
        let err = HarError::Transport { code: 7, message: "couldn't connect".into() };
        assert_eq!(err.exit_code(), 7);

        let err = HarError::Transport { code: 0, message: String::new() };
        assert_eq!(err.exit_code(), 134);

        let err = HarError::Transport { code: 300, message: String::new() };
        assert_eq!(err.exit_code(), 134);
    }

    #[test]
    fn test_malformed_json_code() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(HarError::MalformedJson(err).exit_code(), 137);
    }
}
