use thiserror::Error;

/// Custom error types for the EPP client
#[derive(Error, Debug)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Frame error: {0}")]
    Frame(String),

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        /// Raw response payload kept for diagnostics.
        raw: Vec<u8>,
    },

    #[error("Empty response: a well-formed reply carried no result element")]
    EmptyResponse {
        /// Raw response payload kept for diagnostics.
        raw: Vec<u8>,
    },

    #[error("Protocol sequence error: {0}")]
    ProtocolSequence(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Error::Connection(msg.into())
    }

    /// Creates a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    /// Creates a new frame error
    pub fn frame(msg: impl Into<String>) -> Self {
        Error::Frame(msg.into())
    }

    /// Creates a new parse error carrying the offending payload
    pub fn parse(msg: impl Into<String>, raw: impl Into<Vec<u8>>) -> Self {
        Error::Parse {
            message: msg.into(),
            raw: raw.into(),
        }
    }

    /// Creates a new empty-response error carrying the offending payload
    pub fn empty_response(raw: impl Into<Vec<u8>>) -> Self {
        Error::EmptyResponse { raw: raw.into() }
    }

    /// Creates a new protocol sequence error
    pub fn sequence(msg: impl Into<String>) -> Self {
        Error::ProtocolSequence(msg.into())
    }

    /// Creates a new encode error
    pub fn encode(msg: impl Into<String>) -> Self {
        Error::Encode(msg.into())
    }

    /// Creates a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Attaches the raw payload to parse and empty-response errors raised by
    /// helpers that never saw the whole document
    pub fn with_raw(mut self, raw: &[u8]) -> Self {
        match &mut self {
            Error::Parse { raw: slot, .. } | Error::EmptyResponse { raw: slot }
                if slot.is_empty() =>
            {
                *slot = raw.to_vec();
            }
            _ => {}
        }
        self
    }

    /// Returns the raw payload attached to parse and empty-response errors
    pub fn raw_response(&self) -> Option<&[u8]> {
        match self {
            Error::Parse { raw, .. } | Error::EmptyResponse { raw } => Some(raw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::transport("test error");
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.to_string(), "Transport error: test error");
    }

    #[test]
    fn test_raw_response_attachment() {
        let err = Error::parse("bad xml", b"<epp".as_slice());
        assert_eq!(err.raw_response(), Some(b"<epp".as_slice()));

        let err = Error::empty_response(b"<epp/>".as_slice());
        assert_eq!(err.raw_response(), Some(b"<epp/>".as_slice()));

        assert!(Error::frame("short").raw_response().is_none());
    }
}
