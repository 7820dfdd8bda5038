//! Unified error type for all map operations.

/// Things that can go wrong when using the map.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid identifier token or logical name at construction time. This is
    /// the only failure that aborts anything; see the crate docs for the
    /// never-crash-on-persistence policy.
    Construction(String),
    /// Lookup of a key that is not in the mapping.
    KeyNotFound(String),
    /// File system problem (read, write, rename).
    Io(String),
    /// Failed to encode the mapping in its on-disk format.
    Encode(String),
    /// Failed to decode a file back into a mapping.
    Decode(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Construction(msg) => write!(f, "construction error: {msg}"),
            Error::KeyNotFound(key) => write!(f, "key not found: {key:?}"),
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Encode(msg) => write!(f, "encode error: {msg}"),
            Error::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() {
            Error::Decode(err.to_string())
        } else {
            Error::Encode(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
