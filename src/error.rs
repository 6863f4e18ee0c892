use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Occurs when a values-column token stream cannot be interpreted: an unknown type
    /// tag, a column reference past the end of its column, a child count that exceeds
    /// the remaining stream, invalid UTF-8 in the string column, or nesting deeper than
    /// [`MAX_NESTING_DEPTH`](crate::MAX_NESTING_DEPTH). Fatal for that entry only; other
    /// entries in the cache remain readable.
    MalformedValue(String),
    /// Occurs when `read_shape` is handed a value index whose entry length does not
    /// match the shape's key count. The two indices were not produced as a pair.
    SchemaMismatch { expected: usize, actual: usize },
    /// Occurs when the wire layer runs out of bytes mid-field. Fatal for the whole
    /// decode of the cache.
    BufferOverrun { needed: usize, remaining: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::MalformedValue(ref err) => write!(f, "Malformed value: {}", err),
            Error::SchemaMismatch { expected, actual } => write!(
                f,
                "Shape expects {} values, but the value entry holds {}",
                expected, actual
            ),
            Error::BufferOverrun { needed, remaining } => write!(
                f,
                "Buffer overrun: needed {} more bytes, but only {} remain",
                needed, remaining
            ),
        }
    }
}

impl std::error::Error for Error {}
