//! Error type shared by every stage of compression and decompression.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HuffError {
    /// Opening, reading or writing a stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("not a huffzip stream (bad signature)")]
    BadSignature,
    #[error("unsupported format version {0:#04x}")]
    UnsupportedVersion(u8),
    /// The serialized code table cannot describe a valid prefix code.
    #[error("malformed code table: {0}")]
    MalformedTable(String),
    /// The stream ended before the named section was complete.
    #[error("truncated stream: unexpected end of {0}")]
    Truncated(&'static str),
    /// The packed bits do not decode cleanly against the code table.
    #[error("corrupt payload: {0}")]
    CorruptPayload(String),
    #[error("output file {0} already exists (use --force to overwrite)")]
    OutputExists(String),
}

pub type Result<T> = std::result::Result<T, HuffError>;

impl HuffError {
    /// Map an I/O error raised while reading `section`, turning a premature EOF into `Truncated`.
    pub(crate) fn reading(section: &'static str) -> impl FnOnce(io::Error) -> HuffError {
        move |e| match e.kind() {
            io::ErrorKind::UnexpectedEof => HuffError::Truncated(section),
            _ => HuffError::Io(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::HuffError;
    use std::io;

    #[test]
    fn eof_maps_to_truncated() {
        let err = HuffError::reading("code table")(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, HuffError::Truncated("code table")));
    }

    #[test]
    fn other_io_errors_pass_through() {
        let err = HuffError::reading("payload")(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, HuffError::Io(e) if e.kind() == io::ErrorKind::PermissionDenied));
    }
}
