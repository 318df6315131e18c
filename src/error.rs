use std::fmt;

/// Error types for frame file input and record export
///
/// Frame decoding never produces one of these: a frame that cannot be decoded
/// is simply discarded. These cover the I/O around the decoder.
#[derive(Debug)]
pub enum EnforaError {
    /// I/O errors
    Io(std::io::Error),
    /// UTF-8 parsing errors
    Utf8(std::str::Utf8Error),
    /// A line of a frame file is not valid hex
    InvalidFrameFile { line: usize, reason: String },
    /// Export format error
    Export(String),
}

impl fmt::Display for EnforaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnforaError::Io(err) => write!(f, "I/O error: {}", err),
            EnforaError::Utf8(err) => write!(f, "UTF-8 error: {}", err),
            EnforaError::InvalidFrameFile { line, reason } => {
                write!(f, "Invalid frame on line {}: {}", line, reason)
            }
            EnforaError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for EnforaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnforaError::Io(err) => Some(err),
            EnforaError::Utf8(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EnforaError {
    fn from(err: std::io::Error) -> Self {
        EnforaError::Io(err)
    }
}

impl From<std::str::Utf8Error> for EnforaError {
    fn from(err: std::str::Utf8Error) -> Self {
        EnforaError::Utf8(err)
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for EnforaError {
    fn from(err: csv::Error) -> Self {
        EnforaError::Export(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for EnforaError {
    fn from(err: serde_json::Error) -> Self {
        EnforaError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EnforaError>;
