use std::io;

use super::procfs::parser::ParseError;

/// Error reading a mandatory kernel file.
#[derive(Debug)]
pub enum CollectError {
    /// The file could not be read.
    Io { path: String, source: io::Error },
    /// The file was read but its content made no sense.
    Parse { path: String, message: String },
}

impl CollectError {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        CollectError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<String>, err: ParseError) -> Self {
        CollectError::Parse {
            path: path.into(),
            message: err.message,
        }
    }

    /// Path of the file that failed.
    pub fn path(&self) -> &str {
        match self {
            CollectError::Io { path, .. } | CollectError::Parse { path, .. } => path,
        }
    }

    /// OS error number, when the failure came from the OS.
    pub fn os_error(&self) -> Option<i32> {
        match self {
            CollectError::Io { source, .. } => source.raw_os_error(),
            CollectError::Parse { .. } => None,
        }
    }
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io { path, source } => write!(f, "cannot read {}: {}", path, source),
            CollectError::Parse { path, message } => {
                write!(f, "cannot parse {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Io { source, .. } => Some(source),
            CollectError::Parse { .. } => None,
        }
    }
}
