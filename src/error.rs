use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    /// Bad registry path, unknown output format, unusable directories.
    Config(String),
    Registry { path: PathBuf, reason: String },
    Xml(roxmltree::Error),
    ServiceUnavailable {
        host: String,
        port: u16,
        source: std::io::Error,
    },
    Conversion { input: PathBuf, reason: String },
    Io(std::io::Error),
}

impl Error {
    pub(crate) fn conversion(input: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Conversion {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(reason) => f.write_str(reason),
            Error::Registry { path, reason } => {
                write!(f, "invalid document registry {}: {reason}", path.display())
            }
            Error::Xml(e) => write!(f, "XML error: {e}"),
            Error::ServiceUnavailable { host, port, source } => write!(
                f,
                "connection failed ({source}). Please make sure OpenOffice.org is running and \
                 listening on port {port} of {host}."
            ),
            Error::Conversion { input, reason } => {
                write!(f, "failed to convert {}: {reason}", input.display())
            }
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Xml(e) => Some(e),
            Error::ServiceUnavailable { source, .. } => Some(source),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
