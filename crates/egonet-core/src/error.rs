use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    SnapshotReadFailed,
    SnapshotParseError,
    ConfigReadFailed,
    ConfigParseError,
    Cancelled,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::SnapshotReadFailed => "E1001",
            Self::SnapshotParseError => "E1002",
            Self::ConfigReadFailed => "E2001",
            Self::ConfigParseError => "E2002",
            Self::Cancelled => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::SnapshotReadFailed => "Snapshot file could not be read",
            Self::SnapshotParseError => "Snapshot file parse error",
            Self::ConfigReadFailed => "Config file could not be read",
            Self::ConfigParseError => "Config file parse error",
            Self::Cancelled => "Computation cancelled",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::SnapshotReadFailed => Some("Check the snapshot path and read permissions."),
            Self::SnapshotParseError => Some(
                "Snapshot must be a JSON object: {\"<root>\": {\"<contact>\": [<id>, ...]}}.",
            ),
            Self::ConfigReadFailed => Some("Check the config path and read permissions."),
            Self::ConfigParseError => Some("Fix syntax in the egonet config.toml and retry."),
            Self::Cancelled => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors surfaced by the library.
///
/// The centrality engines themselves never fail on a well-formed graph; the
/// only engine-side error is cooperative cancellation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{stage} cancelled")]
    Cancelled { stage: &'static str },

    #[error("failed to read snapshot {}", path.display())]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot")]
    SnapshotParse(#[from] serde_json::Error),

    #[error("failed to read config {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Cancelled { .. } => ErrorCode::Cancelled,
            Self::SnapshotRead { .. } => ErrorCode::SnapshotReadFailed,
            Self::SnapshotParse(_) => ErrorCode::SnapshotParseError,
            Self::ConfigRead { .. } => ErrorCode::ConfigReadFailed,
            Self::ConfigParse { .. } => ErrorCode::ConfigParseError,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::{Error, ErrorCode};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::SnapshotReadFailed,
            ErrorCode::SnapshotParseError,
            ErrorCode::ConfigReadFailed,
            ErrorCode::ConfigParseError,
            ErrorCode::Cancelled,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::ConfigParseError.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn cancelled_maps_to_code() {
        let err = Error::Cancelled {
            stage: "betweenness",
        };
        assert_eq!(err.code(), ErrorCode::Cancelled);
        assert_eq!(err.to_string(), "betweenness cancelled");
    }
}
