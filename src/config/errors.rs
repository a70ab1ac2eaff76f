//! Error types for configuration loading and lookup
// (c) 2024 Ross Younger

use std::{num::ParseIntError, path::PathBuf};

/// Failures surfaced by [`ConfigStore`](super::ConfigStore).
///
/// Line-level problems (malformed lines, unknown keys) are not errors; the
/// parser drops them. Everything here except [`ConfigError::NoSuchModule`]
/// means the daemon cannot start.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("can't find configuration file {}", path.display())]
    MissingFile {
        /// The resolved path we looked for
        path: PathBuf,
    },
    /// The configuration file exists but could not be opened or read
    #[error("failed to read configuration file {}", path.display())]
    Unreadable {
        /// The resolved path
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },
    /// The global `port` value is not a valid port number
    #[error("invalid port number `{value}` at line {line_number}")]
    InvalidPort {
        /// The offending value
        value: String,
        /// Where it was found
        line_number: usize,
        /// Why it did not parse
        source: ParseIntError,
    },
    /// An accessor was given an index outside `0..count`
    #[error("no such module (index {index}, {count} modules configured)")]
    NoSuchModule {
        /// The requested index
        index: usize,
        /// How many modules exist
        count: usize,
    },
}

impl ConfigError {
    /// True if this error prevents the daemon from starting
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::NoSuchModule { .. })
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use assertables::assert_contains;

    use super::ConfigError;

    #[test]
    fn messages() {
        let e = ConfigError::MissingFile {
            path: PathBuf::from("/etc/syncd.conf"),
        };
        assert_contains!(e.to_string(), "/etc/syncd.conf");
        assert!(e.is_fatal());

        let source = "80a".parse::<u16>().unwrap_err();
        let e = ConfigError::InvalidPort {
            value: "80a".into(),
            line_number: 3,
            source,
        };
        assert_eq!(e.to_string(), "invalid port number `80a` at line 3");
        assert!(std::error::Error::source(&e).is_some());

        let e = ConfigError::NoSuchModule { index: 2, count: 2 };
        assert!(!e.is_fatal());
    }
}
