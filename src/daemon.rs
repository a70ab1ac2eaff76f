//! Daemon-wide settings fed from the configuration file, and fatal exit
// (c) 2024 Ross Younger

use std::{fs::File, fs::OpenOptions, path::Path};

use tracing::{error, warn};

/// The port rsync-style daemons listen on unless told otherwise
pub const DEFAULT_PORT: u16 = 873;

/// Settings the rest of the daemon consumes, populated by
/// [`ConfigStore::load`](crate::config::ConfigStore::load).
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct DaemonSettings {
    /// TCP port to listen on
    pub listen_port: u16,
    /// Address to bind to; `None` means all interfaces
    pub bind_address: Option<String>,
    /// Daemon log, opened for append. Owned here once the configuration is loaded.
    pub log_file: Option<File>,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_PORT,
            bind_address: None,
            log_file: None,
        }
    }
}

impl DaemonSettings {
    /// Opens `path` in create-or-append mode as the daemon log.
    ///
    /// Failure is not fatal: it is logged and any previously opened log is kept.
    pub(crate) fn open_log_file(&mut self, path: &Path) {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => self.log_file = Some(file),
            Err(e) => warn!("could not open log file {}: {e}", path.display()),
        }
    }
}

/// Reports an unrecoverable startup error and terminates the process.
///
/// The message and the full chain of causes are logged at error level.
pub fn exit_fatally(message: &str, cause: Option<&dyn std::error::Error>) -> ! {
    match cause {
        None => error!("{message}"),
        Some(cause) => {
            let mut detail = cause.to_string();
            let mut next = cause.source();
            while let Some(inner) = next {
                detail.push_str(": ");
                detail.push_str(&inner.to_string());
                next = inner.source();
            }
            error!("{message}: {detail}");
        }
    }
    std::process::exit(1)
}

#[cfg(test)]
mod test {
    use std::io::Write as _;

    use super::{DaemonSettings, DEFAULT_PORT};

    #[test]
    fn defaults() {
        let s = DaemonSettings::default();
        assert_eq!(s.listen_port, DEFAULT_PORT);
        assert!(s.bind_address.is_none());
        assert!(s.log_file.is_none());
    }

    #[test]
    fn log_file_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("syncd.log");
        std::fs::write(&path, "first\n").unwrap();

        let mut s = DaemonSettings::default();
        s.open_log_file(&path);
        s.log_file.as_ref().unwrap().write_all(b"second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn log_file_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = DaemonSettings::default();
        s.open_log_file(&dir.path().join("no/such/dir/syncd.log"));
        assert!(s.log_file.is_none());
    }
}
