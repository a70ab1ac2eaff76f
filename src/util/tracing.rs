//! Tracing helpers
// (c) 2024 Ross Younger

use std::{
    fs::File,
    io::Write,
    sync::{Arc, Mutex, PoisonError},
};

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

const STANDARD_ENV_VAR: &str = "RUST_LOG";
const LOG_FILE_DETAIL_ENV_VAR: &str = "RUST_LOG_FILE_DETAIL";

/// Result type for `filter_for()`
struct FilterResult {
    filter: EnvFilter,
    used_env: bool, // Did we use the environment variable we were requested to?
}

/// Log filter setup:
/// Use a given environment variable; if it wasn't present, log only syncd items at a given trace level.
fn filter_for(trace_level: &str, key: &str) -> anyhow::Result<FilterResult> {
    EnvFilter::try_from_env(key)
        .map(|filter| FilterResult {
            filter,
            used_env: true,
        })
        .or_else(|e| {
            if std::env::var(key).is_ok() {
                anyhow::bail!("{key} (set in environment) was invalid: {e}");
            }
            Ok(FilterResult {
                filter: EnvFilter::new(format!("syncd={trace_level}")),
                used_env: false,
            })
        })
}

/// The daemon's log file, which is not known until the configuration file has been read.
///
/// Until a file is attached, events routed here are discarded.
/// Cloning this struct yields another handle to the same destination.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    file: Arc<Mutex<Option<File>>>,
}

impl LogSink {
    /// Directs all subsequent file-layer output to `file`, replacing any previous destination
    pub fn attach(&self, file: File) {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(file);
    }

    /// Whether a file has been attached
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        guard.as_mut().map_or(Ok(()), Write::flush)
    }
}

/// Set up rust tracing, to stderr and to a deferred log file.
///
/// By default we log only our events (syncd), at a given trace level.
/// This can be overridden by setting `RUST_LOG`.
/// The log file layer follows the same filter unless `RUST_LOG_FILE_DETAIL` is set.
///
/// The returned [`LogSink`] receives the daemon log file once the configuration
/// has been loaded (see [`crate::daemon::DaemonSettings::log_file`]).
///
/// **CAUTION:** If this function fails, tracing won't be set up; callers must take extra care to report the error.
pub fn setup(trace_level: &str) -> anyhow::Result<LogSink> {
    let filter = filter_for(trace_level, STANDARD_ENV_VAR)?;
    let console = fmt::layer()
        .compact()
        .with_target(filter.used_env)
        .with_writer(std::io::stderr)
        .with_filter(filter.filter)
        .boxed();

    let sink = LogSink::default();
    let filter = if std::env::var(LOG_FILE_DETAIL_ENV_VAR).is_ok() {
        FilterResult {
            filter: EnvFilter::try_from_env(LOG_FILE_DETAIL_ENV_VAR)?,
            used_env: true,
        }
    } else {
        filter_for(trace_level, STANDARD_ENV_VAR)?
    };
    let writer = sink.clone();
    let file = fmt::layer()
        .with_writer(move || writer.clone())
        .with_target(filter.used_env)
        .compact()
        .with_ansi(false)
        .with_filter(filter.filter)
        .boxed();

    tracing_subscriber::registry()
        .with(vec![console, file])
        .init();
    Ok(sink)
}

#[cfg(test)]
mod test {
    use std::io::Write as _;

    use super::LogSink;

    #[test]
    fn detached_sink_discards() {
        let mut sink = LogSink::default();
        assert!(!sink.is_attached());
        assert_eq!(sink.write(b"dropped").unwrap(), 7);
        sink.flush().unwrap();
    }

    #[test]
    fn attached_sink_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.log");
        let file = std::fs::File::create(&path).unwrap();

        let sink = LogSink::default();
        let mut writer = sink.clone();
        sink.attach(file);
        assert!(sink.is_attached());
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
