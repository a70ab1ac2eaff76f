//! The module registry shared by the whole daemon
// (c) 2024 Ross Younger

use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use tracing::{debug, info};

use super::{
    parser::{Parser, Registry},
    values::{GlobalKey, Setting},
    ConfigError, Module,
};
use crate::{
    daemon::DaemonSettings,
    os::{AbstractPlatform as _, Platform},
    util::path::file_name_only,
};

/// Holds the daemon's modules and global settings, read from one configuration file.
///
/// Every operation, including [`load`](Self::load), takes the same lock, so a
/// reader never sees a half-loaded registry. Configuration access is rare
/// compared to transfer traffic, so one coarse lock is enough.
///
/// ```no_run
/// use syncd::{config::ConfigStore, daemon::DaemonSettings};
///
/// let store = ConfigStore::new("rsyncd.conf"); // i.e. /etc/rsyncd.conf
/// let mut settings = DaemonSettings::default();
/// store.load(&mut settings).expect("configuration should load");
/// if let Some(index) = store.find_module_index("backup") {
///     println!("backup is read-only: {}", store.is_read_only(index).unwrap());
/// }
/// ```
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct ConfigStore {
    path: PathBuf,
    registry: Mutex<Registry>,
}

impl ConfigStore {
    /// Binds a store to a file in the system configuration directory.
    ///
    /// Only the filename component of `file` is used.
    #[must_use]
    pub fn new<P: AsRef<Path>>(file: P) -> Self {
        Self::bound_to(Platform::system_config_path(&file.as_ref().to_string_lossy()))
    }

    /// Binds a store to a file in an explicit directory instead of the system one.
    ///
    /// Only the filename component of `file` is used.
    #[must_use]
    pub fn in_directory<D: AsRef<Path>, P: AsRef<Path>>(dir: D, file: P) -> Self {
        let file = file.as_ref().to_string_lossy();
        Self::bound_to(dir.as_ref().join(file_name_only(&file)))
    }

    fn bound_to(path: PathBuf) -> Self {
        Self {
            path,
            registry: Mutex::new(Registry::default()),
        }
    }

    /// The resolved configuration file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The registry is only ever replaced whole, so a poisoned lock still guards consistent data.
    pub(super) fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads the configuration file from the top, replacing the registry and
    /// passing global settings on to `settings`.
    ///
    /// Malformed lines and unrecognised keys are skipped. If the `log file`
    /// cannot be opened, a warning is logged and loading continues.
    ///
    /// On error the previous registry and `settings` are left as they were.
    /// The caller decides whether to terminate (see [`crate::daemon::exit_fatally`]).
    pub fn load(&self, settings: &mut DaemonSettings) -> Result<(), ConfigError> {
        let mut current = self.lock();
        debug!("reading configuration from {}", self.path.display());
        let parsed = Parser::for_path(&self.path)?.parse()?;

        if let Some(port) = parsed.listen_port() {
            settings.listen_port = port;
        }
        if let Some(address) = parsed.get(GlobalKey::Address) {
            settings.bind_address = Some(address.value.clone());
        }
        if let Some(log_file) = parsed.get(GlobalKey::LogFile) {
            settings.open_log_file(Path::new(&log_file.value));
        }

        info!(
            "loaded {} module(s) from {}",
            parsed.modules().len(),
            self.path.display()
        );
        *current = parsed;
        Ok(())
    }

    /// Index of the first module called `name` (case-sensitive)
    #[must_use]
    pub fn find_module_index(&self, name: &str) -> Option<usize> {
        self.lock().find(name)
    }

    /// Number of configured modules
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.lock().modules().len()
    }

    /// A snapshot of all modules, in file order
    #[must_use]
    pub fn modules(&self) -> Vec<Module> {
        self.lock().modules().to_vec()
    }

    /// The module at `index`, which must be less than [`module_count`](Self::module_count)
    pub fn get_module(&self, index: usize) -> Result<Module, ConfigError> {
        self.lock().module(index).cloned()
    }

    fn with_module<T>(
        &self,
        index: usize,
        f: impl FnOnce(&Module) -> T,
    ) -> Result<T, ConfigError> {
        self.lock().module(index).map(f)
    }

    /// Name of the module at `index`
    pub fn module_name(&self, index: usize) -> Result<String, ConfigError> {
        self.with_module(index, |m| m.name().to_owned())
    }

    /// Whether the module at `index` refuses uploads
    pub fn is_read_only(&self, index: usize) -> Result<bool, ConfigError> {
        self.with_module(index, |m| m.read_only)
    }

    /// Whether the module at `index` refuses downloads
    pub fn is_write_only(&self, index: usize) -> Result<bool, ConfigError> {
        self.with_module(index, |m| m.write_only)
    }

    /// `hosts allow` patterns of the module at `index`
    pub fn hosts_allow(&self, index: usize) -> Result<String, ConfigError> {
        self.with_module(index, |m| m.hosts_allow.clone())
    }

    /// `hosts deny` patterns of the module at `index`
    pub fn hosts_deny(&self, index: usize) -> Result<String, ConfigError> {
        self.with_module(index, |m| m.hosts_deny.clone())
    }

    /// `auth users` of the module at `index`
    pub fn auth_users(&self, index: usize) -> Result<String, ConfigError> {
        self.with_module(index, |m| m.auth_users.clone())
    }

    /// Secrets file name of the module at `index`
    pub fn secrets_file(&self, index: usize) -> Result<String, ConfigError> {
        self.with_module(index, |m| m.secrets_file.clone())
    }

    /// A global setting, with the line it came from
    #[must_use]
    pub fn global(&self, key: GlobalKey) -> Option<Setting> {
        self.lock().get(key).cloned()
    }

    /// The raw `port` value, if the file set one
    #[must_use]
    pub fn port(&self) -> Option<String> {
        self.global(GlobalKey::Port).map(|s| s.value)
    }

    /// The `address` value, if the file set one
    #[must_use]
    pub fn address(&self) -> Option<String> {
        self.global(GlobalKey::Address).map(|s| s.value)
    }

    /// The `log file` path, if the file set one
    #[must_use]
    pub fn log_file(&self) -> Option<PathBuf> {
        self.global(GlobalKey::LogFile).map(|s| s.value.into())
    }
}

#[cfg(test)]
mod test {
    use std::{path::PathBuf, sync::Arc};

    use anyhow::Result;
    use assertables::assert_contains;

    use super::ConfigStore;
    use crate::{
        config::{ConfigError, Module},
        daemon::DaemonSettings,
        util::make_test_tempfile,
    };

    const SAMPLE: &str = r"
        ; global settings
        port = 8730
        address = 127.0.0.1

        [backup]
        path = C:\data
        read only = false
        secrets file = /etc/secrets/rsyncd.secrets

        [public]
        comment = anonymous mirror
        hosts allow = 192.168.*
        hosts deny = *
        auth users = alice, bob
        write only = true
    ";

    fn loaded(contents: &str) -> (ConfigStore, DaemonSettings, tempfile::TempDir) {
        let (path, dir) = make_test_tempfile(contents, "syncd.conf");
        let store = ConfigStore::in_directory(dir.path(), path.file_name().unwrap());
        let mut settings = DaemonSettings::default();
        store.load(&mut settings).unwrap();
        (store, settings, dir)
    }

    #[test]
    fn path_resolution_discards_directories() {
        let store = ConfigStore::new("/some/where/else/rsyncd.conf");
        assert_eq!(store.path(), PathBuf::from("/etc/rsyncd.conf"));
        let store = ConfigStore::in_directory("/tmp/x", r"C:\nowhere\rsyncd.conf");
        assert_eq!(store.path(), PathBuf::from("/tmp/x/rsyncd.conf"));
    }

    #[test]
    fn globals_reach_daemon_settings() {
        let (store, settings, _dir) = loaded(SAMPLE);
        assert_eq!(store.port().as_deref(), Some("8730"));
        assert_eq!(store.address().as_deref(), Some("127.0.0.1"));
        assert_eq!(settings.listen_port, 8730);
        assert_eq!(settings.bind_address.as_deref(), Some("127.0.0.1"));
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn accessors() -> Result<()> {
        let (store, _, _dir) = loaded(SAMPLE);
        assert_eq!(store.module_count(), 2);
        let backup = store.find_module_index("backup").unwrap();
        let public = store.find_module_index("public").unwrap();
        assert_eq!((backup, public), (0, 1));

        assert_eq!(store.module_name(backup)?, "backup");
        assert!(!store.is_read_only(backup)?);
        assert!(!store.is_write_only(backup)?);
        assert_eq!(store.secrets_file(backup)?, "rsyncd.secrets");
        assert_eq!(store.get_module(backup)?.path, "C:/data");

        assert!(store.is_read_only(public)?);
        assert!(store.is_write_only(public)?);
        assert_eq!(store.hosts_allow(public)?, "192.168.*");
        assert_eq!(store.hosts_deny(public)?, "*");
        assert_eq!(store.auth_users(public)?, "alice, bob");
        assert_eq!(store.get_module(public)?.comment, "anonymous mirror");
        Ok(())
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let (store, _, _dir) = loaded(SAMPLE);
        let count = store.module_count();
        assert!(store.get_module(count - 1).is_ok());
        for index in [count, count + 1, usize::MAX] {
            assert!(matches!(
                store.get_module(index),
                Err(ConfigError::NoSuchModule { .. })
            ));
            assert!(store.module_name(index).is_err());
            assert!(store.is_read_only(index).is_err());
            assert!(store.is_write_only(index).is_err());
            assert!(store.hosts_allow(index).is_err());
            assert!(store.hosts_deny(index).is_err());
            assert!(store.auth_users(index).is_err());
            assert!(store.secrets_file(index).is_err());
        }
    }

    #[test]
    fn empty_store() {
        let store = ConfigStore::in_directory("/nonexistent", "syncd.conf");
        assert_eq!(store.module_count(), 0);
        assert_eq!(store.find_module_index("anything"), None);
        assert!(store.get_module(0).is_err());
        assert_eq!(store.port(), None);
    }

    #[test]
    fn find_is_case_sensitive() {
        let (store, _, _dir) = loaded(SAMPLE);
        assert_eq!(store.find_module_index("Backup"), None);
        assert_eq!(store.find_module_index("backup "), None);
    }

    #[test]
    fn reload_is_idempotent() {
        let (store, mut settings, _dir) = loaded(SAMPLE);
        let first = store.modules();
        store.load(&mut settings).unwrap();
        store.load(&mut settings).unwrap();
        assert_eq!(store.modules(), first);
        assert_eq!(store.module_count(), 2);
    }

    #[test]
    fn reload_picks_up_changes() {
        let (store, mut settings, _dir) = loaded(SAMPLE);
        std::fs::write(store.path(), "[only]\npath = /srv/only\n").unwrap();
        store.load(&mut settings).unwrap();
        let mut expected = Module::new("only");
        expected.path = "/srv/only".into();
        assert_eq!(store.modules(), [expected]);
        assert_eq!(store.port(), None);
        // settings keep what the earlier load gave them
        assert_eq!(settings.listen_port, 8730);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::in_directory(dir.path(), "absent.conf");
        let mut settings = DaemonSettings::default();
        let err = store.load(&mut settings).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
        assert!(err.is_fatal());
        assert_contains!(err.to_string(), "absent.conf");
    }

    #[test]
    fn failed_load_keeps_previous_registry() {
        let (store, mut settings, _dir) = loaded(SAMPLE);
        std::fs::write(store.path(), "port = eighty\n[other]\n").unwrap();
        let err = store.load(&mut settings).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { line_number: 1, .. }));
        assert_eq!(store.module_count(), 2);
        assert_eq!(store.port().as_deref(), Some("8730"));
        assert_eq!(settings.listen_port, 8730);
    }

    #[test]
    fn log_file_is_opened_for_append() {
        let logdir = tempfile::tempdir().unwrap();
        let log = logdir.path().join("syncd.log");
        std::fs::write(&log, "existing\n").unwrap();
        let (store, settings, _dir) = loaded(&format!("log file = {}\n", log.display()));
        assert_eq!(store.log_file(), Some(log.clone()));
        assert!(settings.log_file.is_some());
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "existing\n");
    }

    #[test]
    fn unopenable_log_file_is_not_fatal() {
        let (store, settings, _dir) = loaded(
            "log file = /nonexistent/directory/syncd.log
            [m]",
        );
        assert!(settings.log_file.is_none());
        assert_eq!(store.module_count(), 1);
    }

    #[test]
    fn concurrent_readers_during_reload() {
        let (store, _, _dir) = loaded(SAMPLE);
        let store = Arc::new(store);
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        // never a partially loaded registry
                        let modules = store.modules();
                        assert_eq!(modules.len(), 2);
                        assert_eq!(store.find_module_index("public"), Some(1));
                    }
                })
            })
            .collect();
        let mut settings = DaemonSettings::default();
        for _ in 0..20 {
            store.load(&mut settings).unwrap();
        }
        for r in readers {
            r.join().unwrap();
        }
    }
}
