//! A single synchronisation module
// (c) 2024 Ross Younger

use super::values::ModuleKey;
use crate::util::path::{file_name_only, forward_slashes};

/// One named module (synchronisation endpoint) and its access settings.
///
/// Records are created by the parser when it meets a new `[name]` header and
/// are only modified while a configuration file is being loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    /// Root directory, with `/` separators
    pub path: String,
    /// Free-text description
    pub comment: String,
    /// Refuse uploads. Defaults to true.
    pub read_only: bool,
    /// Refuse downloads. Defaults to false.
    pub write_only: bool,
    /// Host patterns permitted to connect
    pub hosts_allow: String,
    /// Host patterns refused
    pub hosts_deny: String,
    /// Users who may authenticate
    pub auth_users: String,
    /// Name of the secrets file (no directory part)
    pub secrets_file: String,
}

impl Module {
    /// Creates a module with the given name and default settings
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            path: String::new(),
            comment: String::new(),
            read_only: true,
            write_only: false,
            hosts_allow: String::new(),
            hosts_deny: String::new(),
            auth_users: String::new(),
            secrets_file: String::new(),
        }
    }

    /// The module name, as written in its section header
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies one `key = value` line to this module.
    ///
    /// The booleans are literal matches: only `false` clears `read only`,
    /// only `true` sets `write only`. Anything else gives the default.
    pub(crate) fn apply(&mut self, key: ModuleKey, value: &str) {
        match key {
            ModuleKey::Path => self.path = forward_slashes(value),
            ModuleKey::Comment => value.clone_into(&mut self.comment),
            ModuleKey::ReadOnly => self.read_only = value != "false",
            ModuleKey::WriteOnly => self.write_only = value == "true",
            ModuleKey::HostsAllow => value.clone_into(&mut self.hosts_allow),
            ModuleKey::HostsDeny => value.clone_into(&mut self.hosts_deny),
            ModuleKey::AuthUsers => value.clone_into(&mut self.auth_users),
            ModuleKey::SecretsFile => file_name_only(value).clone_into(&mut self.secrets_file),
        }
    }
}
