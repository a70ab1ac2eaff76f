//! Recognised keywords and individual configured values
// (c) 2024 Ross Younger

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Keywords recognised before the first module section.
///
/// These are matched exactly as written; `Port` is not the same as `port`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum GlobalKey {
    /// Daemon log destination, opened for append
    #[strum(serialize = "log file")]
    LogFile,
    /// TCP port to listen on
    #[strum(serialize = "port")]
    Port,
    /// Address to bind to
    #[strum(serialize = "address")]
    Address,
}

/// Keywords recognised inside a module section.
///
/// The parser lowercases keys before lookup, so these are effectively case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum ModuleKey {
    /// Filesystem root of the module
    #[strum(serialize = "path")]
    Path,
    /// Free-text description
    #[strum(serialize = "comment")]
    Comment,
    /// Refuse uploads
    #[strum(serialize = "read only")]
    ReadOnly,
    /// Refuse downloads
    #[strum(serialize = "write only")]
    WriteOnly,
    /// Host patterns permitted to connect
    #[strum(serialize = "hosts allow")]
    HostsAllow,
    /// Host patterns refused
    #[strum(serialize = "hosts deny")]
    HostsDeny,
    /// Users who may authenticate
    #[strum(serialize = "auth users")]
    AuthUsers,
    /// Credentials file name
    #[strum(serialize = "secrets file")]
    SecretsFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A global setting we read from the config file
pub struct Setting {
    /// line number within the file
    pub line_number: usize,
    /// the value, trimmed of surrounding whitespace
    pub value: String,
}
