// (c) 2024 Ross Younger
//! # Configuration management
//!
//! The daemon reads a single configuration file at startup, by default
//! `syncd.conf` in the system configuration directory (`/etc` on Unix).
//! Only the filename of any path given on the command line is used; the
//! directory is always the system one unless `--config-dir` is given.
//!
//! ## File format
//!
//! This is a line-oriented `key = value` format in the style of `rsyncd.conf`.
//! Lines beginning with `;` or `#` are comments. Blank lines are ignored.
//!
//! Settings before the first `[module]` header apply to the daemon as a whole.
//! Everything after a header applies to that module, until the next header.
//!
//! ### Example
//!
//! ```text
//! ; daemon-wide settings
//! log file = /var/log/syncd.log
//! port = 873
//! address = 0.0.0.0
//!
//! [backup]
//! path = /srv/backup
//! comment = nightly backups
//! read only = false
//! auth users = backup
//! secrets file = /etc/syncd.secrets
//!
//! [mirror]
//! path = /srv/mirror
//! hosts allow = 192.168.1.*
//! ```
//!
//! ## Global settings
//!
//! These keys are case-sensitive.
//!
//! | Key | Meaning |
//! |---|---|
//! | `log file` | Daemon log, opened for append. If it can't be opened we log a warning and carry on. |
//! | `port` | TCP port to listen on. Must be a number in the range 0-65535. |
//! | `address` | Address to bind to |
//!
//! ## Module settings
//!
//! These keys are case-insensitive.
//!
//! | Key | Meaning | Default |
//! |---|---|---|
//! | `path` | Module root. Backslashes are converted to `/`. | empty |
//! | `comment` | Description | empty |
//! | `read only` | Only the exact value `false` makes a module writable | `true` |
//! | `write only` | Only the exact value `true` makes a module write-only | `false` |
//! | `hosts allow` | Hosts permitted | empty |
//! | `hosts deny` | Hosts refused | empty |
//! | `auth users` | Users who may authenticate | empty |
//! | `secrets file` | Credentials file; only the filename is kept | empty |
//!
//! ### Traps and tips
//! 1. A module may appear in several `[name]` blocks; they are merged into one. Names are case-sensitive.
//! 1. `read only = no` leaves a module read-only. Only `false` will do.
//! 1. A line containing more than one `=` is ignored in its entirety, as is a line with none.
//! 1. Unknown keys are ignored. Global keys inside a module section are unknown keys.
//! 1. A `port` that is not a number stops the daemon from starting.

mod display;

mod errors;
pub use errors::ConfigError;

mod lines;

mod module;
pub use module::Module;

mod parser;

mod store;
pub use store::ConfigStore;

mod values;
pub use values::{GlobalKey, ModuleKey, Setting};

/// Default configuration filename, looked up in the system configuration directory
pub const BASE_CONFIG_FILENAME: &str = "syncd.conf";
