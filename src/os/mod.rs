//! OS abstraction layer
// (c) 2024 Ross Younger

use std::path::PathBuf;

/// General platform abstraction trait.
/// The active implementation should be pulled into this crate
/// Implementations should be called `Platform`, e.g. [Platform].
///
/// Usage:
/// ```
///    use syncd::os::Platform;
///    use syncd::os::AbstractPlatform as _;
///    println!("{}", Platform::system_config_dir().display());
/// ```
pub trait AbstractPlatform {
    /// The directory holding system-wide daemon configuration.
    /// On most platforms this will be `/etc`.
    fn system_config_dir() -> PathBuf;

    /// The absolute path to a configuration file with the given name in the system directory.
    ///
    /// Only the filename component of `filename` is used; any directory part is discarded.
    fn system_config_path(filename: &str) -> PathBuf {
        Self::system_config_dir().join(crate::util::path::file_name_only(filename))
    }
}

#[cfg(any(unix, doc))]
mod unix;

#[cfg(any(unix, doc))]
pub use unix::*;

static_assertions::assert_cfg!(unix, "This OS is not yet supported");
