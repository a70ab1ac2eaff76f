// OS abstraction layer for syncd - Unix implementation
// (c) 2024 Ross Younger

use std::path::PathBuf;

use super::AbstractPlatform;

#[derive(Debug, Clone, Copy)]
/// OS abstraction layer for Unix-like platforms
pub struct Platform {}

impl AbstractPlatform for Platform {
    fn system_config_dir() -> PathBuf {
        PathBuf::from("/etc")
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::Platform;
    use crate::os::AbstractPlatform as _;

    #[test]
    fn config_path_uses_filename_only() {
        assert_eq!(
            Platform::system_config_path("syncd.conf"),
            PathBuf::from("/etc/syncd.conf")
        );
        assert_eq!(
            Platform::system_config_path("/home/someone/elsewhere/syncd.conf"),
            PathBuf::from("/etc/syncd.conf")
        );
        assert_eq!(
            Platform::system_config_path(r"C:\Windows\rsyncd.conf"),
            PathBuf::from("/etc/rsyncd.conf")
        );
    }
}
