//! Path and string helpers used by the configuration parser
// (c) 2024 Ross Younger

/// Returns the filename component of `path`, discarding any directory part.
///
/// Both `/` and `\` are treated as separators, so Windows-style paths found in
/// configuration files behave the same on every platform.
#[must_use]
pub fn file_name_only(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Converts every backslash in `path` to a forward slash
#[must_use]
pub fn forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// True if the string is empty or contains only whitespace
#[must_use]
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod test {
    use super::{file_name_only, forward_slashes, is_blank};

    #[test]
    fn file_names() {
        for (input, expected) in [
            ("rsyncd.secrets", "rsyncd.secrets"),
            ("/etc/secrets/rsyncd.secrets", "rsyncd.secrets"),
            (r"C:\Windows\system32\rsyncd.secrets", "rsyncd.secrets"),
            ("mixed\\style/path.txt", "path.txt"),
            ("/etc/", ""),
            ("", ""),
        ] {
            assert_eq!(file_name_only(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn slashes() {
        assert_eq!(forward_slashes(r"C:\data\backup"), "C:/data/backup");
        assert_eq!(forward_slashes("/already/fine"), "/already/fine");
        assert_eq!(forward_slashes(r"\\server\share"), "//server/share");
    }

    #[test]
    fn blankness() {
        assert!(is_blank(""));
        assert!(is_blank(" \t "));
        assert!(!is_blank(" x "));
    }
}
