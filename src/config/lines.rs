//! Line classification
// (c) 2024 Ross Younger

use crate::util::path::is_blank;

#[derive(Debug, PartialEq)]
/// What a single line of the configuration file turned out to be
pub(super) enum Line<'a> {
    /// Blank, or a `;` / `#` comment
    Empty,
    /// `[name]`, with the brackets removed
    Header { name: &'a str },
    /// `key = value`, both sides trimmed. The key keeps its original case.
    Assignment { key: &'a str, value: &'a str },
    /// Anything else; the caller drops it without complaint
    Malformed,
}

/// Classifies one raw line read from the file.
///
/// A section header is a line that starts with `[` and ends with `]`.
/// All leading `[` and trailing `]` characters are removed from the name; nothing else is.
///
/// An assignment must contain exactly one `=`.
pub(super) fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if is_blank(line) || line.starts_with(';') || line.starts_with('#') {
        return Line::Empty;
    }
    if line.starts_with('[') && line.ends_with(']') {
        let name = line.trim_start_matches('[').trim_end_matches(']');
        return Line::Header { name };
    }
    let mut parts = line.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => Line::Assignment {
            key: key.trim(),
            value: value.trim(),
        },
        _ => Line::Malformed,
    }
}

#[cfg(test)]
mod test {
    use anyhow::{anyhow, Context as _, Result};
    use assertables::assert_eq_as_result;

    use super::{classify, Line};

    fn assign<'a>(key: &'a str, value: &'a str) -> Line<'a> {
        Line::Assignment { key, value }
    }

    #[test]
    fn classification() -> Result<()> {
        for (input, expected) in [
            ("", Line::Empty),
            ("   \t", Line::Empty),
            ("; a comment", Line::Empty),
            ("# another", Line::Empty),
            ("   # indented comment", Line::Empty),
            ("[backup]", Line::Header { name: "backup" }),
            ("  [backup]  ", Line::Header { name: "backup" }),
            ("[[nested]]", Line::Header { name: "nested" }),
            ("[ spaced ]", Line::Header { name: " spaced " }),
            ("[]", Line::Header { name: "" }),
            ("[Backup]", Line::Header { name: "Backup" }),
            ("port = 873", assign("port", "873")),
            ("Read Only=false", assign("Read Only", "false")),
            ("  comment =   hello world  ", assign("comment", "hello world")),
            ("empty =", assign("empty", "")),
            ("= orphan", assign("", "orphan")),
            ("a = b = c", Line::Malformed),
            ("a==b", Line::Malformed),
            ("no equals sign", Line::Malformed),
            ("[unterminated", Line::Malformed),
            ("[a] = b", assign("[a]", "b")),
        ] {
            let msg = || format!("input \"{input}\" failed");
            assert_eq_as_result!(classify(input), expected)
                .map_err(|e| anyhow!(e))
                .with_context(msg)?;
        }
        Ok(())
    }
}
