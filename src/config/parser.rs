//! File parsing internals
// (c) 2024 Ross Younger

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Read},
    path::{Path, PathBuf},
    str::FromStr as _,
};

use tracing::trace;

use super::{
    lines::{classify, Line},
    values::{GlobalKey, ModuleKey, Setting},
    ConfigError, Module,
};

/// Where the scanner is: before any section, or inside a module (by index into the registry)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ParseState {
    Global,
    InModule(usize),
}

/// The result of parsing a configuration file: modules in first-seen order, plus global settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Registry {
    modules: Vec<Module>,
    globals: BTreeMap<GlobalKey, Setting>,
    listen_port: Option<u16>,
}

impl Registry {
    pub(crate) fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Linear, case-sensitive; first match wins
    pub(crate) fn find(&self, name: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.name() == name)
    }

    pub(crate) fn module(&self, index: usize) -> Result<&Module, ConfigError> {
        self.modules.get(index).ok_or(ConfigError::NoSuchModule {
            index,
            count: self.modules.len(),
        })
    }

    pub(crate) fn get(&self, key: GlobalKey) -> Option<&Setting> {
        self.globals.get(&key)
    }

    pub(crate) fn listen_port(&self) -> Option<u16> {
        self.listen_port
    }

    /// Re-enters the named module if we have seen it before, otherwise appends a new one
    fn enter_module(&mut self, name: &str) -> usize {
        self.find(name).unwrap_or_else(|| {
            self.modules.push(Module::new(name));
            self.modules.len() - 1
        })
    }

    fn set_module_value(&mut self, index: usize, line_number: usize, key: &str, value: &str) {
        debug_assert!(index < self.modules.len(), "parse state points past the registry");
        let module = &mut self.modules[index];
        let Ok(known) = ModuleKey::from_str(&key.to_lowercase()) else {
            trace!(
                "line {line_number}: ignoring unknown key `{key}` in [{}]",
                module.name()
            );
            return;
        };
        module.apply(known, value);
    }

    fn set_global(
        &mut self,
        line_number: usize,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let Ok(key) = GlobalKey::from_str(key) else {
            trace!("line {line_number}: ignoring unknown global key `{key}`");
            return Ok(());
        };
        if key == GlobalKey::Port {
            let port = value.parse().map_err(|source| ConfigError::InvalidPort {
                value: value.to_owned(),
                line_number,
                source,
            })?;
            self.listen_port = Some(port);
        }
        let _ = self.globals.insert(
            key,
            Setting {
                line_number,
                value: value.to_owned(),
            },
        );
        Ok(())
    }

    /// Applies one line, returning the state for the next
    fn apply_line(
        &mut self,
        state: ParseState,
        line_number: usize,
        raw: &str,
    ) -> Result<ParseState, ConfigError> {
        match classify(raw) {
            Line::Empty => Ok(state),
            Line::Malformed => {
                trace!("line {line_number}: discarding malformed line");
                Ok(state)
            }
            Line::Header { name } => Ok(ParseState::InModule(self.enter_module(name))),
            Line::Assignment { key, value } => {
                match state {
                    ParseState::InModule(index) => {
                        self.set_module_value(index, line_number, key, value);
                    }
                    ParseState::Global => self.set_global(line_number, key, value)?,
                }
                Ok(state)
            }
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////

const BYTE_ORDER_MARK: char = '\u{feff}';

/// The business end of reading a config file.
///
/// `parse` consumes the parser; to re-read a file, create a fresh one.
#[derive(Debug)]
pub(crate) struct Parser<R>
where
    R: Read,
{
    reader: BufReader<R>,
    origin: PathBuf,
}

impl Parser<File> {
    pub(crate) fn for_path<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigError::MissingFile {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Ok(Self::for_reader(BufReader::new(file), path.to_path_buf()))
    }
}

#[cfg(test)]
impl<'a> Parser<&'a [u8]> {
    fn for_str(s: &'a str) -> Self {
        Self::for_reader(BufReader::new(s.as_bytes()), "<string>".into())
    }
}

impl<R: Read> Parser<R> {
    fn for_reader(reader: BufReader<R>, origin: PathBuf) -> Self {
        Self { reader, origin }
    }

    /// Scans the whole input, top to bottom.
    ///
    /// Bytes that are not valid UTF-8 become U+FFFD; a byte-order mark on the first line is dropped.
    /// The reader is dropped (and any file closed) when this returns, whatever the outcome.
    pub(crate) fn parse(self) -> Result<Registry, ConfigError> {
        let Self { reader, origin } = self;
        let mut registry = Registry::default();
        let _ = reader.split(b'\n').enumerate().try_fold(
            ParseState::Global,
            |state, (index, bytes)| {
                let bytes = bytes.map_err(|source| ConfigError::Unreadable {
                    path: origin.clone(),
                    source,
                })?;
                let decoded = String::from_utf8_lossy(&bytes);
                let mut line: &str = &decoded;
                line = line.strip_suffix('\r').unwrap_or(line);
                if index == 0 {
                    line = line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line);
                }
                registry.apply_line(state, index + 1, line)
            },
        )?;
        Ok(registry)
    }
}

///////////////////////////////////////////////////////////////////////////////////////
