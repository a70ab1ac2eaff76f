//! Pretty-printing support
// (c) 2024 Ross Younger

use std::path::Path;

use strum::IntoEnumIterator as _;
use tabled::{settings::style::Style, Table, Tabled};

use super::{ConfigError, ConfigStore, GlobalKey, Module, ModuleKey, Setting};

#[derive(Tabled)]
struct ModuleRow {
    name: String,
    path: String,
    #[tabled(rename = "read only")]
    read_only: bool,
    #[tabled(rename = "write only")]
    write_only: bool,
    comment: String,
}

impl From<&Module> for ModuleRow {
    fn from(m: &Module) -> Self {
        Self {
            name: m.name().to_owned(),
            path: m.path.clone(),
            read_only: m.read_only,
            write_only: m.write_only,
            comment: m.comment.clone(),
        }
    }
}

#[derive(Tabled)]
struct PrettySetting {
    field: String,
    value: String,
    source: String,
}

impl PrettySetting {
    fn new(field: &str, value: String, source: String) -> Self {
        Self {
            field: field.into(),
            value,
            source,
        }
    }

    fn global(key: GlobalKey, setting: Option<&Setting>, origin: &Path) -> Self {
        match setting {
            Some(Setting { line_number, value }) => Self::new(
                key.into(),
                value.clone(),
                format!("{} (line {line_number})", origin.display()),
            ),
            None => Self::new(key.into(), String::new(), "not set".into()),
        }
    }

    fn module_field(key: ModuleKey, value: String) -> Self {
        Self::new(key.into(), value, String::new())
    }
}

/// Every field of one module, all taken from the same snapshot
fn module_rows(module: &Module) -> Vec<PrettySetting> {
    vec![
        PrettySetting::new("name", module.name().to_owned(), String::new()),
        PrettySetting::module_field(ModuleKey::Path, module.path.clone()),
        PrettySetting::module_field(ModuleKey::Comment, module.comment.clone()),
        PrettySetting::module_field(ModuleKey::ReadOnly, module.read_only.to_string()),
        PrettySetting::module_field(ModuleKey::WriteOnly, module.write_only.to_string()),
        PrettySetting::module_field(ModuleKey::HostsAllow, module.hosts_allow.clone()),
        PrettySetting::module_field(ModuleKey::HostsDeny, module.hosts_deny.clone()),
        PrettySetting::module_field(ModuleKey::AuthUsers, module.auth_users.clone()),
        PrettySetting::module_field(ModuleKey::SecretsFile, module.secrets_file.clone()),
    ]
}

impl ConfigStore {
    /// Renders all modules, one per row
    #[must_use]
    pub fn modules_table(&self) -> Table {
        let rows: Vec<ModuleRow> = self.modules().iter().map(ModuleRow::from).collect();
        let mut table = Table::new(rows);
        let _ = table.with(Style::sharp());
        table
    }

    /// Renders the global settings and where each came from
    #[must_use]
    pub fn globals_table(&self) -> Table {
        let registry = self.lock();
        let rows: Vec<_> = GlobalKey::iter()
            .map(|key| PrettySetting::global(key, registry.get(key), self.path()))
            .collect();
        drop(registry);
        let mut table = Table::new(rows);
        let _ = table.with(Style::sharp());
        table
    }

    /// Renders every setting of the module at `index`
    pub fn module_table(&self, index: usize) -> Result<Table, ConfigError> {
        let rows = module_rows(&self.get_module(index)?);
        let mut table = Table::new(rows);
        let _ = table.with(Style::sharp());
        Ok(table)
    }
}
