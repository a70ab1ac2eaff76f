// syncd top-level command-line arguments
// (c) 2024 Ross Younger

use std::path::PathBuf;

use clap::Parser;

use crate::config::BASE_CONFIG_FILENAME;

#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version(env!("SYNCD_VERSION_STRING")),
    about,
    before_help = "e.g.   syncd --config rsyncd.conf --list",
    infer_long_args(true)
)]
#[command(help_template(
    "\
{name} version {version}
{about-with-newline}
{usage-heading} {usage}
{before-help}
{all-args}{after-help}
"
))]
#[command(styles=crate::cli::styles::CLAP_STYLES)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CliArgs {
    // CONFIGURATION SOURCE ================================================================
    /// Configuration file name.
    ///
    /// Only the filename is used; the file is always looked up in the
    /// system configuration directory (or `--config-dir`, if given).
    #[arg(short, long, value_name("FILE"), default_value(BASE_CONFIG_FILENAME))]
    pub config: PathBuf,

    /// Looks for the configuration file in this directory instead of the system one
    #[arg(long, value_name("DIR"))]
    pub config_dir: Option<PathBuf>,

    // MODES ===============================================================================
    /// Prints the resolved configuration file path, then exits
    #[arg(long, action, help_heading("Modes"), conflicts_with_all(["show_config", "module"]))]
    pub config_file: bool,

    /// Shows the global settings and the line each came from
    #[arg(long, action, help_heading("Modes"))]
    pub show_config: bool,

    /// Shows every setting of a single module
    #[arg(short, long, value_name("NAME"), help_heading("Modes"))]
    pub module: Option<String>,

    // DEBUG ===============================================================================
    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=syncd=debug` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, help_heading("Debug"), conflicts_with("quiet"))]
    pub debug: bool,

    /// Reports only errors
    #[arg(short, long, action, help_heading("Debug"))]
    pub quiet: bool,
}

impl CliArgs {
    pub(crate) fn trace_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod test {
    use clap::Parser as _;

    use super::CliArgs;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["syncd"]).unwrap();
        assert_eq!(args.config.to_str(), Some("syncd.conf"));
        assert!(args.config_dir.is_none());
        assert_eq!(args.trace_level(), "info");
    }

    #[test]
    fn module_and_debug() {
        let args = CliArgs::try_parse_from(["syncd", "-d", "--module", "backup"]).unwrap();
        assert_eq!(args.module.as_deref(), Some("backup"));
        assert_eq!(args.trace_level(), "debug");
    }

    #[test]
    fn conflicts() {
        assert!(CliArgs::try_parse_from(["syncd", "-d", "-q"]).is_err());
        assert!(CliArgs::try_parse_from(["syncd", "--config-file", "--show-config"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory as _;
        CliArgs::command().debug_assert();
    }
}
