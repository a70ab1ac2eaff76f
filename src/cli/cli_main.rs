// Main CLI entrypoint
// (c) 2024 Ross Younger

use std::process::ExitCode;

use super::{args::CliArgs, styles};

use crate::{
    config::ConfigStore,
    daemon::{exit_fatally, DaemonSettings},
    util::{setup_tracing, LogSink},
};
use anstream::{eprintln, println};
use clap::Parser;
use tracing::{info, warn};

/// Main CLI entrypoint
pub fn cli() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    let store = match &args.config_dir {
        Some(dir) => ConfigStore::in_directory(dir, &args.config),
        None => ConfigStore::new(&args.config),
    };
    if args.config_file {
        println!("{}", store.path().display());
        return Ok(ExitCode::SUCCESS);
    }

    let sink = setup_tracing(args.trace_level()).inspect_err(|e| eprintln!("{e:?}"))?;
    let settings = load_or_die(&store, &sink);

    if let Some(name) = &args.module {
        return Ok(show_module(&store, name));
    }
    if args.show_config {
        println!("{}", store.globals_table());
        println!(
            "{h}listening on{h:#} {}:{}",
            settings.bind_address.as_deref().unwrap_or("*"),
            settings.listen_port,
            h = styles::HEADING
        );
        return Ok(ExitCode::SUCCESS);
    }
    println!("{}", store.modules_table());
    Ok(ExitCode::SUCCESS)
}

/// Loads the configuration, terminating the process if that is not possible
fn load_or_die(store: &ConfigStore, sink: &LogSink) -> DaemonSettings {
    let mut settings = DaemonSettings::default();
    if let Err(e) = store.load(&mut settings) {
        exit_fatally("failed to load configuration", Some(&e));
    }
    // The daemon keeps its own handle; the tracing layer gets a second one.
    if let Some(file) = &settings.log_file {
        match file.try_clone() {
            Ok(handle) => {
                sink.attach(handle);
                info!("logging to {}", store.log_file().unwrap_or_default().display());
            }
            Err(e) => warn!("could not duplicate log file handle: {e}"),
        }
    }
    settings
}

fn show_module(store: &ConfigStore, name: &str) -> ExitCode {
    let Some(index) = store.find_module_index(name) else {
        eprintln!(
            "{e}error:{e:#} no module named `{name}` in {}",
            store.path().display(),
            e = styles::ERROR
        );
        return ExitCode::FAILURE;
    };
    match store.module_table(index) {
        Ok(table) => {
            println!("{table}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{s}error:{s:#} {e}", s = styles::ERROR);
            ExitCode::FAILURE
        }
    }
}
