//! syncd: module configuration for an rsync-style file synchronisation daemon
// (c) 2024 Ross Younger

mod cli;
pub use cli::cli;
pub mod config;
/// Daemon settings and fatal exit
pub mod daemon;
/// OS abstraction layer
pub mod os;
/// Utilities
pub mod util;
