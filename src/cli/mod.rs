pub mod args;
pub mod commands;
pub mod core;
pub mod format;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod shell_context;
pub mod system_clock;
pub mod table;

pub use shell::{run_cli, SCRIPT_ENV};
