#![doc(test(attr(deny(warnings))))]

//! Asset Register keeps a register of fixed assets and computes their
//! depreciation schedules, valuations and yearly charges.

pub mod cli;
pub mod core;
pub mod reports;
pub mod utils;

pub use crate::core::errors::{CliError, RegisterError, Result};
pub use crate::core::register_manager::RegisterManager;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(version = utils::build_info::CLI_VERSION, "asset register initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
