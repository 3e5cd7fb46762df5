//! Shell command definitions grouped by topic.

pub mod asset;
pub mod config;
pub mod reference;
pub mod register;
pub mod report;
pub mod schedule;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        system::definitions(),
        register::definitions(),
        reference::definitions(),
        asset::definitions(),
        schedule::definitions(),
        report::definitions(),
        config::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}

/// Splits `args` into the subcommand and its arguments.
pub(crate) fn split_subcommand<'a, 'b>(
    args: &'b [&'a str],
    usage: &str,
) -> Result<(String, &'b [&'a str]), CommandError> {
    match args.split_first() {
        Some((sub, rest)) => Ok((sub.to_ascii_lowercase(), rest)),
        None => Err(CommandError::InvalidArguments(format!("usage: {usage}"))),
    }
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {usage}"))
}
