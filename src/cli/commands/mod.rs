pub mod bank;
pub mod config;
pub mod dashboard;
pub mod firms;
pub mod plan;
pub mod report;
pub mod session;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        system::definitions(),
        config::definitions(),
        plan::definitions(),
        firms::definitions(),
        dashboard::definitions(),
        report::definitions(),
        bank::definitions(),
        session::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}

/// Parses a selector argument, turning the parse failure into a usage error.
pub(crate) fn parse_arg<T>(raw: &str) -> Result<T, CommandError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|err: T::Err| CommandError::InvalidArguments(err.to_string()))
}

pub(crate) fn usage(text: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {text}"))
}
