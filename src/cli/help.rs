use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{ArgCompletion, CommandEntry, CommandRegistry};

/// One block per command group.
pub fn print_overview(registry: &CommandRegistry) {
    for (group, entries) in registry.grouped() {
        output_section(group.title());
        for entry in entries {
            io::print_info(format!("  {:<12} {}", entry.name, entry.description));
        }
    }
    io::print_hint("Use `help <command>` for details. Press Tab or `?` to complete.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("{} ({})", entry.name, entry.group.title()));
    io::print_info(format!("  {}", entry.description));
    io::print_info(format!("  Usage: {}", entry.usage));
    if let ArgCompletion::Words(words) = entry.completion {
        io::print_info(format!("  Options: {}", words.join(", ")));
    }
}
