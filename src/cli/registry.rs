use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Heading a command is listed under in `help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandGroup {
    Firms,
    Insights,
    Reports,
    Account,
    Shell,
}

impl CommandGroup {
    pub const ALL: [CommandGroup; 5] = [
        CommandGroup::Firms,
        CommandGroup::Insights,
        CommandGroup::Reports,
        CommandGroup::Account,
        CommandGroup::Shell,
    ];

    pub fn title(self) -> &'static str {
        match self {
            CommandGroup::Firms => "Firm selection",
            CommandGroup::Insights => "Dashboard",
            CommandGroup::Reports => "Reports",
            CommandGroup::Account => "Plan and account",
            CommandGroup::Shell => "Shell",
        }
    }
}

/// What the first argument of a command completes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgCompletion {
    #[default]
    Nothing,
    Words(&'static [&'static str]),
    FirmIds,
    ReportKinds,
    CommandNames,
}

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub group: CommandGroup,
    pub completion: ArgCompletion,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub fn new(
        group: CommandGroup,
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            group,
            completion: ArgCompletion::Nothing,
            handler,
        }
    }

    pub fn completes(mut self, completion: ArgCompletion) -> Self {
        self.completion = completion;
        self
    }
}

/// Shell commands in registration order. Re-registering a name replaces the entry in place.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        match self.entries.iter_mut().find(|known| known.name == entry.name) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    /// Non-empty groups in heading order, commands in registration order.
    pub fn grouped(&self) -> Vec<(CommandGroup, Vec<&CommandEntry>)> {
        CommandGroup::ALL
            .into_iter()
            .map(|group| {
                let members = self
                    .entries
                    .iter()
                    .filter(|entry| entry.group == group)
                    .collect::<Vec<_>>();
                (group, members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect()
    }

    pub fn completions(&self) -> Vec<(&'static str, ArgCompletion)> {
        self.entries
            .iter()
            .map(|entry| (entry.name, entry.completion))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn reregistering_replaces_without_reordering() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new(CommandGroup::Shell, "exit", "old", "exit", noop));
        registry.register(CommandEntry::new(CommandGroup::Firms, "save", "save", "save", noop));
        registry.register(CommandEntry::new(CommandGroup::Shell, "exit", "new", "exit", noop));

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["exit", "save"]);
        assert_eq!(registry.get("exit").map(|entry| entry.description), Some("new"));
    }

    #[test]
    fn grouping_follows_heading_order_and_skips_empty_groups() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new(CommandGroup::Shell, "help", "", "help", noop));
        registry.register(
            CommandEntry::new(CommandGroup::Firms, "toggle", "", "toggle", noop)
                .completes(ArgCompletion::FirmIds),
        );

        let groups: Vec<_> = registry
            .grouped()
            .into_iter()
            .map(|(group, members)| (group, members.len()))
            .collect();
        assert_eq!(groups, vec![(CommandGroup::Firms, 1), (CommandGroup::Shell, 1)]);
        assert!(registry
            .completions()
            .contains(&("toggle", ArgCompletion::FirmIds)));
    }
}
