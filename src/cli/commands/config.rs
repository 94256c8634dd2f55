use crate::cli::commands::usage;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{ArgCompletion, CommandEntry, CommandGroup};
use crate::cli::table::{Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Shell,
        "config",
        "View and change shell preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )
    .completes(ArgCompletion::Words(&["show", "set"]))]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("show") => show(context),
        Some("set") if args.len() >= 3 => {
            let key = args[1];
            let value = args[2..].join(" ");
            context.config.set_value(key, &value)?;
            context.persist_config()?;
            io::print_success(format!("Updated `{key}`."));
            Ok(())
        }
        Some("set") => Err(usage(
            "config set <locale|currency|api_base_url|default_scenario|reports_dir> <value>",
        )),
        Some(_) => Err(usage("config [show|set <key> <value>]")),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    output_section("Configuration");
    let mut table = Table::new(vec![TableColumn::left("Key"), TableColumn::left("Value")]);
    table.push(vec!["locale".into(), config.locale.clone()]);
    table.push(vec!["currency".into(), config.currency.clone()]);
    table.push(vec!["api_base_url".into(), config.effective_api_base_url()]);
    table.push(vec![
        "default_scenario".into(),
        config.default_scenario.to_string(),
    ]);
    table.push(vec![
        "reports_dir".into(),
        context
            .config_manager
            .reports_dir(config)
            .display()
            .to_string(),
    ]);
    io::print_info(table.render());
    io::print_info(format!(
        "Stored at {}",
        context.config_manager.path().display()
    ));
    Ok(())
}
