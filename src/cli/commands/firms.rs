use crate::cli::commands::usage;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{ArgCompletion, CommandEntry, CommandGroup};
use crate::cli::table::{Table, TableColumn};
use crate::core::firm_selection::FirmSelection;
use crate::core::services::SettingsService;
use crate::domain::{Displayable, PlanPolicy};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandGroup::Firms,
            "firms",
            "List tracked prop firms",
            "firms [saved|pending]",
            cmd_firms,
        )
        .completes(ArgCompletion::Words(&["saved", "pending"])),
        CommandEntry::new(
            CommandGroup::Firms,
            "toggle",
            "Select or deselect a firm (unsaved until `save`)",
            "toggle <firm-id>",
            cmd_toggle,
        )
        .completes(ArgCompletion::FirmIds),
        CommandEntry::new(
            CommandGroup::Firms,
            "add-firm",
            "Add a custom firm matched by keyword",
            "add-firm <name> <keyword>",
            cmd_add_firm,
        ),
        CommandEntry::new(
            CommandGroup::Firms,
            "save",
            "Persist pending firm changes",
            "save",
            cmd_save,
        ),
        CommandEntry::new(
            CommandGroup::Firms,
            "discard",
            "Drop pending firm changes",
            "discard",
            cmd_discard,
        ),
    ]
}

fn cmd_firms(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (title, selection) = match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("saved") => ("Prop firms", context.firms.committed()),
        Some("pending") => ("Prop firms (pending)", context.firms.pending()),
        Some(_) => return Err(usage("firms [saved|pending]")),
    };
    output_section(title);
    io::print_info(render_selection(selection));

    let limit = PlanPolicy::limit_for(context.plan);
    io::print_info(format!(
        "{} selected, {} plan limit: {limit}",
        selection.selected_count(),
        context.plan
    ));
    if context.firms.has_pending_changes() {
        io::print_hint("Unsaved changes. Use `save` or `discard`.");
    }
    Ok(())
}

fn render_selection(selection: &FirmSelection) -> String {
    let mut table = Table::new(vec![
        TableColumn::left(" "),
        TableColumn::left("Id"),
        TableColumn::left("Name").max(28),
        TableColumn::left("Matches").max(40),
    ]);
    for firm in selection.firms() {
        let mark = if firm.is_selected { "x" } else { "" };
        let name = if firm.is_custom {
            format!("{} (custom)", firm.name)
        } else {
            firm.name.clone()
        };
        table.push(vec![
            mark.to_string(),
            firm.id.clone(),
            name,
            firm.description.clone(),
        ]);
    }
    table.render()
}

fn cmd_toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(usage("toggle <firm-id>"));
    };
    let selected = SettingsService::toggle(&mut context.firms, id, context.plan)?;
    let state = if selected { "selected" } else { "deselected" };
    io::print_success(format!("`{id}` {state}. Run `save` to keep it."));
    Ok(())
}

fn cmd_add_firm(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, keyword] = args else {
        return Err(usage("add-firm <name> <keyword>"));
    };
    let firm = SettingsService::add_custom(&mut context.firms, name, keyword, context.plan)?;
    io::print_success(format!("Added {}. Run `save` to keep it.", firm.display_label()));
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.firms.has_pending_changes() {
        io::print_info("No pending changes.");
        return Ok(());
    }
    SettingsService::save(&mut context.firms)?;
    io::print_success("Firm preferences saved.");
    Ok(())
}

fn cmd_discard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.firms.has_pending_changes() {
        io::print_info("No pending changes.");
        return Ok(());
    }
    SettingsService::discard(&mut context.firms);
    io::print_info("Pending changes discarded.");
    Ok(())
}
