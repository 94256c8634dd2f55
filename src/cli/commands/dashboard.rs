use crate::cli::commands::{parse_arg, usage};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{ArgCompletion, CommandEntry, CommandGroup};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{DashboardService, DashboardView, ServiceResult};
use crate::currency::AmountFormatter;
use crate::domain::{DashboardPeriod, PlanPolicy, ReturnsScenario};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandGroup::Insights,
            "dashboard",
            "Totals and per-firm summary for the saved selection",
            "dashboard [30d|3m|6m|ytd|custom]",
            cmd_dashboard,
        )
        .completes(ArgCompletion::Words(&["30d", "3m", "6m", "ytd", "custom"])),
        CommandEntry::new(
            CommandGroup::Insights,
            "curve",
            "Cumulative profit series for the saved selection",
            "curve",
            cmd_curve,
        ),
        CommandEntry::new(
            CommandGroup::Insights,
            "scenario",
            "Show or switch the demonstration dataset",
            "scenario [positive|negative]",
            cmd_scenario,
        )
        .completes(ArgCompletion::Words(&["positive", "negative"])),
    ]
}

pub(crate) fn build_view(
    context: &ShellContext,
    period: DashboardPeriod,
) -> ServiceResult<DashboardView> {
    DashboardService::build(&context.firms, context.plan, context.scenario, period)
}

fn cmd_dashboard(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = match args {
        [] => DashboardPeriod::default(),
        [raw] => parse_arg::<DashboardPeriod>(raw)?,
        _ => return Err(usage("dashboard [30d|3m|6m|ytd|custom]")),
    };
    let view = build_view(context, period)?;
    let formatter = AmountFormatter::from_config(&context.config);

    output_section(format!(
        "Dashboard ({}, {} returns)",
        view.period.label(),
        view.scenario
    ));
    let totals = &view.aggregation.totals;
    io::print_info(format!("  Total spent    : {}", formatter.format(totals.spent)));
    io::print_info(format!("  Total received : {}", formatter.format(totals.received)));
    io::print_info(format!("  Net profit     : {}", formatter.format_signed(totals.net)));
    io::print_info(format!("  Transactions   : {}", totals.transaction_count));

    if view.effective.is_empty() {
        io::print_hint("No prop firms selected. Use `toggle <firm-id>` and `save`.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Firm").max(28),
        TableColumn::right("Spent"),
        TableColumn::right("Received"),
        TableColumn::right("Net"),
    ]);
    for row in &view.aggregation.firm_summaries {
        table.push(vec![
            row.name.clone(),
            formatter.format(row.spent),
            formatter.format(row.received),
            formatter.format_signed(row.net()),
        ]);
    }
    io::print_info(table.render());

    if view.hidden_count() > 0 {
        io::print_warning(format!(
            "{} selected firm(s) hidden. {}",
            view.hidden_count(),
            PlanPolicy::limit_message(view.plan)
        ));
    }
    Ok(())
}

fn cmd_curve(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = build_view(context, DashboardPeriod::default())?;
    let formatter = AmountFormatter::from_config(&context.config);

    output_section("Profit curve");
    if view.curve.is_empty() {
        io::print_info("No transactions for the selected firms.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::left("Firm").max(24),
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::right("Cumulative"),
    ]);
    for point in &view.curve {
        table.push(vec![
            point.date.clone(),
            point.firm.clone(),
            point.category.to_string(),
            formatter.format_signed(point.amount),
            formatter.format(point.cumulative_net),
        ]);
    }
    io::print_info(table.render());
    if view.curve_non_negative {
        io::print_success("Cumulative result is at or above break-even.");
    } else {
        io::print_warning("Cumulative result is below break-even.");
    }
    Ok(())
}

fn cmd_scenario(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            io::print_info(format!("Returns scenario: {}", context.scenario));
            Ok(())
        }
        [raw] => {
            context.scenario = parse_arg::<ReturnsScenario>(raw)?;
            io::print_success(format!("Returns scenario set to {}.", context.scenario));
            Ok(())
        }
        _ => Err(usage("scenario [positive|negative]")),
    }
}
