use chrono::Local;

use crate::cli::commands::{dashboard::build_view, parse_arg, usage};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::{ArgCompletion, CommandEntry, CommandGroup};
use crate::currency::AmountFormatter;
use crate::domain::DashboardPeriod;
use crate::report::{ExportFormat, ReportContext, ReportRange, ReportRequest, ReportService};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Reports,
        "report",
        "Export an HTML report for the saved selection",
        "report <transactions|summary|performance|detailed|custom|all-in-one> [7d|30d|3m|6m|1y|all] [pdf|csv|xlsx]",
        cmd_report,
    )
    .completes(ArgCompletion::ReportKinds)]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let request = match args {
        [kind] => ReportRequest::new(
            parse_arg(kind)?,
            ReportRange::default(),
            ExportFormat::default(),
        ),
        [kind, range] => ReportRequest::new(
            parse_arg(kind)?,
            parse_arg(range)?,
            ExportFormat::default(),
        ),
        [kind, range, format] => {
            ReportRequest::new(parse_arg(kind)?, parse_arg(range)?, parse_arg(format)?)
        }
        _ => return Err(usage("report <kind> [range] [format]")),
    };
    // Fail on a locked selector before computing anything.
    request.validate(context.plan)?;

    let view = build_view(context, DashboardPeriod::default())?;
    let formatter = AmountFormatter::from_config(&context.config);
    let report_context = ReportContext {
        plan: context.plan,
        generated_on: Local::now().date_naive(),
        aggregation: &view.aggregation,
        curve: &view.curve,
        formatter: &formatter,
    };
    let dir = context.config_manager.reports_dir(&context.config);
    let path = ReportService::export(&request, &report_context, &dir)?;
    io::print_success(format!(
        "{} report ({}) written to {}",
        request.kind.title(),
        request.range.label(),
        path.display()
    ));
    if request.format != ExportFormat::default() {
        io::print_hint(format!(
            "{} requested; the file is saved as HTML.",
            request.format.label()
        ));
    }
    Ok(())
}
