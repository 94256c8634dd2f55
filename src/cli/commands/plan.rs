use crate::cli::commands::usage;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{ArgCompletion, CommandEntry, CommandGroup};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::SessionService;
use crate::domain::{Capability, DashboardPeriod, Gated, Plan, PlanPolicy};
use crate::report::{ExportFormat, ReportKind, ReportRange};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Account,
        "plan",
        "Show the active plan or switch tiers",
        "plan [show|set <starter|standard|premium>]",
        cmd_plan,
    )
    .completes(ArgCompletion::Words(&["show", "set"]))]
}

fn cmd_plan(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("show") => {
            show(context.plan);
            Ok(())
        }
        Some("set") => {
            let raw = args.get(1).ok_or_else(|| usage("plan set <starter|standard|premium>"))?;
            let plan = parse_plan(raw)?;
            SessionService::update_plan(context.storage.as_ref(), plan)?;
            context.plan = plan;
            io::print_success(format!("Switched to the {plan} plan."));
            Ok(())
        }
        Some(_) => Err(usage("plan [show|set <starter|standard|premium>]")),
    }
}

/// Accepts the current tier names and the retired free/basic/pro aliases.
fn parse_plan(raw: &str) -> Result<Plan, CommandError> {
    raw.parse::<Plan>()
        .ok()
        .or_else(|| Plan::migrate_legacy(raw))
        .ok_or_else(|| CommandError::InvalidArguments(format!("Unknown plan: '{raw}'")))
}

fn show(plan: Plan) {
    output_section(format!("{plan} plan"));
    io::print_info(format!(
        "Prop firms tracked: {}",
        PlanPolicy::limit_for(plan)
    ));

    let mut table = Table::new(vec![
        TableColumn::left("Feature"),
        TableColumn::left("Requires"),
        TableColumn::left("Status"),
    ]);
    let mut push = |feature: &dyn GatedRow| {
        let status = if PlanPolicy::is_feature_available(plan, feature.required()) {
            "available"
        } else {
            "locked"
        };
        table.push(vec![
            feature.label().to_string(),
            feature.required().to_string(),
            status.to_string(),
        ]);
    };
    push(&Capability::CustomFirms);
    for period in DashboardPeriod::ALL {
        push(&period);
    }
    for kind in ReportKind::ALL {
        push(&kind);
    }
    for range in ReportRange::ALL {
        push(&range);
    }
    for format in ExportFormat::ALL {
        push(&format);
    }
    io::print_info(table.render());
}

// Object-safe view over `Gated` so mixed selectors share one table.
trait GatedRow {
    fn label(&self) -> &'static str;
    fn required(&self) -> Plan;
}

impl<T: Gated> GatedRow for T {
    fn label(&self) -> &'static str {
        self.feature_label()
    }

    fn required(&self) -> Plan {
        self.required_plan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_names_are_accepted() {
        assert_eq!(parse_plan("pro").unwrap(), Plan::Premium);
        assert_eq!(parse_plan("Standard").unwrap(), Plan::Standard);
        assert!(parse_plan("enterprise").is_err());
    }
}
