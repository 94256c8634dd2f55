use crate::cli::commands::usage;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::{ArgCompletion, CommandEntry, CommandGroup};
use crate::core::services::BankService;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Account,
        "bank",
        "Show or change the bank connection flag",
        "bank [status|connect|disconnect]",
        cmd_bank,
    )
    .completes(ArgCompletion::Words(&["status", "connect", "disconnect"]))]
}

fn cmd_bank(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let storage = context.storage.as_ref();
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("status") => {
            let state = if BankService::is_connected(storage)? {
                "connected"
            } else {
                "not connected"
            };
            io::print_info(format!("Bank account: {state}"));
        }
        Some("connect") => {
            BankService::connect(storage)?;
            io::print_success("Bank account connected.");
        }
        Some("disconnect") => {
            BankService::disconnect(storage)?;
            io::print_info("Bank account disconnected.");
        }
        Some(_) => return Err(usage("bank [status|connect|disconnect]")),
    }
    Ok(())
}
