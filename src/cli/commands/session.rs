use crate::cli::commands::usage;
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::core::services::{SessionService, User};
use crate::gateway::AuthGateway;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandGroup::Account,
            "login",
            "Sign in through the auth proxy",
            "login <email> <password>",
            cmd_login,
        ),
        CommandEntry::new(
            CommandGroup::Account,
            "register",
            "Create an account through the auth proxy",
            "register <email> <password> [name]",
            cmd_register,
        ),
        CommandEntry::new(
            CommandGroup::Account,
            "whoami",
            "Show the signed-in user",
            "whoami",
            cmd_whoami,
        ),
        CommandEntry::new(
            CommandGroup::Account,
            "logout",
            "Sign out and clear all local data",
            "logout",
            cmd_logout,
        ),
    ]
}

fn gateway(context: &ShellContext) -> Result<AuthGateway, CommandError> {
    AuthGateway::http(context.config.effective_api_base_url())
        .map_err(|err| CommandError::Message(err.to_string()))
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [email, password] = args else {
        return Err(usage("login <email> <password>"));
    };
    let gateway = gateway(context)?;
    let user = SessionService::login(
        context.storage.as_ref(),
        &gateway,
        email,
        password,
        context.plan,
    )?;
    greet(&user);
    Ok(())
}

fn cmd_register(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (email, password, name) = match args {
        [email, password] => (*email, *password, ""),
        [email, password, name] => (*email, *password, *name),
        _ => return Err(usage("register <email> <password> [name]")),
    };
    let gateway = gateway(context)?;
    let user = SessionService::register(
        context.storage.as_ref(),
        &gateway,
        email,
        password,
        name,
        context.plan,
    )?;
    greet(&user);
    Ok(())
}

fn greet(user: &User) {
    let who = if user.name.is_empty() {
        user.email.as_str()
    } else {
        user.name.as_str()
    };
    io::print_success(format!("Signed in as {who} ({} plan).", user.plan));
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match SessionService::load_user(context.storage.as_ref())? {
        Some(user) if user.is_authenticated => {
            io::print_info(format!("{} <{}>, {} plan", user.name, user.email, user.plan));
        }
        _ => io::print_info("Not signed in."),
    }
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.mode == CliMode::Interactive
        && context.firms.has_pending_changes()
        && !io::confirm_action("Discard unsaved firm changes and sign out?")
            .map_err(|err| CommandError::Message(err.to_string()))?
    {
        return Ok(());
    }
    SessionService::logout(context.storage.as_ref())?;
    context.reload_session()?;
    io::print_info("Signed out. Local data cleared.");
    Ok(())
}
