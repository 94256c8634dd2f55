//! Shell state, dispatch and error reporting.

use std::{io, path::PathBuf, sync::Arc};

use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigManager},
    core::{
        entitlement::EntitlementError,
        firm_selection::FirmSelectionStore,
        services::{ServiceError, SessionService},
    },
    domain::{Plan, ReturnsScenario},
    errors::PropFlowError,
    report::ReportError,
    storage::{JsonStorage, KeyValueStore},
    utils::paths::PathResolver,
};

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] PropFlowError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] PropFlowError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub storage: Arc<dyn KeyValueStore>,
    pub firms: FirmSelectionStore,
    pub plan: Plan,
    pub scenario: ReturnsScenario,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    /// Shell rooted at `base`: config, local storage and reports all live there.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let storage: Arc<dyn KeyValueStore> = Arc::new(JsonStorage::new(Some(base))?);
        Self::from_parts(mode, config_manager, config, storage)
    }

    pub fn from_parts(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let plan = SessionService::load_plan(storage.as_ref())?;
        let firms = FirmSelectionStore::initialize(storage.clone());
        Ok(Self {
            mode,
            registry,
            scenario: config.default_scenario,
            config_manager,
            config,
            storage,
            firms,
            plan,
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        let marker = if self.firms.has_pending_changes() {
            "*"
        } else {
            ""
        };
        format!("propflow [{}]{marker}> ", self.plan.as_str())
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// Re-reads selection state after the store was cleared underneath us.
    pub(crate) fn reload_session(&mut self) -> Result<(), CommandError> {
        self.plan = SessionService::load_plan(self.storage.as_ref())?;
        self.firms = FirmSelectionStore::initialize(self.storage.clone());
        Ok(())
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Tokenizes one input line and runs it. Blank lines and `#` comments are skipped.
    pub(crate) fn execute_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match shell_words::split(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(format!("Could not parse input: {err}"));
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        if raw.starts_with('#') {
            return Ok(LoopControl::Continue);
        }
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        let Some(handler) = self.registry.handler(&raw.to_lowercase()) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, &args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        let prompt = if self.firms.has_pending_changes() {
            "Discard unsaved firm changes and exit?"
        } else {
            "Exit shell?"
        };
        cli_io::confirm_action(prompt)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Service(ServiceError::Entitlement(err)) => {
                cli_io::print_error(&err);
                if !matches!(err, EntitlementError::FirmLimitReached { plan: Plan::Premium, .. }) {
                    cli_io::print_hint("Switch tiers with `plan set <starter|standard|premium>`.");
                }
            }
            CommandError::Report(err @ ReportError::Locked { .. }) => {
                cli_io::print_error(&err);
                cli_io::print_hint("Switch tiers with `plan set <starter|standard|premium>`.");
            }
            other => cli_io::print_error(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use tempfile::tempdir;

    fn context() -> (ShellContext, tempfile::TempDir) {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let context = ShellContext::from_parts(
            CliMode::Script,
            manager,
            Config::default(),
            Arc::new(MemoryStorage::new()),
        )
        .unwrap();
        (context, temp)
    }

    #[test]
    fn unknown_command_is_not_an_error() {
        let (mut ctx, _temp) = context();
        assert_eq!(ctx.execute_line("dashbord").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn exit_stops_the_loop() {
        let (mut ctx, _temp) = context();
        assert_eq!(ctx.execute_line("exit").unwrap(), LoopControl::Exit);
        assert!(!ctx.running);
    }

    #[test]
    fn comments_and_bad_quoting_are_skipped() {
        let (mut ctx, _temp) = context();
        assert_eq!(ctx.execute_line("# exit").unwrap(), LoopControl::Continue);
        assert_eq!(ctx.execute_line("add-firm \"Alpha").unwrap(), LoopControl::Continue);
        assert_eq!(ctx.execute_line("   ").unwrap(), LoopControl::Continue);
        assert!(ctx.running);
    }

    #[test]
    fn command_words_are_case_insensitive() {
        let (mut ctx, _temp) = context();
        assert_eq!(ctx.execute_line("EXIT").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn reported_errors_keep_the_shell_running() {
        let (mut ctx, _temp) = context();
        let err = ctx.execute_line("toggle ftmo").unwrap_err();
        ctx.report_error(err);
        ctx.report_error(CommandError::InvalidArguments("usage: toggle <firm-id>".into()));
        assert!(ctx.running);
        assert_eq!(ctx.execute_line("firms").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn prompt_marks_unsaved_changes() {
        let (mut ctx, _temp) = context();
        assert_eq!(ctx.prompt(), "propflow [starter]> ");
        ctx.execute_line("toggle topstep").unwrap();
        assert_eq!(ctx.prompt(), "propflow [starter]*> ");
        ctx.execute_line("save").unwrap();
        assert_eq!(ctx.prompt(), "propflow [starter]> ");
        assert!(!ctx.firms.is_selected("topstep"));
    }

    #[test]
    fn limit_rejection_surfaces_as_service_error() {
        let (mut ctx, _temp) = context();
        let err = ctx.execute_line("toggle ftmo").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Service(ServiceError::Entitlement(EntitlementError::FirmLimitReached { .. }))
        ));
        assert!(!ctx.firms.has_pending_changes());
    }

    #[test]
    fn plan_switch_unlocks_custom_firms() {
        let (mut ctx, _temp) = context();
        assert!(ctx.execute_line("add-firm \"Alpha Capital\" Alpha").is_err());
        ctx.execute_line("plan set premium").unwrap();
        ctx.execute_line("add-firm \"Alpha Capital\" Alpha").unwrap();
        ctx.execute_line("save").unwrap();
        assert!(ctx.firms.is_selected("alpha-capital"));
    }

    #[test]
    fn logout_resets_plan_and_firms() {
        let (mut ctx, _temp) = context();
        ctx.execute_line("plan set premium").unwrap();
        ctx.execute_line("toggle ftmo").unwrap();
        ctx.execute_line("save").unwrap();
        ctx.execute_line("logout").unwrap();
        assert_eq!(ctx.plan, Plan::Starter);
        assert!(!ctx.firms.is_selected("ftmo"));
    }
}
