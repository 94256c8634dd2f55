//! Input loop. A rustyline editor feeds the shell on a terminal, stdin lines feed it in script mode.

use std::io::{self, BufRead, Lines};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output::{set_preferences, OutputPreferences};
use crate::cli::registry::ArgCompletion;
use crate::report::ReportKind;

pub const SCRIPT_ENV: &str = "PROPFLOW_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    set_preferences(OutputPreferences {
        plain_mode: mode == CliMode::Script,
    });

    let mut context = ShellContext::new(mode)?;
    tracing::debug!(?mode, plan = %context.plan, "shell started");

    match mode {
        CliMode::Interactive => {
            let mut input = TerminalInput::new(&context)?;
            cli_io::print_info("PropFlow shell. Type `help` to list commands.");
            drive(&mut context, &mut input)
        }
        CliMode::Script => drive(&mut context, &mut ScriptInput::new(io::stdin().lock())),
    }
}

enum Input {
    Line(String),
    Interrupted,
    Closed,
}

trait LineSource {
    fn next_input(&mut self, context: &ShellContext) -> Result<Input, CliError>;
}

fn drive(context: &mut ShellContext, source: &mut impl LineSource) -> Result<(), CliError> {
    while context.running {
        match source.next_input(context)? {
            Input::Line(line) => match context.execute_line(line.trim()) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) => context.report_error(err),
            },
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Input::Closed => {
                if context.mode == CliMode::Interactive {
                    cli_io::print_info("Exiting shell.");
                }
                break;
            }
        }
    }
    Ok(())
}

struct ScriptInput<R> {
    lines: Lines<R>,
}

impl<R: BufRead> ScriptInput<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for ScriptInput<R> {
    fn next_input(&mut self, _context: &ShellContext) -> Result<Input, CliError> {
        match self.lines.next() {
            Some(line) => Ok(Input::Line(line?)),
            None => Ok(Input::Closed),
        }
    }
}

struct TerminalInput {
    editor: Editor<ShellCompleter, DefaultHistory>,
}

impl TerminalInput {
    fn new(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::<ShellCompleter, DefaultHistory>::new()?;
        editor.set_helper(Some(ShellCompleter::new(context)));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineSource for TerminalInput {
    fn next_input(&mut self, context: &ShellContext) -> Result<Input, CliError> {
        // Firm ids change with `add-firm`, so candidates follow the pending selection.
        if let Some(helper) = self.editor.helper_mut() {
            helper.refresh(context);
        }
        match self.editor.readline(&context.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.trim()).ok();
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Closed),
            Err(err) => Err(err.into()),
        }
    }
}

/// Completes the command word, then the first argument according to the command's hint.
struct ShellCompleter {
    commands: Vec<(&'static str, ArgCompletion)>,
    firm_ids: Vec<String>,
}

impl ShellCompleter {
    fn new(context: &ShellContext) -> Self {
        let mut completer = Self {
            commands: context.registry.completions(),
            firm_ids: Vec::new(),
        };
        completer.refresh(context);
        completer
    }

    fn refresh(&mut self, context: &ShellContext) {
        self.firm_ids = context
            .firms
            .pending()
            .firms()
            .iter()
            .map(|firm| firm.id.clone())
            .collect();
    }

    fn options_for(&self, command: &str) -> Vec<&str> {
        let hint = self
            .commands
            .iter()
            .find(|(name, _)| *name == command)
            .map(|(_, hint)| *hint)
            .unwrap_or_default();
        match hint {
            ArgCompletion::Nothing => Vec::new(),
            ArgCompletion::Words(words) => words.to_vec(),
            ArgCompletion::FirmIds => self.firm_ids.iter().map(String::as_str).collect(),
            ArgCompletion::ReportKinds => ReportKind::ALL.iter().map(|kind| kind.token()).collect(),
            ArgCompletion::CommandNames => self.commands.iter().map(|(name, _)| *name).collect(),
        }
    }

    /// Start offset of the word under the cursor and its candidates.
    fn candidates(&self, prefix: &str) -> (usize, Vec<String>) {
        let start = prefix
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map(|(idx, ch)| idx + ch.len_utf8())
            .unwrap_or(0);
        let needle = prefix[start..].to_lowercase();
        let before: Vec<&str> = prefix[..start].split_whitespace().collect();

        let options: Vec<&str> = match before.as_slice() {
            [] => self.commands.iter().map(|(name, _)| *name).collect(),
            [command] => self.options_for(&command.to_lowercase()),
            _ => Vec::new(),
        };
        let matches = options
            .into_iter()
            .filter(|option| option.starts_with(&needle))
            .map(str::to_string)
            .collect();
        (start, matches)
    }
}

impl Helper for ShellCompleter {}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;
}

impl Highlighter for ShellCompleter {}

impl Validator for ShellCompleter {}
