//! Shell context, dispatch and error reporting.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    core::{Journal, SystemClock},
    domain::Master,
    errors::JournalError,
    storage::JsonStateStore,
};

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};

pub const SCRIPT_ENV: &str = "SERVICE_JOURNAL_CLI_SCRIPT";

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

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Journal(#[from] JournalError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Errors that end the shell.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Journal(#[from] JournalError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Command failed: {0}")]
    Command(String),
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub journal: Journal,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Opens the journal in the data directory with the system clock.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let store = JsonStateStore::new(
            Some(config_manager.base_dir().to_path_buf()),
            Some(config.backup_retention),
        )?;
        let journal = Journal::open(Box::new(store), Box::new(SystemClock))?;
        Ok(Self::with_parts(mode, journal, config, config_manager))
    }

    pub fn with_parts(
        mode: CliMode,
        journal: Journal,
        config: Config,
        config_manager: ConfigManager,
    ) -> Self {
        output::set_preferences(OutputPreferences {
            plain_mode: mode == CliMode::Script,
        });
        Self {
            mode,
            registry: CommandRegistry::with_entries(commands::all_definitions()),
            journal,
            config,
            config_manager,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("journal [{}]> ", self.journal.current_date().format("%d.%m.%Y"))
    }

    pub(crate) fn export_dir(&self) -> PathBuf {
        self.config.export_dir_or(self.config_manager.base_dir())
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Parses and runs one line; used by the shell loops and by tests.
    pub fn process_line(&mut self, line: &str) -> Result<bool, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(true);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(true);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());
        match self.dispatch(&command, raw, &args)? {
            LoopControl::Continue => Ok(true),
            LoopControl::Exit => {
                self.running = false;
                Ok(false)
            }
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Always yes in script mode.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        self.confirm("Exit shell?")
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                self.usage_hint();
                Ok(())
            }
            CommandError::Journal(JournalError::Validation(message)) => {
                cli_io::print_error(&message);
                self.usage_hint();
                Ok(())
            }
            CommandError::Journal(err @ JournalError::IndexOutOfRange { .. }) => {
                cli_io::print_error(&err);
                cli_io::print_hint("Use `orders <master>` to see the current numbering.");
                Ok(())
            }
            CommandError::Journal(err @ JournalError::Persistence(_)) => {
                cli_io::print_error(&err);
                cli_io::print_hint(
                    "The change is kept in memory and will be written with the next successful save.",
                );
                Ok(())
            }
            other => {
                cli_io::print_error(&other);
                Ok(())
            }
        }
    }

    fn usage_hint(&self) {
        let usage = self
            .last_command
            .as_deref()
            .and_then(|line| line.split_whitespace().next())
            .and_then(|name| self.command(&name.to_lowercase()))
            .map(|entry| entry.usage);
        match usage {
            Some(usage) => cli_io::print_hint(format!("Usage: {}", usage)),
            None => cli_io::print_hint("Use `help <command>` for usage details."),
        }
    }
}

pub(crate) fn parse_master(input: &str) -> Result<Master, CommandError> {
    input.parse::<Master>().map_err(CommandError::from)
}

/// Accepts both `1500.5` and `1500,5`.
pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    input
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not an amount", input)))
}

/// One-based position as shown by `orders`.
pub(crate) fn parse_position(input: &str) -> Result<usize, CommandError> {
    match input.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{}` is not an order number (numbers start at 1)",
            input
        ))),
    }
}

pub(crate) fn parse_percent(input: &str) -> Result<i64, CommandError> {
    input
        .trim_end_matches('%')
        .parse::<i64>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not a percentage", input)))
}
