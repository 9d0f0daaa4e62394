//! Slash commands for the REPL.
//!
//! Anything that is not a registered name or alias falls through as
//! [`CommandResult::NotACommand`] and is parsed as a form edit instead.

mod currencies;
mod help;
mod mode;
mod quit;
mod state;
mod stats;
mod swap;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::controller::Controller;
use crate::form::state::{RaceMode, Stats};

/// Printed under the command list by `/help`.
const EDIT_SYNTAX: &str = "\
  100 usd eur           convert 100 USD to EUR
  amount 42             change one field (amount, from, to)
  250                   change only the amount
";

/// What a command can see about the running session.
pub struct SessionInfo<'a> {
    pub provider: &'a str,
    pub base_url: &'a str,
    pub race_mode: RaceMode,
    pub timeout: Option<Duration>,
    pub stats: Stats,
    /// `None` in tests that only exercise printing.
    pub controller: Option<&'a Controller>,
}

/// Settings a command asks the REPL to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    RaceMode(RaceMode),
}

pub enum CommandResult {
    /// The line is a form edit.
    NotACommand,
    Handled,
    StateChanged(StateChange),
    Quit,
}

#[async_trait]
pub trait Command: Send + Sync {
    /// Primary trigger, e.g. `"/state"`.
    fn name(&self) -> &str;

    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// One line for `/help`.
    fn description(&self) -> &str;

    /// `args` is the rest of the line after the trigger, trimmed.
    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult;
}

pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let commands: Vec<Arc<dyn Command>> = vec![
            Arc::new(help::HelpCommand),
            Arc::new(state::StateCommand),
            Arc::new(currencies::CurrenciesCommand),
            Arc::new(swap::SwapCommand),
            Arc::new(mode::ModeCommand),
            Arc::new(stats::StatsCommand),
            Arc::new(quit::QuitCommand),
        ];
        Self { commands }
    }

    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.push(command);
    }

    fn find(&self, trigger: &str) -> Option<&Arc<dyn Command>> {
        self.commands
            .iter()
            .find(|c| c.name() == trigger || c.aliases().contains(&trigger))
    }

    /// Run the command a line starts with. Unknown `/words` are reported
    /// here; everything else is handed back as [`CommandResult::NotACommand`].
    pub async fn dispatch(&self, input: &str, info: &SessionInfo<'_>) -> CommandResult {
        let line = input.trim();
        let (trigger, args) = match line.split_once(char::is_whitespace) {
            Some((trigger, rest)) => (trigger, rest.trim()),
            None => (line, ""),
        };

        if let Some(command) = self.find(trigger) {
            if command.name() == "/help" {
                print!("{}", self.help_text());
                return CommandResult::Handled;
            }
            return command.execute(args, info).await;
        }

        if trigger.starts_with('/') {
            println!("unknown command: {trigger}");
            match self.suggest(trigger).as_slice() {
                [] => println!("type /help for available commands"),
                names => println!("did you mean {}?", names.join(" or ")),
            }
            return CommandResult::Handled;
        }

        CommandResult::NotACommand
    }

    /// Command names that start with what was typed (`/cur` → `/currencies`).
    pub fn suggest(&self, typed: &str) -> Vec<&str> {
        if typed.len() < 2 {
            return Vec::new();
        }
        self.commands
            .iter()
            .map(|c| c.name())
            .filter(|name| name.starts_with(typed))
            .collect()
    }

    pub fn help_text(&self) -> String {
        let labels: Vec<String> = self
            .commands
            .iter()
            .map(|c| format_label(c.name(), c.aliases()))
            .collect();
        let width = labels.iter().map(String::len).max().unwrap_or(0);

        let mut out = String::new();
        for (label, command) in labels.iter().zip(&self.commands) {
            out.push_str(&format!("  {label:<width$}  {}\n", command.description()));
        }
        out.push('\n');
        out.push_str(EDIT_SYNTAX);
        out
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// Every name and alias, in registration order.
    pub fn all_triggers(&self) -> Vec<&str> {
        self.commands
            .iter()
            .flat_map(|c| std::iter::once(c.name()).chain(c.aliases().iter().copied()))
            .collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn format_label(name: &str, aliases: &[&str]) -> String {
    match aliases {
        [] => name.to_string(),
        _ => format!("{name} ({})", aliases.join(", ")),
    }
}
