use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, StateChange};
use crate::form::state::RaceMode;

pub struct ModeCommand;

#[async_trait]
impl Command for ModeCommand {
    fn name(&self) -> &str {
        "/mode"
    }

    fn description(&self) -> &str {
        "show or set how overlapping responses resolve (legacy|latest)"
    }

    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult {
        if args.is_empty() {
            println!("  race mode: {}", info.race_mode);
            println!("    latest  only the most recently issued request may update the result");
            println!("    legacy  whichever response lands last wins, even a stale one");
            return CommandResult::Handled;
        }

        let mode: RaceMode = match args.parse() {
            Ok(m) => m,
            Err(e) => {
                eprintln!("  ✗ {e}");
                return CommandResult::Handled;
            }
        };

        if mode == info.race_mode {
            println!("  already using {mode}");
            return CommandResult::Handled;
        }

        println!("  ✓ race mode changed to {mode}");
        CommandResult::StateChanged(StateChange::RaceMode(mode))
    }
}
