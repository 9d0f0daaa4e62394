use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

/// Leaves the REPL. A request still in flight is aborted on the way out,
/// so its result would never be shown.
pub struct QuitCommand;

#[async_trait]
impl Command for QuitCommand {
    fn name(&self) -> &str {
        "/quit"
    }

    fn aliases(&self) -> &[&str] {
        &["quit", "exit", "/exit", "q"]
    }

    fn description(&self) -> &str {
        "exit, dropping any conversion still loading"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        if info.controller.is_some_and(|c| c.is_loading()) {
            println!("  dropping the pending conversion");
        }
        CommandResult::Quit
    }
}
