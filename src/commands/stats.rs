use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::consts::format_number;

pub struct StatsCommand;

#[async_trait]
impl Command for StatsCommand {
    fn name(&self) -> &str {
        "/stats"
    }

    fn description(&self) -> &str {
        "show request counts for this session"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let stats = info.stats;
        if stats.issued == 0 {
            println!("  no requests sent this session");
        } else {
            println!(
                "  {} sent, {} applied ({} failed), {} discarded as stale",
                format_number(stats.issued),
                format_number(stats.applied),
                format_number(stats.failed),
                format_number(stats.discarded),
            );
        }
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_info;
    use crate::form::state::Stats;

    #[tokio::test]
    async fn returns_handled_zero() {
        assert!(matches!(
            StatsCommand.execute("", &test_info()).await,
            CommandResult::Handled
        ));
    }

    #[tokio::test]
    async fn returns_handled_with_counts() {
        let info = SessionInfo {
            stats: Stats {
                issued: 1234,
                applied: 1200,
                discarded: 34,
                failed: 2,
            },
            ..test_info()
        };
        assert!(matches!(
            StatsCommand.execute("", &info).await,
            CommandResult::Handled
        ));
    }
}
