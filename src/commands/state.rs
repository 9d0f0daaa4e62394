use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::form::state::ConversionStatus;

pub struct StateCommand;

#[async_trait]
impl Command for StateCommand {
    fn name(&self) -> &str {
        "/state"
    }

    fn description(&self) -> &str {
        "show the form, request status, and provider settings"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        if let Some(controller) = info.controller {
            let state = controller.state();
            let request = state.request();
            println!("  amount    {:?}", request.amount);
            println!("  from      {}", request.from);
            println!("  to        {}", request.to);
            println!("  status    {}", status_label(state.status()));
            println!("  request   #{}", state.generation());
        }
        println!("  provider  {} ({})", info.provider, info.base_url);
        println!("  races     {}", info.race_mode);
        match info.timeout {
            Some(limit) => println!("  timeout   {}s", limit.as_secs_f64()),
            None => println!("  timeout   none"),
        }
        CommandResult::Handled
    }
}

fn status_label(status: &ConversionStatus) -> String {
    match status {
        ConversionStatus::Idle => "idle".to_string(),
        ConversionStatus::Loading => "loading".to_string(),
        ConversionStatus::Error(message) => format!("error ({message})"),
        ConversionStatus::Ready => "ready".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_info;

    #[tokio::test]
    async fn returns_handled() {
        assert!(matches!(
            StateCommand.execute("", &test_info()).await,
            CommandResult::Handled
        ));
    }

    #[test]
    fn metadata() {
        assert_eq!(StateCommand.name(), "/state");
        assert!(StateCommand.aliases().is_empty());
    }

    #[test]
    fn status_labels() {
        assert_eq!(status_label(&ConversionStatus::Idle), "idle");
        assert_eq!(
            status_label(&ConversionStatus::Error("boom".to_string())),
            "error (boom)"
        );
    }
}
