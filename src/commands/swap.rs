use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::form::ConversionRequest;

pub struct SwapCommand;

#[async_trait]
impl Command for SwapCommand {
    fn name(&self) -> &str {
        "/swap"
    }

    fn description(&self) -> &str {
        "swap the from and to currencies"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let controller = match info.controller {
            Some(c) => c,
            None => {
                eprintln!("  ✗ swap not available");
                return CommandResult::Handled;
            }
        };

        let current = controller.request();
        let swapped = ConversionRequest {
            amount: current.amount,
            from: current.to,
            to: current.from,
        };
        println!("  ✓ {} → {}", swapped.from, swapped.to);
        controller.submit(swapped);
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata() {
        assert_eq!(SwapCommand.name(), "/swap");
        assert!(SwapCommand.aliases().is_empty());
        assert!(!SwapCommand.description().is_empty());
    }

    #[tokio::test]
    async fn returns_handled_without_controller() {
        let info = super::super::tests::test_info();
        let result = SwapCommand.execute("", &info).await;
        assert!(matches!(result, CommandResult::Handled));
    }

    #[tokio::test]
    async fn swaps_currencies_on_controller() {
        use crate::controller::{Controller, ControllerConfig};
        use crate::provider::mock::MockProvider;
        use std::sync::Arc;

        let controller = Controller::new(
            Arc::new(MockProvider::new(vec![])),
            ControllerConfig::default(),
        );
        let info = super::super::SessionInfo {
            controller: Some(&controller),
            ..super::super::tests::test_info()
        };

        SwapCommand.execute("", &info).await;
        let request = controller.request();
        assert_eq!(request.from, "EUR");
        assert_eq!(request.to, "USD");
        // Empty amount: nothing was sent.
        controller.settle().await;
        assert_eq!(controller.stats().issued, 0);
    }
}
