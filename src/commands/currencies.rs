use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::currency::Currency;

pub struct CurrenciesCommand;

#[async_trait]
impl Command for CurrenciesCommand {
    fn name(&self) -> &str {
        "/currencies"
    }

    fn description(&self) -> &str {
        "list supported currencies"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let request = info.controller.map(|c| c.request());
        for currency in Currency::ALL {
            let marker = match &request {
                Some(r) if r.from == currency.code() => "  ← from",
                Some(r) if r.to == currency.code() => "  ← to",
                _ => "",
            };
            println!("  {}  {}{}", currency, currency.name(), marker);
        }
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_info;

    #[tokio::test]
    async fn returns_handled_without_controller() {
        assert!(matches!(
            CurrenciesCommand.execute("", &test_info()).await,
            CommandResult::Handled
        ));
    }
}
