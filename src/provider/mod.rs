pub mod frankfurter;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::currency::Currency;
use crate::error::ConvertError;

pub use crate::form::RateQuery;

/// Body of a "latest rates" response. Only `rates` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub amount: Option<f64>,
    pub base: Option<String>,
    pub date: Option<String>,
    pub rates: HashMap<String, f64>,
}

impl Rates {
    /// A response carrying a single converted value.
    pub fn single(to: Currency, value: f64) -> Self {
        Self {
            amount: None,
            base: None,
            date: None,
            rates: HashMap::from([(to.code().to_string(), value)]),
        }
    }

    /// The converted amount for `to`. Absence is a data-shape failure, not
    /// an empty result.
    pub fn converted(&self, to: Currency) -> Result<f64, ConvertError> {
        self.rates
            .get(to.code())
            .copied()
            .ok_or(ConvertError::MissingRate { currency: to })
    }
}

/// Where conversion rates come from. Could be the public API, or a test script.
#[async_trait]
pub trait RateProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn latest(&self, query: &RateQuery) -> Result<Rates>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_payload() {
        let json = r#"{"amount":100.0,"base":"USD","date":"2024-05-17","rates":{"EUR":92.5}}"#;
        let rates: Rates = serde_json::from_str(json).unwrap();
        assert_eq!(rates.base.as_deref(), Some("USD"));
        assert_eq!(rates.converted(Currency::EUR).unwrap(), 92.5);
    }

    #[test]
    fn decodes_rates_only_payload() {
        let rates: Rates = serde_json::from_str(r#"{"rates":{"INR":8312.0}}"#).unwrap();
        assert!(rates.amount.is_none());
        assert_eq!(rates.converted(Currency::INR).unwrap(), 8312.0);
    }

    #[test]
    fn missing_rates_field_fails_to_decode() {
        assert!(serde_json::from_str::<Rates>(r#"{"amount":1.0}"#).is_err());
    }

    #[test]
    fn missing_target_is_explicit_error() {
        let rates = Rates::single(Currency::GBP, 0.79);
        let err = rates.converted(Currency::EUR).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MissingRate {
                currency: Currency::EUR
            }
        ));
    }
}
