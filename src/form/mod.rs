//! The conversion form: raw field values and the rule that decides what an
//! edit should do.
//!
//! Everything here is pure. [`plan`] looks at a [`ConversionRequest`] and
//! says whether to do nothing, answer immediately, or go to the network.

pub mod state;

use std::fmt;
use std::str::FromStr;

use crate::consts::{DEFAULT_FROM, DEFAULT_TO};
use crate::currency::Currency;

/// One editable field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Amount,
    From,
    To,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Amount => "amount",
            Field::From => "from",
            Field::To => "to",
        })
    }
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amount" => Ok(Field::Amount),
            "from" => Ok(Field::From),
            "to" => Ok(Field::To),
            other => anyhow::bail!("unknown field: {other}"),
        }
    }
}

/// The form as typed. Values are kept verbatim; nothing is validated on
/// write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub amount: String,
    pub from: String,
    pub to: String,
}

impl Default for ConversionRequest {
    fn default() -> Self {
        Self {
            amount: String::new(),
            from: DEFAULT_FROM.to_string(),
            to: DEFAULT_TO.to_string(),
        }
    }
}

impl ConversionRequest {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Amount => &self.amount,
            Field::From => &self.from,
            Field::To => &self.to,
        }
    }

    /// Overwrite one field. Returns `false` when the value is unchanged.
    pub fn set(&mut self, field: Field, value: &str) -> bool {
        let slot = match field {
            Field::Amount => &mut self.amount,
            Field::From => &mut self.from,
            Field::To => &mut self.to,
        };
        if slot == value {
            return false;
        }
        *slot = value.to_string();
        true
    }
}

/// Numeric coercion of the amount field.
///
/// Surrounding whitespace is ignored and an empty field counts as zero.
/// Only finite, strictly positive values qualify.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Rust accepts "inf"/"nan" spellings; the is_finite check drops them.
    let value: f64 = trimmed.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// A fully validated request, ready to hand to a provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateQuery {
    pub amount: f64,
    pub from: Currency,
    pub to: Currency,
}

/// Why a request did not qualify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    InvalidAmount,
    MissingCurrency(Field),
    UnsupportedCurrency(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidAmount => f.write_str("amount is not a positive number"),
            SkipReason::MissingCurrency(field) => write!(f, "{field} currency is empty"),
            SkipReason::UnsupportedCurrency(code) => write!(f, "unsupported currency {code:?}"),
        }
    }
}

/// What an edit to the form should lead to.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Nothing to convert. Status goes to idle and the result is cleared.
    Skip(SkipReason),
    /// Same currency on both sides: the answer is the amount as typed.
    Immediate(String),
    /// Ask the provider.
    Fetch(RateQuery),
}

pub fn plan(request: &ConversionRequest) -> Plan {
    let Some(amount) = parse_amount(&request.amount) else {
        return Plan::Skip(SkipReason::InvalidAmount);
    };
    let from = match currency_field(&request.from, Field::From) {
        Ok(c) => c,
        Err(reason) => return Plan::Skip(reason),
    };
    let to = match currency_field(&request.to, Field::To) {
        Ok(c) => c,
        Err(reason) => return Plan::Skip(reason),
    };

    if from == to {
        return Plan::Immediate(request.amount.clone());
    }

    Plan::Fetch(RateQuery { amount, from, to })
}

fn currency_field(raw: &str, field: Field) -> Result<Currency, SkipReason> {
    if raw.trim().is_empty() {
        return Err(SkipReason::MissingCurrency(field));
    }
    raw.parse()
        .map_err(|_| SkipReason::UnsupportedCurrency(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: &str, from: &str, to: &str) -> ConversionRequest {
        ConversionRequest {
            amount: amount.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn defaults_match_initial_form() {
        let r = ConversionRequest::default();
        assert_eq!(r.amount, "");
        assert_eq!(r.from, "USD");
        assert_eq!(r.to, "EUR");
    }

    #[test]
    fn set_reports_change() {
        let mut r = ConversionRequest::default();
        assert!(r.set(Field::Amount, "10"));
        assert!(!r.set(Field::Amount, "10"));
        assert!(!r.set(Field::From, "USD"));
        assert!(r.set(Field::To, "GBP"));
        assert_eq!(r.get(Field::To), "GBP");
    }

    #[test]
    fn parse_amount_accepts_positive_numbers() {
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount(" 2.5 "), Some(2.5));
        assert_eq!(parse_amount("007"), Some(7.0));
        assert_eq!(parse_amount("1e3"), Some(1000.0));
        assert_eq!(parse_amount(".5"), Some(0.5));
    }

    #[test]
    fn parse_amount_rejects_non_qualifying() {
        for raw in ["", "   ", "0", "0.0", "-5", "abc", "12abc", "NaN", "inf", "-inf"] {
            assert_eq!(parse_amount(raw), None, "{raw:?} should not qualify");
        }
    }

    #[test]
    fn plan_skips_bad_amount() {
        assert_eq!(
            plan(&request("", "USD", "EUR")),
            Plan::Skip(SkipReason::InvalidAmount)
        );
        assert_eq!(
            plan(&request("0", "USD", "EUR")),
            Plan::Skip(SkipReason::InvalidAmount)
        );
    }

    #[test]
    fn plan_skips_empty_currency() {
        assert_eq!(
            plan(&request("5", "", "EUR")),
            Plan::Skip(SkipReason::MissingCurrency(Field::From))
        );
        assert_eq!(
            plan(&request("5", "USD", " ")),
            Plan::Skip(SkipReason::MissingCurrency(Field::To))
        );
    }

    #[test]
    fn plan_skips_unsupported_currency() {
        assert_eq!(
            plan(&request("5", "USD", "JPY")),
            Plan::Skip(SkipReason::UnsupportedCurrency("JPY".to_string()))
        );
    }

    #[test]
    fn plan_same_currency_echoes_raw_amount() {
        assert_eq!(
            plan(&request("007.50", "GBP", "gbp")),
            Plan::Immediate("007.50".to_string())
        );
    }

    #[test]
    fn plan_fetch_uses_parsed_amount() {
        assert_eq!(
            plan(&request("007", "usd", "EUR")),
            Plan::Fetch(RateQuery {
                amount: 7.0,
                from: Currency::USD,
                to: Currency::EUR,
            })
        );
    }

    #[test]
    fn field_parse_and_display() {
        assert_eq!("Amount".parse::<Field>().unwrap(), Field::Amount);
        assert_eq!("to".parse::<Field>().unwrap(), Field::To);
        assert!("rate".parse::<Field>().is_err());
        assert_eq!(Field::From.to_string(), "from");
    }

    #[test]
    fn skip_reason_display() {
        assert_eq!(
            SkipReason::MissingCurrency(Field::From).to_string(),
            "from currency is empty"
        );
    }
}
