//! The fixed set of currencies the form offers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    USD,
    EUR,
    CAD,
    INR,
    GBP,
    TRY,
}

impl Currency {
    /// Every supported currency, in selector order.
    pub const ALL: [Currency; 6] = [
        Currency::USD,
        Currency::EUR,
        Currency::CAD,
        Currency::INR,
        Currency::GBP,
        Currency::TRY,
    ];

    /// ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::CAD => "CAD",
            Currency::INR => "INR",
            Currency::GBP => "GBP",
            Currency::TRY => "TRY",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Currency::USD => "US dollar",
            Currency::EUR => "Euro",
            Currency::CAD => "Canadian dollar",
            Currency::INR => "Indian rupee",
            Currency::GBP => "Pound sterling",
            Currency::TRY => "Turkish lira",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a code is not one of [`Currency::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency: {0:?}")]
pub struct UnknownCurrency(pub String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_codes_are_three_uppercase_letters() {
        for c in Currency::ALL {
            assert_eq!(c.code().len(), 3);
            assert!(c.code().chars().all(|ch| ch.is_ascii_uppercase()));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("gbp".parse::<Currency>().unwrap(), Currency::GBP);
        assert_eq!(" Try ".parse::<Currency>().unwrap(), Currency::TRY);
    }

    #[test]
    fn parse_rejects_unknown_and_empty() {
        assert!("JPY".parse::<Currency>().is_err());
        assert!("".parse::<Currency>().is_err());
        let err = "XYZ".parse::<Currency>().unwrap_err();
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn display_is_code() {
        assert_eq!(Currency::INR.to_string(), "INR");
    }

    #[test]
    fn parse_display_agree_for_all() {
        for c in Currency::ALL {
            assert_eq!(c.to_string().parse::<Currency>().unwrap(), c);
        }
    }
}
