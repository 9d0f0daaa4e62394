//! Project-wide constants.

use std::time::Duration;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Frankfurter, the public ECB-backed rate API.
pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

/// Form defaults at startup.
pub const DEFAULT_FROM: &str = "USD";
pub const DEFAULT_TO: &str = "EUR";

/// Request timeout used by the CLI when `--timeout` is not given.
pub const DEFAULT_CLI_TIMEOUT: Duration = Duration::from_secs(10);

/// Shown for any non-success HTTP status. The body is never inspected.
pub const HTTP_FAILURE_MESSAGE: &str = "Something went wrong..";

/// Shown when a failure carries no usable message of its own.
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Text of the result area while a request is in flight.
pub const LOADING_TEXT: &str = "Loading...";

/// Print a number the way the rate API's JSON numbers read: shortest
/// round-trip form, no trailing `.0` on integral values, and exponent
/// notation (`1e-7`, `1e+21`) outside `[1e-6, 1e21)`.
pub fn format_amount(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_finite() && magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let text = format!("{value:e}");
        return match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        };
    }
    if value.is_finite() && value.fract() == 0.0 && magnitude < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Group digits in threes: `1234567` → `1,234,567`.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let head = match digits.len() % 3 {
        0 => 3,
        rem => rem,
    };
    let mut groups = vec![&digits[..head]];
    groups.extend((head..digits.len()).step_by(3).map(|i| &digits[i..i + 3]));
    groups.join(",")
}
