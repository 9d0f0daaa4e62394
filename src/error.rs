//! Failure taxonomy for a conversion request.
//!
//! Providers return `anyhow::Result`; the typed [`ConvertError`] rides
//! inside so the controller can classify a failure with [`FailureKind::of`]
//! while the user only ever sees [`failure_message`].

use std::time::Duration;

use thiserror::Error;

use crate::consts::{FALLBACK_MESSAGE, HTTP_FAILURE_MESSAGE};
use crate::currency::Currency;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The provider answered with a non-success status.
    #[error("{}", HTTP_FAILURE_MESSAGE)]
    BadStatus { status: u16 },

    /// Transport-level failure (DNS, connect, TLS, reset).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The body was not the JSON shape we expect.
    #[error("invalid rate payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body decoded but has no entry for the target currency.
    #[error("no rate for {currency} in response")]
    MissingRate { currency: Currency },

    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The request task ended without reporting an outcome.
    #[error("{}", FALLBACK_MESSAGE)]
    Abandoned,
}

/// Coarse classification of why a conversion did not produce a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Input did not qualify for a request. Not user-visible.
    ValidationSkip,
    NetworkFailure,
    DataShapeFailure,
    UnknownFailure,
}

impl FailureKind {
    pub fn of(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<ConvertError>() {
            Some(ConvertError::BadStatus { .. })
            | Some(ConvertError::Transport(_))
            | Some(ConvertError::Timeout(_)) => FailureKind::NetworkFailure,
            Some(ConvertError::Decode(_)) | Some(ConvertError::MissingRate { .. }) => {
                FailureKind::DataShapeFailure
            }
            Some(ConvertError::Abandoned) => FailureKind::UnknownFailure,
            None => {
                if err.downcast_ref::<reqwest::Error>().is_some() {
                    FailureKind::NetworkFailure
                } else if err.downcast_ref::<serde_json::Error>().is_some() {
                    FailureKind::DataShapeFailure
                } else {
                    FailureKind::UnknownFailure
                }
            }
        }
    }
}

/// The flat message rendered in place of the result.
///
/// Uses the error's own top-level message; an error with nothing to say
/// gets [`FALLBACK_MESSAGE`].
pub fn failure_message(err: &anyhow::Error) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_status_uses_http_failure_message() {
        let err = anyhow::Error::new(ConvertError::BadStatus { status: 503 });
        assert_eq!(failure_message(&err), "Something went wrong..");
        assert_eq!(FailureKind::of(&err), FailureKind::NetworkFailure);
    }

    #[test]
    fn plain_message_passes_through() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(failure_message(&err), "boom");
        assert_eq!(FailureKind::of(&err), FailureKind::UnknownFailure);
    }

    #[test]
    fn empty_message_falls_back() {
        let err = anyhow::anyhow!("");
        assert_eq!(failure_message(&err), "Something went wrong");
    }

    #[test]
    fn missing_rate_is_data_shape() {
        let err = anyhow::Error::new(ConvertError::MissingRate {
            currency: Currency::EUR,
        });
        assert_eq!(failure_message(&err), "no rate for EUR in response");
        assert_eq!(FailureKind::of(&err), FailureKind::DataShapeFailure);
    }

    #[test]
    fn decode_error_is_data_shape() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = anyhow::Error::new(ConvertError::from(json_err));
        assert!(failure_message(&err).starts_with("invalid rate payload"));
        assert_eq!(FailureKind::of(&err), FailureKind::DataShapeFailure);
    }

    #[test]
    fn timeout_message_names_duration() {
        let err = anyhow::Error::new(ConvertError::Timeout(Duration::from_millis(1500)));
        assert_eq!(failure_message(&err), "request timed out after 1.5s");
        assert_eq!(FailureKind::of(&err), FailureKind::NetworkFailure);
    }

    #[test]
    fn context_keeps_outer_message() {
        let err = anyhow::Error::new(ConvertError::BadStatus { status: 500 })
            .context("fetching latest rates");
        assert_eq!(failure_message(&err), "fetching latest rates");
        assert_eq!(FailureKind::of(&err), FailureKind::NetworkFailure);
    }

    #[test]
    fn abandoned_uses_fallback() {
        let err = anyhow::Error::new(ConvertError::Abandoned);
        assert_eq!(failure_message(&err), "Something went wrong");
        assert_eq!(FailureKind::of(&err), FailureKind::UnknownFailure);
    }
}
