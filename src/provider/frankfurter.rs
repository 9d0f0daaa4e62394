use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use super::{RateProvider, RateQuery, Rates};
use crate::consts::format_amount;
use crate::error::ConvertError;

/// Rate provider backed by the Frankfurter HTTP API.
pub struct FrankfurterProvider {
    base: Url,
    client: reqwest::Client,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Use a preconfigured client (proxies, timeouts, test servers).
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid base URL: {base_url}"))?;
        if base.cannot_be_a_base() {
            bail!("base URL cannot carry a path: {base_url}");
        }
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/latest?amount=..&from=..&to=..`, query values escaped.
    pub fn endpoint(&self, query: &RateQuery) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("latest");
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("amount", &format_amount(query.amount))
            .append_pair("from", query.from.code())
            .append_pair("to", query.to.code());
        url
    }
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "frankfurter"
    }

    async fn latest(&self, query: &RateQuery) -> Result<Rates> {
        let url = self.endpoint(query);
        debug!(%url, "requesting latest rates");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ConvertError::from)?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "rate provider returned non-success status");
            return Err(ConvertError::BadStatus {
                status: status.as_u16(),
            }
            .into());
        }

        let body = resp.bytes().await.map_err(ConvertError::from)?;
        let rates: Rates = serde_json::from_slice(&body).map_err(ConvertError::from)?;
        debug!(date = ?rates.date, base = ?rates.base, "rates received");
        Ok(rates)
    }
}
