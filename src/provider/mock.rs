use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::{RateProvider, RateQuery, Rates};
use crate::currency::Currency;
use crate::error::ConvertError;

/// What a scripted call answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Rates(Rates),
    /// Non-success HTTP status.
    Status(u16),
    /// Fail with this message.
    Fail(String),
    /// Panic inside the provider.
    Panic,
    /// Never resolve.
    Hang,
}

/// One scripted answer, optionally delayed.
#[derive(Debug, Clone)]
pub struct Scripted {
    pub delay: Duration,
    pub reply: Reply,
}

impl Scripted {
    pub fn rate(to: Currency, value: f64) -> Self {
        Self::reply(Reply::Rates(Rates::single(to, value)))
    }

    pub fn reply(reply: Reply) -> Self {
        Self {
            delay: Duration::ZERO,
            reply,
        }
    }

    pub fn fail(message: &str) -> Self {
        Self::reply(Reply::Fail(message.to_string()))
    }

    pub fn status(code: u16) -> Self {
        Self::reply(Reply::Status(code))
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A scripted provider for tests. Answers calls in order and records
/// every query it was asked.
pub struct MockProvider {
    script: Vec<Scripted>,
    index: AtomicUsize,
    calls: Mutex<Vec<RateQuery>>,
}

impl MockProvider {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script,
            index: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far, in call order.
    pub fn calls(&self) -> Vec<RateQuery> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn latest(&self, query: &RateQuery) -> Result<Rates> {
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*query);

        let scripted = self
            .script
            .get(i)
            .ok_or_else(|| anyhow::anyhow!("MockProvider: no more replies (called {} times)", i + 1))?;

        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }

        match &scripted.reply {
            Reply::Rates(rates) => Ok(rates.clone()),
            Reply::Status(code) => Err(ConvertError::BadStatus { status: *code }.into()),
            Reply::Fail(message) => Err(anyhow::anyhow!("{message}")),
            Reply::Panic => panic!("MockProvider: scripted panic"),
            Reply::Hang => std::future::pending::<Result<Rates>>().await,
        }
    }
}
