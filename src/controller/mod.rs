//! The conversion controller: turns form edits into rate requests and
//! folds their outcomes back into [`ConversionState`].
//!
//! Every qualifying edit spawns its own tokio task; nothing is serialized
//! or cancelled. Which responses get applied is decided by the state's
//! [`RaceMode`] when each one lands.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::broadcast;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

use crate::consts::format_amount;
use crate::error::{ConvertError, FailureKind, failure_message};
use crate::events::{Event, EventBus};
use crate::form::state::{
    Completion, ConversionState, RaceMode, Stats, Ticket, Transition, View,
};
use crate::form::{ConversionRequest, Field, RateQuery};
use crate::provider::RateProvider;

pub struct ControllerConfig {
    pub race_mode: RaceMode,
    /// `None` waits forever, so a hung provider leaves the form loading.
    pub request_timeout: Option<Duration>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            race_mode: RaceMode::Latest,
            request_timeout: None,
        }
    }
}

pub struct Controller {
    state: Arc<Mutex<ConversionState>>,
    provider: Arc<dyn RateProvider>,
    events: Arc<EventBus>,
    request_timeout: Option<Duration>,
    /// Awaited by `settle`, which takes them.
    tasks: Mutex<Vec<JoinHandle<()>>>,
    /// Kept until the task finishes, so `shutdown` still reaches tasks whose
    /// join handle went to a `settle` that was dropped mid-wait.
    aborts: Mutex<Vec<AbortHandle>>,
}

impl Controller {
    pub fn new(provider: Arc<dyn RateProvider>, config: ControllerConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(ConversionState::new(config.race_mode))),
            provider,
            events: Arc::new(EventBus::default()),
            request_timeout: config.request_timeout,
            tasks: Mutex::new(Vec::new()),
            aborts: Mutex::new(Vec::new()),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Edit one field. Must be called inside a tokio runtime.
    ///
    /// Returns the generation of the request it issued, if any.
    pub fn set_field(&self, field: Field, value: &str) -> Option<u64> {
        let (transition, event) = {
            let mut state = lock(&self.state);
            let transition = state.apply_input(field, value);
            (transition, status_event(&state))
        };
        self.dispatch(transition, event)
    }

    pub fn set_amount(&self, amount: &str) -> Option<u64> {
        self.set_field(Field::Amount, amount)
    }

    pub fn set_from(&self, code: &str) -> Option<u64> {
        self.set_field(Field::From, code)
    }

    pub fn set_to(&self, code: &str) -> Option<u64> {
        self.set_field(Field::To, code)
    }

    /// Replace all three fields as a single edit.
    pub fn submit(&self, request: ConversionRequest) -> Option<u64> {
        let (transition, event) = {
            let mut state = lock(&self.state);
            let transition = state.apply_request(request);
            (transition, status_event(&state))
        };
        self.dispatch(transition, event)
    }

    fn dispatch(&self, transition: Transition, event: Event) -> Option<u64> {
        match transition {
            Transition::Unchanged => None,
            Transition::Skipped(reason) => {
                debug!(%reason, "form does not qualify, idle");
                self.events.emit(event);
                None
            }
            Transition::Immediate => {
                debug!("same currency on both sides, answered locally");
                self.events.emit(event);
                None
            }
            Transition::Fetch(ticket) => {
                let generation = ticket.generation;
                self.events.emit(event);
                self.spawn(ticket);
                Some(generation)
            }
        }
    }

    fn spawn(&self, ticket: Ticket) {
        debug!(
            generation = ticket.generation,
            amount = ticket.query.amount,
            from = %ticket.query.from,
            to = %ticket.query.to,
            provider = self.provider.name(),
            "issuing conversion request"
        );

        let state = Arc::clone(&self.state);
        let events = Arc::clone(&self.events);
        let provider = Arc::clone(&self.provider);
        let timeout = self.request_timeout;

        let handle = tokio::spawn(async move {
            // Panics funnel into the same completion path as errors, so the
            // form can never stay loading after the task ends.
            let outcome = AssertUnwindSafe(convert(provider.as_ref(), &ticket.query, timeout))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(ConvertError::Abandoned.into()));
            finish(&state, &events, &ticket, outcome);
        });

        {
            let mut aborts = lock(&self.aborts);
            aborts.retain(|task| !task.is_finished());
            aborts.push(handle.abort_handle());
        }
        let mut tasks = lock(&self.tasks);
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    /// Wait until every request issued so far has resolved.
    pub async fn settle(&self) {
        loop {
            let pending = std::mem::take(&mut *lock(&self.tasks));
            if pending.is_empty() {
                return;
            }
            for result in futures::future::join_all(pending).await {
                if let Err(e) = result
                    && !e.is_cancelled()
                {
                    warn!(error = %e, "conversion task failed");
                }
            }
        }
    }

    /// Abort every in-flight request. Their responses are never applied.
    pub fn shutdown(&self) {
        for task in lock(&self.aborts).drain(..) {
            task.abort();
        }
        for task in lock(&self.tasks).drain(..) {
            task.abort();
        }
    }

    pub fn state(&self) -> ConversionState {
        lock(&self.state).clone()
    }

    pub fn request(&self) -> ConversionRequest {
        lock(&self.state).request().clone()
    }

    pub fn view(&self) -> View {
        lock(&self.state).view()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).is_loading()
    }

    pub fn stats(&self) -> Stats {
        lock(&self.state).stats()
    }

    pub fn race_mode(&self) -> RaceMode {
        lock(&self.state).race_mode()
    }

    /// Applies to responses landing from now on, including ones in flight.
    pub fn set_race_mode(&self, mode: RaceMode) {
        lock(&self.state).set_race_mode(mode);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn status_event(state: &ConversionState) -> Event {
    Event::StatusChanged {
        generation: state.generation(),
        view: state.view(),
    }
}

async fn convert(
    provider: &dyn RateProvider,
    query: &RateQuery,
    timeout: Option<Duration>,
) -> anyhow::Result<f64> {
    let rates = match timeout {
        Some(limit) => tokio::time::timeout(limit, provider.latest(query))
            .await
            .map_err(|_| ConvertError::Timeout(limit))??,
        None => provider.latest(query).await?,
    };
    Ok(rates.converted(query.to)?)
}

fn finish(
    state: &Mutex<ConversionState>,
    events: &EventBus,
    ticket: &Ticket,
    outcome: anyhow::Result<f64>,
) {
    let outcome = match outcome {
        Ok(value) => Ok(format_amount(value)),
        Err(e) => {
            warn!(
                generation = ticket.generation,
                kind = ?FailureKind::of(&e),
                error = %e,
                "conversion failed"
            );
            Err(failure_message(&e))
        }
    };

    let event = {
        let mut state = lock(state);
        match state.complete(ticket, outcome) {
            Completion::Applied => status_event(&state),
            Completion::Discarded => Event::ResponseDiscarded {
                generation: ticket.generation,
            },
        }
    };

    let generation = event.generation();
    match &event {
        Event::ResponseDiscarded { .. } => debug!(generation, "stale response discarded"),
        Event::StatusChanged { view, .. } => debug!(generation, %view, "response applied"),
    }
    events.emit(event);
}
