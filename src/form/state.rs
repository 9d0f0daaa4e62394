//! Status, result, and the transitions between them.
//!
//! [`ConversionState`] is the single owner of what the result area shows.
//! Every mutation goes through [`ConversionState::apply_request`] (an edit)
//! or [`ConversionState::complete`] (a response came back), so the whole
//! lifecycle can be driven and checked without any I/O.

use std::fmt;

use super::{ConversionRequest, Field, Plan, RateQuery, SkipReason, parse_amount, plan};
use crate::consts::LOADING_TEXT;

/// How overlapping responses are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaceMode {
    /// Every response is applied as it lands; the last to resolve wins even
    /// if its inputs are no longer current.
    Legacy,
    /// Only the response to the most recently issued request is applied.
    #[default]
    Latest,
}

impl fmt::Display for RaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RaceMode::Legacy => "legacy",
            RaceMode::Latest => "latest",
        })
    }
}

impl std::str::FromStr for RaceMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(RaceMode::Legacy),
            "latest" => Ok(RaceMode::Latest),
            other => anyhow::bail!("unknown race mode: {other} (expected legacy or latest)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConversionStatus {
    #[default]
    Idle,
    Loading,
    Error(String),
    Ready,
}

/// A converted amount and the inputs it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub value: String,
    pub request: ConversionRequest,
}

/// Handle for one issued request. The generation orders tickets.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub generation: u64,
    pub query: RateQuery,
    pub request: ConversionRequest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub issued: u64,
    pub applied: u64,
    pub discarded: u64,
    pub failed: u64,
}

/// What an edit did.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The value was already there.
    Unchanged,
    Skipped(SkipReason),
    /// Answered synchronously (same currency on both sides).
    Immediate,
    /// A request must be issued for this ticket.
    Fetch(Ticket),
}

/// What a completion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

/// What the result area displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Empty,
    Loading,
    Error(String),
    Result(String),
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Empty => Ok(()),
            View::Loading => f.write_str(LOADING_TEXT),
            View::Error(message) => f.write_str(message),
            View::Result(line) => f.write_str(line),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversionState {
    request: ConversionRequest,
    status: ConversionStatus,
    result: Option<ConversionResult>,
    generation: u64,
    race_mode: RaceMode,
    stats: Stats,
}

impl Default for ConversionState {
    fn default() -> Self {
        Self::new(RaceMode::default())
    }
}

impl ConversionState {
    pub fn new(race_mode: RaceMode) -> Self {
        Self {
            request: ConversionRequest::default(),
            status: ConversionStatus::Idle,
            result: None,
            generation: 0,
            race_mode,
            stats: Stats::default(),
        }
    }

    pub fn request(&self) -> &ConversionRequest {
        &self.request
    }

    pub fn status(&self) -> &ConversionStatus {
        &self.status
    }

    pub fn result(&self) -> Option<&ConversionResult> {
        self.result.as_ref()
    }

    /// Bumped on every change to the form.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn race_mode(&self) -> RaceMode {
        self.race_mode
    }

    pub fn set_race_mode(&mut self, mode: RaceMode) {
        self.race_mode = mode;
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn is_loading(&self) -> bool {
        self.status == ConversionStatus::Loading
    }

    /// Edit a single field.
    pub fn apply_input(&mut self, field: Field, value: &str) -> Transition {
        let mut request = self.request.clone();
        request.set(field, value);
        self.apply_request(request)
    }

    /// Replace the whole form in one edit.
    pub fn apply_request(&mut self, request: ConversionRequest) -> Transition {
        if request == self.request {
            return Transition::Unchanged;
        }
        self.request = request;
        self.generation += 1;

        match plan(&self.request) {
            Plan::Skip(reason) => {
                self.status = ConversionStatus::Idle;
                self.result = None;
                Transition::Skipped(reason)
            }
            Plan::Immediate(value) => {
                self.status = ConversionStatus::Ready;
                self.result = Some(ConversionResult {
                    value,
                    request: self.request.clone(),
                });
                Transition::Immediate
            }
            Plan::Fetch(query) => {
                self.status = ConversionStatus::Loading;
                self.result = None;
                self.stats.issued += 1;
                Transition::Fetch(Ticket {
                    generation: self.generation,
                    query,
                    request: self.request.clone(),
                })
            }
        }
    }

    /// Whether a response for `ticket` would be applied right now.
    pub fn accepts(&self, ticket: &Ticket) -> bool {
        match self.race_mode {
            RaceMode::Legacy => true,
            RaceMode::Latest => ticket.generation == self.generation,
        }
    }

    /// Record the outcome of a request. `Ok` carries the converted value,
    /// `Err` the message to show.
    pub fn complete(&mut self, ticket: &Ticket, outcome: Result<String, String>) -> Completion {
        if !self.accepts(ticket) {
            self.stats.discarded += 1;
            return Completion::Discarded;
        }

        self.stats.applied += 1;
        match outcome {
            Ok(value) => {
                self.status = ConversionStatus::Ready;
                self.result = Some(ConversionResult {
                    value,
                    request: ticket.request.clone(),
                });
            }
            Err(message) => {
                self.stats.failed += 1;
                self.status = ConversionStatus::Error(message);
                self.result = None;
            }
        }
        Completion::Applied
    }

    pub fn view(&self) -> View {
        match &self.status {
            ConversionStatus::Idle => View::Empty,
            ConversionStatus::Loading => View::Loading,
            ConversionStatus::Error(message) => View::Error(message.clone()),
            ConversionStatus::Ready => {
                // A late response can land after the form stopped qualifying.
                if parse_amount(&self.request.amount).is_none() {
                    return View::Empty;
                }
                match &self.result {
                    Some(result) => View::Result(format!(
                        "{} {} = {} {}",
                        result.request.amount, result.request.from, result.value, result.request.to
                    )),
                    None => View::Empty,
                }
            }
        }
    }
}
