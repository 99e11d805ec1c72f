use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::api::{Feed, FeedSource, FetchError, FetchResult};
use crate::domain::{MarketMover, OddsSnapshot, Prediction, Roughie};
use crate::event::AppMessage;

// Refresh phases: a tick moves to Refreshing, the last settled cycle moves back to Idle
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RefreshPhase {
    #[default]
    Idle,
    Refreshing,
}

impl fmt::Display for RefreshPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Refreshing => write!(f, "Refreshing"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RefreshEvent {
    Tick,
    Settled(u64),
}

impl fmt::Display for RefreshEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tick => write!(f, "Tick"),
            Self::Settled(generation) => write!(f, "Settled({generation})"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid transition from {from} with event {event}")]
pub struct StateTransitionError {
    pub from: RefreshPhase,
    pub event: RefreshEvent,
}

/// What to do with a settled cycle's results.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CycleVerdict {
    Apply,
    /// A newer cycle has already been applied.
    Discard,
}

// Helper struct for transitions
struct NextPhase(RefreshPhase);

impl TryFrom<(RefreshPhase, RefreshEvent, &BTreeSet<u64>)> for NextPhase {
    type Error = StateTransitionError;

    fn try_from(
        value: (RefreshPhase, RefreshEvent, &BTreeSet<u64>),
    ) -> Result<Self, Self::Error> {
        let (current, event, in_flight) = value;

        match (current, event) {
            (RefreshPhase::Idle | RefreshPhase::Refreshing, RefreshEvent::Tick) => {
                Ok(Self(RefreshPhase::Refreshing))
            }
            (RefreshPhase::Refreshing, RefreshEvent::Settled(generation))
                if in_flight.contains(&generation) =>
            {
                if in_flight.len() == 1 {
                    Ok(Self(RefreshPhase::Idle))
                } else {
                    Ok(Self(RefreshPhase::Refreshing))
                }
            }
            _ => Err(StateTransitionError {
                from: current,
                event,
            }),
        }
    }
}

/// Orchestrates refresh cycles.
///
/// Cycles may overlap; each carries a monotonic generation and only a cycle
/// newer than the last applied one may write to the store.
#[derive(Debug, Default)]
pub struct RefreshMachine {
    phase: RefreshPhase,
    last_started: u64,
    last_applied: u64,
    in_flight: BTreeSet<u64>,
}

impl RefreshMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn phase(&self) -> RefreshPhase {
        self.phase
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub const fn last_applied(&self) -> u64 {
        self.last_applied
    }

    /// Starts a cycle and returns its generation.
    pub fn begin_cycle(&mut self) -> u64 {
        // Tick is valid from every phase
        if let Ok(next) = NextPhase::try_from((self.phase, RefreshEvent::Tick, &self.in_flight)) {
            self.phase = next.0;
        }
        self.last_started += 1;
        self.in_flight.insert(self.last_started);
        self.last_started
    }

    pub fn settle(&mut self, generation: u64) -> Result<CycleVerdict, StateTransitionError> {
        let next = NextPhase::try_from((
            self.phase,
            RefreshEvent::Settled(generation),
            &self.in_flight,
        ))?;
        self.phase = next.0;
        self.in_flight.remove(&generation);

        if generation > self.last_applied {
            self.last_applied = generation;
            Ok(CycleVerdict::Apply)
        } else {
            Ok(CycleVerdict::Discard)
        }
    }
}

/// Settled results of one refresh cycle, one result per feed.
#[derive(Debug)]
pub struct CycleOutcome {
    pub generation: u64,
    pub odds: FetchResult<OddsSnapshot>,
    pub movers: FetchResult<Vec<MarketMover>>,
    pub predictions: FetchResult<Vec<Prediction>>,
    pub roughies: FetchResult<Vec<Roughie>>,
}

impl CycleOutcome {
    pub fn error(&self, feed: Feed) -> Option<&FetchError> {
        match feed {
            Feed::Odds => self.odds.as_ref().err(),
            Feed::MarketMovers => self.movers.as_ref().err(),
            Feed::Predictions => self.predictions.as_ref().err(),
            Feed::Roughies => self.roughies.as_ref().err(),
        }
    }

    /// Failed feeds in display order.
    pub fn failed_feeds(&self) -> Vec<Feed> {
        Feed::ALL
            .into_iter()
            .filter(|feed| self.error(*feed).is_some())
            .collect()
    }
}

/// Fetches every feed concurrently and waits for all of them to settle.
pub async fn run_cycle(source: &dyn FeedSource, generation: u64) -> CycleOutcome {
    debug!(event = "refresh.cycle.start", generation);

    let (odds, movers, predictions, roughies) = tokio::join!(
        source.fetch_odds(),
        source.fetch_market_movers(),
        source.fetch_predictions(),
        source.fetch_roughies(),
    );

    let outcome = CycleOutcome {
        generation,
        odds,
        movers,
        predictions,
        roughies,
    };

    log_failures(&outcome);
    outcome
}

pub fn spawn_cycle(source: Arc<dyn FeedSource>, generation: u64, tx: UnboundedSender<AppMessage>) {
    tokio::spawn(async move {
        let outcome = run_cycle(source.as_ref(), generation).await;
        if tx.send(AppMessage::CycleSettled(outcome)).is_err() {
            debug!(event = "refresh.cycle.orphaned", generation);
        }
    });
}

fn log_failures(outcome: &CycleOutcome) {
    for feed in Feed::ALL {
        if let Some(error) = outcome.error(feed) {
            warn!(
                event = "fetch.failed",
                generation = outcome.generation,
                feed = feed.label(),
                error = %error
            );
        }
    }
}
