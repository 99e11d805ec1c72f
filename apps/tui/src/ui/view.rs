// View model for the dashboard
// Pure record -> card mapping; the screens only paint what is built here

use serde::Serialize;

use crate::app::filter::{filter_races, FilterKey};
use crate::app::state::{FeedStore, UiState};
use crate::domain::{Horse, MarketMover, Prediction, RaceEvent, Roughie};

pub const NO_RACES: &str = "No races found";
pub const NO_MOVERS: &str = "No movers available";
pub const NO_PREDICTIONS: &str = "No predictions available";
pub const NO_ROUGHIES: &str = "No roughies available";

pub const TREND_UP: &str = "📈";
pub const TREND_DOWN: &str = "📉";
pub const TREND_FLAT: &str = "➡️";

pub const MOVE_UP: &str = "▲";
pub const MOVE_DOWN: &str = "▼";

/// A section is either a run of cards or a single placeholder line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Section<T> {
    Cards(Vec<T>),
    Placeholder(String),
}

impl<T> Section<T> {
    fn from_cards(cards: Vec<T>, placeholder: &str) -> Self {
        if cards.is_empty() {
            Self::Placeholder(placeholder.to_string())
        } else {
            Self::Cards(cards)
        }
    }

    pub fn cards(&self) -> &[T] {
        match self {
            Self::Cards(cards) => cards,
            Self::Placeholder(_) => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Cards(_) => None,
            Self::Placeholder(text) => Some(text),
        }
    }

    pub fn len(&self) -> usize {
        self.cards().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    Success,
    Info,
    Warning,
}

impl ConfidenceTier {
    /// 75 and up is success, 60 up to 75 is info, everything else (NaN included) is warning.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 75.0 {
            Self::Success
        } else if confidence >= 60.0 {
            Self::Info
        } else {
            Self::Warning
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    Up,
    Down,
    Flat,
}

impl Movement {
    pub fn parse(direction: Option<&str>) -> Self {
        match direction.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("up") => Self::Up,
            Some("down") => Self::Down,
            _ => Self::Flat,
        }
    }
}

pub fn trend_icon(direction: Option<&str>) -> &'static str {
    match Movement::parse(direction) {
        Movement::Up => TREND_UP,
        Movement::Down => TREND_DOWN,
        Movement::Flat => TREND_FLAT,
    }
}

pub fn format_odds(odds: f64) -> String {
    format!("{odds:.2}")
}

/// `82.0` renders as `82%`, `82.5` as `82.5%`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{confidence}%")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunnerLine {
    pub name: String,
    pub jockey: Option<String>,
    pub trainer: Option<String>,
    pub win: String,
    pub place: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendBadge {
    pub icon: &'static str,
    pub value: String,
    pub direction: Movement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceCard {
    pub id: String,
    pub name: String,
    pub track: String,
    pub featured: bool,
    pub runners: Vec<RunnerLine>,
    pub trend: TrendBadge,
    pub details: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoverCard {
    pub rank: String,
    pub horse: String,
    pub track: String,
    pub odds: String,
    pub change: String,
    pub icon: &'static str,
    pub direction: Movement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionCard {
    pub tip: String,
    pub horse: Option<String>,
    pub track: String,
    pub reason: String,
    pub badge: String,
    pub tier: ConfidenceTier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoughieCard {
    pub rank: String,
    pub horse: String,
    pub track: String,
    pub odds: String,
    pub badge: String,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterTab {
    pub key: String,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub races: Section<RaceCard>,
    pub movers: Section<MoverCard>,
    pub predictions: Section<PredictionCard>,
    pub roughies: Section<RoughieCard>,
    pub filter_tabs: Vec<FilterTab>,
    pub last_update: Option<String>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            races: Section::Placeholder(NO_RACES.to_string()),
            movers: Section::Placeholder(NO_MOVERS.to_string()),
            predictions: Section::Placeholder(NO_PREDICTIONS.to_string()),
            roughies: Section::Placeholder(NO_ROUGHIES.to_string()),
            filter_tabs: Vec::new(),
            last_update: None,
        }
    }
}

impl DashboardView {
    pub fn active_filter_index(&self) -> usize {
        self.filter_tabs
            .iter()
            .position(|tab| tab.active)
            .unwrap_or(0)
    }
}

/// Rebuilds every section from the store. Always a full replace.
pub fn build_view(feeds: &FeedStore, ui: &UiState) -> DashboardView {
    let races = filter_races(&feeds.races, &ui.filter)
        .into_iter()
        .map(race_card)
        .collect();

    DashboardView {
        races: Section::from_cards(races, NO_RACES),
        movers: Section::from_cards(feeds.movers.iter().map(mover_card).collect(), NO_MOVERS),
        predictions: Section::from_cards(
            feeds.predictions.iter().map(prediction_card).collect(),
            NO_PREDICTIONS,
        ),
        roughies: Section::from_cards(
            feeds.roughies.iter().map(roughie_card).collect(),
            NO_ROUGHIES,
        ),
        filter_tabs: filter_tabs(&feeds.races, &ui.filter),
        last_update: feeds
            .last_update
            .map(|stamp| stamp.format("%H:%M:%S").to_string()),
    }
}

pub fn race_card(race: &RaceEvent) -> RaceCard {
    let details = [
        ("Distance", &race.distance),
        ("Class", &race.class),
        ("Prize", &race.prize),
        ("Going", &race.going),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.clone().map(|value| (label.to_string(), value)))
    .collect();

    RaceCard {
        id: race.id.clone(),
        name: race.race.clone(),
        track: race.track.clone(),
        featured: race.featured,
        runners: race.headline_runners().iter().map(runner_line).collect(),
        trend: TrendBadge {
            icon: trend_icon(race.trend_direction()),
            value: race.trend_magnitude().unwrap_or_default().to_string(),
            direction: Movement::parse(race.trend_direction()),
        },
        details,
    }
}

fn runner_line(horse: &Horse) -> RunnerLine {
    RunnerLine {
        name: horse.name.clone(),
        jockey: horse.jockey.clone(),
        trainer: horse.trainer.clone(),
        win: format_odds(horse.odds),
        place: format_odds(horse.place_price()),
    }
}

pub fn mover_card(mover: &MarketMover) -> MoverCard {
    let direction = Movement::parse(mover.direction.as_deref());
    MoverCard {
        rank: format!("#{}", mover.position),
        horse: mover.horse.clone(),
        track: mover.track.clone(),
        odds: format_odds(mover.current_odds),
        change: mover.change.clone().unwrap_or_default(),
        icon: if direction == Movement::Up {
            MOVE_UP
        } else {
            MOVE_DOWN
        },
        direction,
    }
}

pub fn prediction_card(prediction: &Prediction) -> PredictionCard {
    PredictionCard {
        tip: prediction.tip.clone(),
        horse: prediction
            .horse
            .clone()
            .filter(|horse| *horse != prediction.tip),
        track: prediction.track.clone(),
        reason: prediction.reason.clone(),
        badge: format_confidence(prediction.confidence),
        tier: ConfidenceTier::from_confidence(prediction.confidence),
    }
}

pub fn roughie_card(roughie: &Roughie) -> RoughieCard {
    RoughieCard {
        rank: format!("#{}", roughie.rank),
        horse: roughie.horse.clone(),
        track: roughie.track.clone(),
        odds: format_odds(roughie.odds),
        badge: format_confidence(roughie.confidence),
        analysis: roughie.analysis.clone(),
    }
}

fn filter_tabs(races: &[RaceEvent], active: &FilterKey) -> Vec<FilterTab> {
    let mut keys = FilterKey::available(races);
    if !keys.contains(active) {
        keys.push(active.clone());
    }

    keys.into_iter()
        .map(|key| FilterTab {
            active: &key == active,
            label: key.label(),
            key: key.as_str().to_string(),
        })
        .collect()
}
