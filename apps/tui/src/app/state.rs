use chrono::{Local, NaiveDateTime};
use throbber_widgets_tui::ThrobberState;
use tracing::{debug, info, warn};

use crate::api::Feed;
use crate::app::filter::FilterKey;
use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::domain::{AiAnswer, MarketMover, Prediction, RaceEvent, Roughie};
use crate::event::refresh::{CycleOutcome, CycleVerdict, RefreshMachine, RefreshPhase};
use crate::event::AppMessage;
use crate::ui::view::{build_view, DashboardView, RaceCard};

/// Shown in the chat log when the insights endpoint gives no usable answer.
pub const CHAT_ERROR_MESSAGE: &str = "Sorry, I couldn't get an answer right now. Please try again.";

/// Last known good value of every feed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeedStore {
    pub races: Vec<RaceEvent>,
    pub movers: Vec<MarketMover>,
    pub predictions: Vec<Prediction>,
    pub roughies: Vec<Roughie>,
    pub last_update: Option<NaiveDateTime>,
}

impl FeedStore {
    /// Writes each successful feed and keeps the previous value of each failed one.
    /// Returns the feeds that failed.
    pub fn apply(&mut self, outcome: CycleOutcome) -> Vec<Feed> {
        let failed = outcome.failed_feeds();

        if let Ok(snapshot) = outcome.odds {
            self.races = snapshot.events;
            self.last_update = Some(
                snapshot
                    .timestamp
                    .unwrap_or_else(|| Local::now().naive_local()),
            );
        }
        if let Ok(movers) = outcome.movers {
            self.movers = movers;
        }
        if let Ok(predictions) = outcome.predictions {
            self.predictions = predictions;
        }
        if let Ok(roughies) = outcome.roughies {
            self.roughies = roughies;
        }

        failed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupTone {
    Info,
    Error,
}

/// Modal message for on-demand actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<String>,
    pub tone: PopupTone,
}

impl Popup {
    pub fn info(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
            tone: PopupTone::Info,
        }
    }

    pub fn error(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
            tone: PopupTone::Error,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UiState {
    pub filter: FilterKey,
    pub chat_open: bool,
    pub chat_input: String,
    pub selected_race: usize,
    pub popup: Option<Popup>,
    pub status_message: String,
    pub show_help: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChatLog {
    pub messages: Vec<ChatMessage>,
    pub pending: usize,
}

impl ChatLog {
    pub fn push(&mut self, role: ChatRole, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            text: text.into(),
        });
    }
}

/// Work the event loop must start on behalf of an input handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    AskAiPrediction { race_id: String, race_name: String },
    SendChat(String),
}

/// The dashboard context: stores, UI state and the refresh orchestrator.
#[derive(Debug)]
pub struct Dashboard {
    pub running: bool,
    pub feeds: FeedStore,
    pub ui: UiState,
    pub chat: ChatLog,
    pub refresh: RefreshMachine,
    pub spinner: ThrobberState,
    view: DashboardView,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(FilterKey::All)
    }
}

impl Dashboard {
    pub fn new(filter: FilterKey) -> Self {
        Self {
            running: true,
            feeds: FeedStore::default(),
            ui: UiState {
                filter,
                ..UiState::default()
            },
            chat: ChatLog::default(),
            refresh: RefreshMachine::new(),
            spinner: ThrobberState::default(),
            view: DashboardView::default(),
        }
    }

    /// Rebuilds the view from the stores. Handlers only act on what this produced.
    pub fn render(&mut self) -> &DashboardView {
        self.view = build_view(&self.feeds, &self.ui);
        let races = self.view.races.len();
        if self.ui.selected_race >= races {
            self.ui.selected_race = races.saturating_sub(1);
        }
        &self.view
    }

    pub const fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.phase() == RefreshPhase::Refreshing
    }

    pub fn update(&mut self) {
        if self.is_refreshing() {
            self.spinner.calc_next();
        }
    }

    pub fn begin_refresh(&mut self) -> u64 {
        let generation = self.refresh.begin_cycle();
        debug!(
            event = "refresh.cycle.begin",
            generation,
            in_flight = self.refresh.in_flight()
        );
        generation
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::CycleSettled(outcome) => self.apply_cycle(outcome),
            AppMessage::ChatReply(answer) => self.apply_chat_reply(&answer),
            AppMessage::AiPrediction { race_name, answer } => {
                self.apply_ai_prediction(&race_name, &answer);
            }
        }
        self.render();
    }

    fn apply_cycle(&mut self, outcome: CycleOutcome) {
        let generation = outcome.generation;
        match self.refresh.settle(generation) {
            Ok(CycleVerdict::Apply) => {
                let failed = self.feeds.apply(outcome);
                self.ui.status_message = if failed.is_empty() {
                    String::new()
                } else {
                    let labels: Vec<&str> = failed.iter().map(|feed| feed.label()).collect();
                    format!("Could not refresh {}", labels.join(", "))
                };
                info!(
                    event = "refresh.cycle.settled",
                    generation,
                    failed = failed.len()
                );
            }
            Ok(CycleVerdict::Discard) => {
                debug!(
                    event = "refresh.cycle.discarded",
                    generation,
                    last_applied = self.refresh.last_applied()
                );
            }
            Err(e) => {
                warn!(event = "refresh.cycle.rejected", generation, error = %e);
            }
        }
    }

    pub fn set_filter(&mut self, filter: FilterKey) {
        if self.ui.filter != filter {
            self.ui.filter = filter;
            self.ui.selected_race = 0;
        }
        self.render();
    }

    pub fn cycle_filter(&mut self, forward: bool) {
        let tabs = &self.view.filter_tabs;
        if tabs.is_empty() {
            return;
        }
        let current = self.view.active_filter_index();
        let next = if forward {
            wrap_increment(current, tabs.len())
        } else {
            wrap_decrement(current, tabs.len())
        };
        let key = FilterKey::parse(&tabs[next].key);
        self.set_filter(key);
    }

    pub fn select_next_race(&mut self) {
        self.ui.selected_race = wrap_increment(self.ui.selected_race, self.view.races.len());
    }

    pub fn select_prev_race(&mut self) {
        self.ui.selected_race = wrap_decrement(self.ui.selected_race, self.view.races.len());
    }

    pub fn selected_race_card(&self) -> Option<&RaceCard> {
        self.view.races.cards().get(self.ui.selected_race)
    }

    /// Demo bet slip; nothing is sent anywhere.
    pub fn place_bet(&mut self) {
        let Some(card) = self.selected_race_card() else {
            return;
        };

        let runners: Vec<&str> = card.runners.iter().map(|runner| runner.name.as_str()).collect();
        let message = if runners.is_empty() {
            format!("No runners listed for {}", card.name)
        } else {
            format!("Bet placed on {}", runners.join(" vs "))
        };

        info!(event = "notification", kind = "bet_slip", message = %message);
        self.ui.popup = Some(Popup::info(
            "Bet Slip",
            vec![message, "Demo only: no bet was placed.".to_string()],
        ));
    }

    pub fn show_details(&mut self) {
        let Some(card) = self.selected_race_card() else {
            return;
        };

        let mut lines = vec![format!("Details: {} at {}", card.name, card.track)];
        for (label, value) in &card.details {
            lines.push(format!("{label}: {value}"));
        }
        for runner in &card.runners {
            let mut line = format!("{}  Win {}  Place {}", runner.name, runner.win, runner.place);
            if let Some(jockey) = &runner.jockey {
                line.push_str(&format!("  J: {jockey}"));
            }
            if let Some(trainer) = &runner.trainer {
                line.push_str(&format!("  T: {trainer}"));
            }
            lines.push(line);
        }

        info!(event = "notification", kind = "details", race = %card.name);
        self.ui.popup = Some(Popup::info(card.name.clone(), lines));
    }

    pub fn request_ai_prediction(&mut self) -> Option<Command> {
        let card = self.selected_race_card()?;
        let command = Command::AskAiPrediction {
            race_id: card.id.clone(),
            race_name: card.name.clone(),
        };
        self.ui.popup = Some(Popup::info(
            format!("AI Prediction: {}", card.name),
            vec!["Asking the AI for a prediction...".to_string()],
        ));
        Some(command)
    }

    pub fn apply_ai_prediction(&mut self, race_name: &str, answer: &AiAnswer) {
        let title = format!("AI Prediction: {race_name}");
        self.ui.popup = Some(match answer.text() {
            Some(text) => Popup::info(title, text.lines().map(str::to_string).collect()),
            None => {
                let reason = answer
                    .error
                    .clone()
                    .unwrap_or_else(|| "no analysis returned".to_string());
                warn!(event = "ai_prediction.failed", race = race_name, error = %reason);
                Popup::error(title, vec![format!("AI prediction unavailable: {reason}")])
            }
        });
    }

    pub fn toggle_chat(&mut self) {
        self.ui.chat_open = !self.ui.chat_open;
    }

    /// Appends the user message right away and hands the query to the event loop.
    pub fn submit_chat(&mut self) -> Option<Command> {
        let query = self.ui.chat_input.trim().to_string();
        self.ui.chat_input.clear();
        if query.is_empty() {
            return None;
        }

        self.chat.push(ChatRole::User, query.clone());
        self.chat.pending += 1;
        Some(Command::SendChat(query))
    }

    pub fn apply_chat_reply(&mut self, answer: &AiAnswer) {
        self.chat.pending = self.chat.pending.saturating_sub(1);
        match answer.text() {
            Some(text) => self.chat.push(ChatRole::Assistant, text),
            None => {
                if let Some(error) = &answer.error {
                    warn!(event = "chat.failed", error = %error);
                }
                self.chat.push(ChatRole::Error, CHAT_ERROR_MESSAGE);
            }
        }
    }

    pub fn dismiss_popup(&mut self) -> bool {
        self.ui.popup.take().is_some()
    }
}
