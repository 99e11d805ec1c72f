use std::sync::Arc;

use async_trait::async_trait;
use race_dash::api::{Feed, FeedSource, FetchError, FetchResult};
use race_dash::app::Command;
use race_dash::domain::{
    AiAnswer, Horse, MarketMover, OddsSnapshot, Prediction, RaceEvent, Roughie,
};
use race_dash::event::headless::build_headless_report;
use race_dash::event::refresh::{run_cycle, RefreshPhase};
use race_dash::event::{execute_command, AppMessage};
use race_dash::ui::view::NO_RACES;
use race_dash::{Dashboard, FilterKey};
use tokio::sync::mpsc;

#[derive(Default)]
struct StubFeeds {
    races: Vec<RaceEvent>,
    odds_down: bool,
    ai_down: bool,
}

fn status_error(feed: Feed) -> FetchError {
    FetchError::Status {
        endpoint: format!("http://stub{}", feed.path()),
        status: 500,
    }
}

#[async_trait]
impl FeedSource for StubFeeds {
    async fn fetch_odds(&self) -> FetchResult<OddsSnapshot> {
        if self.odds_down {
            return Err(status_error(Feed::Odds));
        }
        Ok(OddsSnapshot {
            events: self.races.clone(),
            timestamp: None,
        })
    }

    async fn fetch_market_movers(&self) -> FetchResult<Vec<MarketMover>> {
        Ok(vec![MarketMover {
            position: 1,
            horse: "Night Raider".to_string(),
            track: "Flemington".to_string(),
            current_odds: 4.5,
            change: Some("+0.50".to_string()),
            direction: Some("up".to_string()),
        }])
    }

    async fn fetch_predictions(&self) -> FetchResult<Vec<Prediction>> {
        Ok(vec![Prediction {
            id: Some("p1".to_string()),
            race: None,
            track: "Flemington".to_string(),
            tip: "Night Raider".to_string(),
            horse: None,
            confidence: 77.0,
            reason: "Consistent form".to_string(),
        }])
    }

    async fn fetch_roughies(&self) -> FetchResult<Vec<Roughie>> {
        Ok(vec![Roughie {
            rank: 1,
            horse: "Long Shot".to_string(),
            track: "Doomben".to_string(),
            odds: 21.0,
            confidence: 30.0,
            analysis: "Drawn well".to_string(),
        }])
    }

    async fn fetch_ai_prediction(&self, race_id: &str) -> FetchResult<AiAnswer> {
        if self.ai_down {
            return Err(status_error(Feed::Odds));
        }
        Ok(AiAnswer {
            analysis: Some(format!("Race {race_id}: back the favourite")),
            ..AiAnswer::default()
        })
    }

    async fn ask_ai_insights(&self, query: &str) -> FetchResult<AiAnswer> {
        if self.ai_down {
            return Err(status_error(Feed::Odds));
        }
        Ok(AiAnswer {
            response: Some(format!("You asked: {query}")),
            ..AiAnswer::default()
        })
    }
}

fn race(id: &str, track: &str, featured: bool) -> RaceEvent {
    RaceEvent {
        id: id.to_string(),
        race: format!("{track} Race {id}"),
        track: track.to_string(),
        distance: None,
        class: None,
        prize: None,
        going: None,
        featured,
        horses: vec![
            Horse {
                name: "Silver Bullet".to_string(),
                jockey: None,
                trainer: None,
                odds: 2.5,
                place_odds: None,
                trend: None,
                trend_value: None,
            },
            Horse {
                name: "Golden Phoenix".to_string(),
                jockey: None,
                trainer: None,
                odds: 3.5,
                place_odds: None,
                trend: None,
                trend_value: None,
            },
        ],
        trend: Some("down".to_string()),
        trend_value: Some("-0.2".to_string()),
    }
}

#[tokio::test]
async fn failing_odds_feed_leaves_other_sections_populated() {
    let feeds = StubFeeds {
        odds_down: true,
        ..StubFeeds::default()
    };
    let mut dashboard = Dashboard::new(FilterKey::All);

    let report = build_headless_report(&mut dashboard, &feeds).await;

    assert_eq!(report.failed_feeds, vec!["odds"]);
    assert_eq!(report.view.races.placeholder(), Some(NO_RACES));
    assert_eq!(report.view.movers.len(), 1);
    assert_eq!(report.view.predictions.len(), 1);
    assert_eq!(report.view.roughies.len(), 1);
    assert!(report.view.last_update.is_none());
    assert_eq!(dashboard.refresh.phase(), RefreshPhase::Idle);
}

#[tokio::test]
async fn featured_filter_shows_only_featured_race() {
    let feeds = StubFeeds {
        races: vec![race("1", "Randwick", true), race("2", "Caulfield", false)],
        ..StubFeeds::default()
    };
    let mut dashboard = Dashboard::new(FilterKey::Featured);

    let report = build_headless_report(&mut dashboard, &feeds).await;

    assert_eq!(report.view.races.len(), 1);
    let card = &report.view.races.cards()[0];
    assert_eq!(card.name, "Randwick Race 1");
    assert_eq!(card.runners[0].win, "2.50");
    assert_eq!(card.runners[0].place, "1.25");
    assert!(report.view.last_update.is_some());

    let json = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["races"]["kind"], "cards");
    assert_eq!(json["predictions"]["content"][0]["tier"], "success");
}

#[tokio::test]
async fn stale_cycle_settling_last_is_discarded() {
    let old_feeds = StubFeeds {
        races: vec![race("old", "Caulfield", false)],
        ..StubFeeds::default()
    };
    let new_feeds = StubFeeds {
        races: vec![race("new", "Flemington", false)],
        ..StubFeeds::default()
    };
    let mut dashboard = Dashboard::new(FilterKey::All);

    let older = dashboard.begin_refresh();
    let newer = dashboard.begin_refresh();

    let newer_outcome = run_cycle(&new_feeds, newer).await;
    let older_outcome = run_cycle(&old_feeds, older).await;
    dashboard.handle_message(AppMessage::CycleSettled(newer_outcome));
    dashboard.handle_message(AppMessage::CycleSettled(older_outcome));

    assert_eq!(dashboard.view().races.cards()[0].name, "Flemington Race new");
    assert_eq!(dashboard.refresh.phase(), RefreshPhase::Idle);
}

#[tokio::test]
async fn commands_round_trip_through_the_channel() {
    let source: Arc<dyn FeedSource> = Arc::new(StubFeeds {
        races: vec![race("7", "Randwick", true)],
        ..StubFeeds::default()
    });
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut dashboard = Dashboard::new(FilterKey::All);

    execute_command(Command::Refresh, &mut dashboard, &source, &tx);
    assert!(dashboard.is_refreshing());
    let message = rx.recv().await.expect("cycle settles");
    dashboard.handle_message(message);
    assert!(!dashboard.is_refreshing());
    assert_eq!(dashboard.view().races.len(), 1);

    let command = dashboard.request_ai_prediction().expect("race selected");
    execute_command(command, &mut dashboard, &source, &tx);
    let message = rx.recv().await.expect("prediction arrives");
    dashboard.handle_message(message);
    let popup = dashboard.ui.popup.clone().expect("prediction popup");
    assert_eq!(popup.title, "AI Prediction: Randwick Race 7");
    assert_eq!(popup.lines, vec!["Race 7: back the favourite"]);

    dashboard.ui.chat_input = "Any roughies?".to_string();
    let command = dashboard.submit_chat().expect("chat command");
    execute_command(command, &mut dashboard, &source, &tx);
    let message = rx.recv().await.expect("chat reply");
    dashboard.handle_message(message);
    assert_eq!(dashboard.chat.messages[1].text, "You asked: Any roughies?");
}

#[tokio::test]
async fn chat_failure_shows_fixed_apology() {
    let source: Arc<dyn FeedSource> = Arc::new(StubFeeds {
        ai_down: true,
        ..StubFeeds::default()
    });
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut dashboard = Dashboard::new(FilterKey::All);

    dashboard.ui.chat_input = "Who wins?".to_string();
    let command = dashboard.submit_chat().expect("chat command");
    execute_command(command, &mut dashboard, &source, &tx);
    dashboard.handle_message(rx.recv().await.expect("chat reply"));

    assert_eq!(dashboard.chat.messages.len(), 2);
    assert_eq!(
        dashboard.chat.messages[1].text,
        race_dash::app::state::CHAT_ERROR_MESSAGE
    );
}
