// Event module for race_dash
// Refresh orchestration, the terminal loop and headless output

pub mod headless;
pub mod loop_handler;
pub mod refresh;

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::api::FeedSource;
use crate::app::{Command, Dashboard};
use crate::domain::AiAnswer;
use refresh::{spawn_cycle, CycleOutcome};

pub use headless::run_headless;
pub use loop_handler::run;

/// Results delivered back to the event loop by background tasks.
#[derive(Debug)]
pub enum AppMessage {
    CycleSettled(CycleOutcome),
    ChatReply(AiAnswer),
    AiPrediction { race_name: String, answer: AiAnswer },
}

/// Starts the background work a command asks for. Never blocks the loop.
pub fn execute_command(
    command: Command,
    dashboard: &mut Dashboard,
    source: &Arc<dyn FeedSource>,
    tx: &UnboundedSender<AppMessage>,
) {
    match command {
        Command::Refresh => {
            let generation = dashboard.begin_refresh();
            spawn_cycle(Arc::clone(source), generation, tx.clone());
        }
        Command::AskAiPrediction { race_id, race_name } => {
            let source = Arc::clone(source);
            let tx = tx.clone();
            tokio::spawn(async move {
                let answer = source
                    .fetch_ai_prediction(&race_id)
                    .await
                    .unwrap_or_else(|e| AiAnswer::failed(e.to_string()));
                if tx.send(AppMessage::AiPrediction { race_name, answer }).is_err() {
                    debug!(event = "ai_prediction.orphaned", race_id = %race_id);
                }
            });
        }
        Command::SendChat(query) => {
            let source = Arc::clone(source);
            let tx = tx.clone();
            tokio::spawn(async move {
                let answer = source
                    .ask_ai_insights(&query)
                    .await
                    .unwrap_or_else(|e| AiAnswer::failed(e.to_string()));
                if tx.send(AppMessage::ChatReply(answer)).is_err() {
                    debug!(event = "chat.orphaned");
                }
            });
        }
    }
}
