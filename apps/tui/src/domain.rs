use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// A race on the card, as served by `/api/odds`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RaceEventWire")]
pub struct RaceEvent {
    pub id: String,
    pub race: String,
    pub track: String,
    pub distance: Option<String>,
    pub class: Option<String>,
    pub prize: Option<String>,
    pub going: Option<String>,
    pub featured: bool,
    pub horses: Vec<Horse>,
    pub trend: Option<String>,
    pub trend_value: Option<String>,
}

impl RaceEvent {
    /// Runners shown on a card: the first two entries.
    pub fn headline_runners(&self) -> &[Horse] {
        &self.horses[..self.horses.len().min(2)]
    }

    /// Race-level trend, falling back to the lead runner's trend.
    pub fn trend_direction(&self) -> Option<&str> {
        self.trend
            .as_deref()
            .or_else(|| self.horses.first().and_then(|horse| horse.trend.as_deref()))
    }

    pub fn trend_magnitude(&self) -> Option<&str> {
        self.trend_value.as_deref().or_else(|| {
            self.horses
                .first()
                .and_then(|horse| horse.trend_value.as_deref())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horse {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub jockey: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub trainer: Option<String>,
    #[serde(
        default,
        alias = "winOdds",
        alias = "win_odds",
        deserialize_with = "lenient_f64"
    )]
    pub odds: f64,
    #[serde(default, alias = "place_odds", deserialize_with = "lenient_opt_f64")]
    pub place_odds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub trend: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub trend_value: Option<String>,
}

impl Horse {
    /// Backend place odds, or half the win odds when the feed omits them.
    pub fn place_price(&self) -> f64 {
        self.place_odds.unwrap_or(self.odds / 2.0)
    }

    fn from_flat(name: String, odds: f64) -> Self {
        Self {
            name,
            jockey: None,
            trainer: None,
            odds,
            place_odds: None,
            trend: None,
            trend_value: None,
        }
    }
}

/// Wire shape accepting both the runner list and the flat `horse1`/`odds1` layout.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RaceEventWire {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient_text")]
    race: String,
    #[serde(default, deserialize_with = "lenient_text")]
    track: String,
    #[serde(default, deserialize_with = "lenient_string")]
    distance: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    class: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    prize: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    going: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    featured: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    horses: Vec<Horse>,
    #[serde(default, deserialize_with = "lenient_string")]
    horse1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    horse2: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    odds1: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    odds2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    trend: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    trend_value: Option<String>,
}

impl From<RaceEventWire> for RaceEvent {
    fn from(wire: RaceEventWire) -> Self {
        let horses = if wire.horses.is_empty() {
            [(wire.horse1, wire.odds1), (wire.horse2, wire.odds2)]
                .into_iter()
                .filter_map(|(name, odds)| {
                    name.map(|name| Horse::from_flat(name, odds.unwrap_or_default()))
                })
                .collect()
        } else {
            wire.horses
        };

        Self {
            id: wire.id.unwrap_or_default(),
            race: wire.race,
            track: wire.track,
            distance: wire.distance,
            class: wire.class,
            prize: wire.prize,
            going: wire.going,
            featured: wire.featured,
            horses,
            trend: wire.trend,
            trend_value: wire.trend_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMover {
    #[serde(default, alias = "rank", deserialize_with = "lenient_u32")]
    pub position: u32,
    #[serde(default, deserialize_with = "lenient_text")]
    pub horse: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub track: String,
    #[serde(
        default,
        alias = "odds",
        alias = "current_odds",
        deserialize_with = "lenient_f64"
    )]
    pub current_odds: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub change: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub race: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub track: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tip: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub horse: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confidence: f64,
    #[serde(default, alias = "analysis", deserialize_with = "lenient_text")]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Roughie {
    #[serde(default, alias = "position", deserialize_with = "lenient_u32")]
    pub rank: u32,
    #[serde(default, deserialize_with = "lenient_text")]
    pub horse: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub track: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub odds: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confidence: f64,
    #[serde(default, alias = "reason", deserialize_with = "lenient_text")]
    pub analysis: String,
}

/// Reply body shared by the AI prediction and AI insights endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AiAnswer {
    #[serde(default, deserialize_with = "lenient_string")]
    pub analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub response: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub error: Option<String>,
}

impl AiAnswer {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// The answer text, whichever field the endpoint filled. Blank text counts as missing.
    pub fn text(&self) -> Option<&str> {
        let non_blank = |text: &&str| !text.trim().is_empty();
        self.response
            .as_deref()
            .filter(non_blank)
            .or_else(|| self.analysis.as_deref().filter(non_blank))
    }
}

/// Decoded `/api/odds` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OddsSnapshot {
    pub events: Vec<RaceEvent>,
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OddsEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub events: Vec<RaceEvent>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MoversEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub movers: Vec<MarketMover>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictionsEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RoughiesEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub roughies: Vec<Roughie>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AiPredictionEnvelope {
    #[serde(default)]
    pub ai_prediction: Option<AiAnswer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InsightsEnvelope {
    #[serde(default)]
    pub insights: Option<AiAnswer>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts strings, numbers and booleans for display-only fields.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

/// Like `lenient_string`, with `null` read as empty text.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Accepts numbers and numeric strings. Anything else reads as missing.
fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(number)) => number.as_f64(),
        Some(serde_json::Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_f64(deserializer)?.unwrap_or_default())
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(serde_json::Value::Number(number)) => {
            number.as_u64().and_then(|rank| u32::try_from(rank).ok())
        }
        Some(serde_json::Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or_default())
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(flag)) => flag,
        Some(serde_json::Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}
