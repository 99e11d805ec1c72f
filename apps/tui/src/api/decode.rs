use chrono::{DateTime, Local, NaiveDateTime};

use crate::domain::{
    AiAnswer, AiPredictionEnvelope, InsightsEnvelope, MarketMover, MoversEnvelope, OddsEnvelope,
    OddsSnapshot, Prediction, PredictionsEnvelope, Roughie, RoughiesEnvelope,
};

pub fn decode_odds(body: &[u8]) -> serde_json::Result<OddsSnapshot> {
    let envelope: OddsEnvelope = serde_json::from_slice(body)?;
    Ok(OddsSnapshot {
        events: envelope.events,
        timestamp: envelope.timestamp.as_deref().and_then(parse_timestamp),
    })
}

pub fn decode_movers(body: &[u8]) -> serde_json::Result<Vec<MarketMover>> {
    serde_json::from_slice::<MoversEnvelope>(body).map(|envelope| envelope.movers)
}

pub fn decode_predictions(body: &[u8]) -> serde_json::Result<Vec<Prediction>> {
    serde_json::from_slice::<PredictionsEnvelope>(body).map(|envelope| envelope.predictions)
}

pub fn decode_roughies(body: &[u8]) -> serde_json::Result<Vec<Roughie>> {
    serde_json::from_slice::<RoughiesEnvelope>(body).map(|envelope| envelope.roughies)
}

/// A body without `ai_prediction` is reported as an error answer.
pub fn decode_ai_prediction(body: &[u8]) -> serde_json::Result<AiAnswer> {
    let envelope: AiPredictionEnvelope = serde_json::from_slice(body)?;
    Ok(envelope
        .ai_prediction
        .unwrap_or_else(|| AiAnswer::failed("response did not include an AI prediction")))
}

pub fn decode_insights(body: &[u8]) -> serde_json::Result<AiAnswer> {
    let envelope: InsightsEnvelope = serde_json::from_slice(body)?;
    Ok(envelope
        .insights
        .unwrap_or_else(|| AiAnswer::failed("response did not include insights")))
}

/// Parses RFC 3339 stamps and the offset-less ISO form `datetime.isoformat()` emits.
///
/// Stamps carrying an offset are converted to local time. Offset-less stamps
/// are taken as local already.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.with_timezone(&Local).naive_local());
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn odds_payload_from_python_backend() {
        let body = br#"{
            "events": [
                {"id": "hr2", "race": "Moonee Valley - 3:45 PM", "track": "Moonee Valley",
                 "horse1": "Silver Bullet", "horse2": "Golden Phoenix",
                 "odds1": 2.50, "odds2": 3.50, "trend": "down", "trendValue": "-0.15",
                 "featured": false}
            ],
            "timestamp": "2025-03-01T14:05:09.123456",
            "status": "live"
        }"#;

        let snapshot = decode_odds(body).expect("odds should decode");

        assert_eq!(snapshot.events.len(), 1);
        assert_eq!(snapshot.events[0].track, "Moonee Valley");
        let stamp = snapshot.timestamp.expect("timestamp should parse");
        assert_eq!((stamp.hour(), stamp.minute(), stamp.second()), (14, 5, 9));
    }

    #[test]
    fn unparseable_timestamp_is_dropped_not_fatal() {
        let snapshot =
            decode_odds(br#"{"events": [], "timestamp": "yesterday-ish"}"#).expect("decode");
        assert!(snapshot.timestamp.is_none());
    }

    #[test]
    fn rfc3339_timestamp_converts_to_local_time() {
        let stamp = parse_timestamp("2025-03-01T09:30:00Z").expect("rfc3339");
        let expected = DateTime::parse_from_rfc3339("2025-03-01T09:30:00+00:00")
            .expect("utc stamp")
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(stamp, expected);

        let offset = parse_timestamp("2025-03-01T20:30:00+11:00").expect("offset stamp");
        assert_eq!(offset, expected);
    }

    #[test]
    fn null_scalar_in_one_record_keeps_the_rest_of_the_feed() {
        let predictions = decode_predictions(
            br#"{"predictions": [
                {"id": 1, "track": "Randwick", "tip": "Silver Bullet", "confidence": 82},
                {"id": 2, "track": "Caulfield", "tip": null, "confidence": null, "reason": null}
            ]}"#,
        )
        .expect("predictions should decode");
        assert_eq!(predictions.len(), 2);
        assert!((predictions[0].confidence - 82.0).abs() < f64::EPSILON);
        assert_eq!(predictions[1].tip, "");
        assert!(predictions[1].confidence.abs() < f64::EPSILON);

        let movers = decode_movers(
            br#"{"movers": [{"position": "1", "horse": "Night Raider", "currentOdds": "4.5"}]}"#,
        )
        .expect("movers should decode");
        assert_eq!(movers[0].position, 1);
        assert!((movers[0].current_odds - 4.5).abs() < f64::EPSILON);

        let snapshot = decode_odds(
            br#"{"events": [{"id": "hr9", "track": "Doomben",
                 "horses": [{"name": null, "odds": 6.0}, {"name": "Long Shot", "odds": 21}]}]}"#,
        )
        .expect("odds should decode");
        assert_eq!(snapshot.events[0].horses.len(), 2);
        assert_eq!(snapshot.events[0].horses[0].name, "");
        assert_eq!(snapshot.events[0].horses[1].name, "Long Shot");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(decode_movers(b"<html>502 Bad Gateway</html>").is_err());
        assert!(decode_roughies(br#"{"roughies": "soon"}"#).is_err());
    }

    #[test]
    fn absent_collection_decodes_as_empty() {
        assert!(decode_predictions(br#"{"total": 0}"#)
            .expect("decode")
            .is_empty());
        assert!(decode_roughies(b"{}").expect("decode").is_empty());
    }

    #[test]
    fn insights_without_body_become_error_answer() {
        let answer = decode_insights(b"{}").expect("decode");
        assert!(answer.text().is_none());
        assert!(answer.error.is_some());

        let answer =
            decode_insights(br#"{"insights": {"response": "Watch the roughies at Caulfield"}}"#)
                .expect("decode");
        assert_eq!(answer.text(), Some("Watch the roughies at Caulfield"));
    }
}
