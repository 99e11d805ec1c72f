use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use race_dash::api::{FeedSource, FetchError, HttpFeedClient};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn spawn_backend() -> String {
    let app = Router::new()
        .route(
            "/api/odds",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/api/market-movers",
            get(|| async {
                Json(json!({
                    "movers": [
                        {"position": 1, "horse": "Night Raider", "track": "Flemington",
                         "currentOdds": 4.5, "change": "+0.50", "direction": "up"}
                    ]
                }))
            }),
        )
        .route(
            "/api/predictions",
            get(|| async { Json(json!({"predictions": null})) }),
        )
        .route("/api/roughies", get(|| async { "not json" }))
        .route(
            "/api/ai-prediction/{race_id}",
            get(|Path(race_id): Path<String>| async move {
                Json(json!({"ai_prediction": {"analysis": format!("analysis for {race_id}")}}))
            }),
        )
        .route(
            "/api/ai-insights",
            post(|Json(body): Json<Value>| async move {
                let query = body["query"].as_str().unwrap_or_default().to_string();
                Json(json!({"insights": {"response": format!("echo: {query}")}}))
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub backend");
    });

    format!("http://{addr}/api")
}

#[tokio::test]
async fn server_error_becomes_status_error() {
    let client = HttpFeedClient::new(&spawn_backend().await).expect("client");

    let err = client.fetch_odds().await.expect_err("odds returns 500");
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn envelopes_decode_and_null_lists_are_empty() {
    let client = HttpFeedClient::new(&spawn_backend().await).expect("client");

    let movers = client.fetch_market_movers().await.expect("movers");
    assert_eq!(movers.len(), 1);
    assert_eq!(movers[0].horse, "Night Raider");
    assert!((movers[0].current_odds - 4.5).abs() < f64::EPSILON);

    let predictions = client.fetch_predictions().await.expect("predictions");
    assert!(predictions.is_empty());
}

#[tokio::test]
async fn malformed_body_becomes_decode_error() {
    let client = HttpFeedClient::new(&spawn_backend().await).expect("client");

    let err = client.fetch_roughies().await.expect_err("roughies is not JSON");
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn ai_endpoints_encode_ids_and_post_queries() {
    let client = HttpFeedClient::new(&spawn_backend().await).expect("client");

    let answer = client.fetch_ai_prediction("race 1").await.expect("prediction");
    assert_eq!(answer.text(), Some("analysis for race 1"));

    let answer = client.ask_ai_insights("best roughie?").await.expect("insights");
    assert_eq!(answer.text(), Some("echo: best roughie?"));
}

#[tokio::test]
async fn unreachable_backend_becomes_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = HttpFeedClient::new(&format!("http://{addr}/api")).expect("client");
    let err = client.fetch_odds().await.expect_err("nothing listening");
    assert!(matches!(err, FetchError::Transport { .. }));
}
