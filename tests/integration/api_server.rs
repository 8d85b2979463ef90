//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and error mapping.


use serde_json::Value;

use test_utils::TestApiServer;

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "tasignal-api");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let _ = app.server.get("/health").await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("http_request_duration_seconds"));
    assert!(body.contains("http_requests_in_flight"));
}

#[tokio::test]
async fn signal_endpoint_returns_result_and_report() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/signal")
        .add_query_param("symbol", "EUR/USD")
        .add_query_param("asset_class", "forex")
        .add_query_param("period", "30d")
        .add_query_param("interval", "1h")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["ticker"], "EURUSD=X");
    assert_eq!(body["asset_class"], "forex");
    assert_eq!(body["period"], "30d");
    assert_eq!(body["interval"], "1h");
    assert_eq!(body["rows"].as_array().unwrap().len(), 10);
    assert_eq!(body["rows"][0]["signal"], "Buy");
    assert!(body["report"].as_str().unwrap().starts_with("Signal Report"));

    let exported = app.metrics.export().unwrap();
    assert!(exported.contains("signals_computed_total"));
}

#[tokio::test]
async fn invalid_window_is_bad_request() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/signal")
        .add_query_param("symbol", "AAPL")
        .add_query_param("asset_class", "stocks")
        .add_query_param("period", "1y")
        .add_query_param("interval", "1m")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["kind"], "invalid_period_interval");
    assert_eq!(body["context"]["symbol"], "AAPL");
}

#[tokio::test]
async fn unknown_asset_class_is_bad_request() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/signal")
        .add_query_param("symbol", "AAPL")
        .add_query_param("asset_class", "bonds")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["kind"], "unsupported_asset_class");
}

#[tokio::test]
async fn short_history_is_unprocessable() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/signal")
        .add_query_param("symbol", "AAPL")
        .add_query_param("asset_class", "stocks")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 422);
    assert_eq!(response.json::<Value>()["kind"], "insufficient_data");
}

#[tokio::test]
async fn missing_symbol_on_feed_is_bad_gateway() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/signal")
        .add_query_param("symbol", "UNLISTED")
        .add_query_param("asset_class", "stocks")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 502);
    assert_eq!(response.json::<Value>()["kind"], "data_unavailable");
}

#[tokio::test]
async fn tickers_endpoint_lists_catalogue() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/tickers")
        .add_query_param("asset_class", "commodities")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let tickers = body["tickers"].as_array().unwrap();
    assert!(tickers
        .iter()
        .any(|t| t["label"] == "GOLD" && t["symbol"] == "GC=F"));

    let all: Value = app.server.get("/api/tickers").await.json();
    assert_eq!(all.as_object().unwrap().len(), 5);
}

#[tokio::test]
async fn windows_endpoint_lists_allowed_periods() {
    let app = TestApiServer::new().await;
    let body: Value = app.server.get("/api/windows").await.json();
    let hourly = body
        .as_array()
        .unwrap()
        .iter()
        .find(|w| w["interval"] == "1h")
        .unwrap();
    assert_eq!(hourly["periods"], serde_json::json!(["14d", "30d", "6mo"]));
}
