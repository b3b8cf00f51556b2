//! Integration tests for the npm provider using wiremock

use chrono::NaiveDate;
use pkg_pulse::fetch::npm::Provider;
use pkg_pulse::fetch::{DAILY_DOWNLOADS, FetchOutcome, Source};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
}

#[tokio::test]
async fn test_fetch_requests_trailing_year_ending_yesterday() {
    let mock_server = MockServer::start().await;

    // today 2026-02-20 -> end 2026-02-19, start 364 days earlier
    Mock::given(method("GET"))
        .and(path("/downloads/range/2025-02-20:2026-02-19/armoriq"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "start": "2025-02-20",
            "end": "2026-02-19",
            "package": "armoriq",
            "downloads": [
                {"day": "2026-02-18", "downloads": 120},
                {"day": "2026-02-19", "downloads": 131}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = Provider::new(Some(&mock_server.uri())).expect("Failed to create provider");
    let outcome = provider.fetch("armoriq", today()).await;

    let readings = outcome.as_found().expect("expected Found outcome");
    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].source, Source::Npm);
    assert_eq!(readings[0].metric, DAILY_DOWNLOADS);
    assert_eq!(readings[1].value, 131);
    assert_eq!(readings[1].date, NaiveDate::from_ymd_opt(2026, 2, 19).unwrap());
}

#[tokio::test]
async fn test_fetch_scoped_package() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/downloads/range/2025-02-20:2026-02-19/@armoriq/sdk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "downloads": [{"day": "2026-02-19", "downloads": 7}]
        })))
        .mount(&mock_server)
        .await;

    let provider = Provider::new(Some(&mock_server.uri())).expect("Failed to create provider");
    let outcome = provider.fetch("@armoriq/sdk", today()).await;

    let readings = outcome.as_found().expect("expected Found outcome");
    assert_eq!(readings[0].item, "@armoriq/sdk");
}

#[tokio::test]
async fn test_fetch_unknown_package_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": "package nonexistent not found"
        })))
        .mount(&mock_server)
        .await;

    let provider = Provider::new(Some(&mock_server.uri())).expect("Failed to create provider");
    let outcome = provider.fetch("nonexistent", today()).await;

    assert!(matches!(outcome, FetchOutcome::NotFound));
}
