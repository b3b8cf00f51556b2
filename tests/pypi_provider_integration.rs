//! Integration tests for the PyPI provider using wiremock

use chrono::NaiveDate;
use pkg_pulse::fetch::pypi::Provider;
use pkg_pulse::fetch::{DAILY_DOWNLOADS, Source};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn overall_body() -> serde_json::Value {
    serde_json::json!({
        "data": [
            {"category": "with_mirrors", "date": "2026-02-19", "downloads": 3454},
            {"category": "without_mirrors", "date": "2026-02-19", "downloads": 3000},
            {"category": "with_mirrors", "date": "2026-02-20", "downloads": 3465}
        ],
        "package": "armoriq-sdk",
        "type": "overall_downloads"
    })
}

#[tokio::test]
async fn test_fetch_keeps_only_mirror_inclusive_counts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/packages/armoriq-sdk/overall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overall_body()))
        .mount(&mock_server)
        .await;

    let provider = Provider::new(Some(&mock_server.uri())).expect("Failed to create provider");
    let outcome = provider.fetch("armoriq-sdk").await;

    let readings = outcome.as_found().expect("expected Found outcome");
    assert_eq!(readings.len(), 2);
    for reading in readings {
        assert_eq!(reading.item, "armoriq-sdk");
        assert_eq!(reading.source, Source::PyPi);
        assert_eq!(reading.metric, DAILY_DOWNLOADS);
    }
    assert_eq!(readings[0].value, 3454);
    assert_eq!(readings[0].date, NaiveDate::from_ymd_opt(2026, 2, 19).unwrap());
    assert_eq!(readings[1].value, 3465);
}

#[tokio::test]
async fn test_fetch_unknown_package_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/packages/nonexistent/overall"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let provider = Provider::new(Some(&mock_server.uri())).expect("Failed to create provider");
    let outcome = provider.fetch("nonexistent").await;

    assert!(matches!(outcome, pkg_pulse::fetch::FetchOutcome::NotFound));
}

#[tokio::test]
async fn test_fetch_retries_server_errors() {
    let mock_server = MockServer::start().await;

    // First attempt fails with a 500; the retry succeeds
    Mock::given(method("GET"))
        .and(path("/packages/armoriq-sdk/overall"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/packages/armoriq-sdk/overall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overall_body()))
        .mount(&mock_server)
        .await;

    let provider = Provider::new(Some(&mock_server.uri())).expect("Failed to create provider");
    let outcome = provider.fetch("armoriq-sdk").await;

    assert!(outcome.is_found(), "expected retry to recover from the 500");
}

#[tokio::test]
async fn test_fetch_empty_data_is_found_but_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/packages/quiet-package/overall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .mount(&mock_server)
        .await;

    let provider = Provider::new(Some(&mock_server.uri())).expect("Failed to create provider");
    let outcome = provider.fetch("quiet-package").await;

    assert_eq!(outcome.as_found().map(Vec::len), Some(0));
}
