//! Integration tests for the Discord provider using wiremock

use chrono::NaiveDate;
use pkg_pulse::fetch::discord::Provider;
use pkg_pulse::fetch::{FetchOutcome, MEMBERS, ONLINE, Source};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
}

#[tokio::test]
async fn test_fetch_reads_both_counts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invites/vYqbNP3q"))
        .and(query_param("with_counts", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "vYqbNP3q",
            "approximate_member_count": 1280,
            "approximate_presence_count": 97,
            "guild": {"id": "1", "name": "ArmorIQ"}
        })))
        .mount(&mock_server)
        .await;

    let provider = Provider::new(Some(&mock_server.uri())).expect("Failed to create provider");
    let outcome = provider.fetch("vYqbNP3q", today()).await;

    let readings = outcome.as_found().expect("expected Found outcome");
    assert_eq!(readings.len(), 2);
    assert!(readings.iter().all(|r| r.source == Source::Discord && r.date == today()));

    let members = readings.iter().find(|r| r.metric == MEMBERS).unwrap();
    assert_eq!(members.value, 1280);
    let online = readings.iter().find(|r| r.metric == ONLINE).unwrap();
    assert_eq!(online.value, 97);
}

#[tokio::test]
async fn test_fetch_missing_counts_yields_no_readings() {
    let mock_server = MockServer::start().await;

    // Invite resolved without with_counts data
    Mock::given(method("GET"))
        .and(path("/invites/vYqbNP3q"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "vYqbNP3q"
        })))
        .mount(&mock_server)
        .await;

    let provider = Provider::new(Some(&mock_server.uri())).expect("Failed to create provider");
    let outcome = provider.fetch("vYqbNP3q", today()).await;

    assert_eq!(outcome.as_found().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_fetch_unknown_invite_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invites/expired"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Unknown Invite",
            "code": 10006
        })))
        .mount(&mock_server)
        .await;

    let provider = Provider::new(Some(&mock_server.uri())).expect("Failed to create provider");
    let outcome = provider.fetch("expired", today()).await;

    assert!(matches!(outcome, FetchOutcome::NotFound));
}
