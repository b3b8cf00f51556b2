//! Integration tests for the GitHub provider using wiremock

use chrono::NaiveDate;
use pkg_pulse::fetch::github::Provider;
use pkg_pulse::fetch::{FORKS, FetchOutcome, OPEN_ISSUES, RepoRef, STARS, Source};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
}

#[tokio::test]
async fn test_fetch_snapshots_repo_counts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/widget"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1296269,
            "node_id": "MDEwOlJlcG9zaXRvcnkxMjk2MjY5",
            "name": "widget",
            "full_name": "acme/widget",
            "stargazers_count": 42,
            "forks_count": 7,
            "open_issues_count": 3
        })))
        .mount(&mock_server)
        .await;

    let provider = Provider::new(None, Some(&mock_server.uri())).expect("Failed to create provider");
    let repo_ref = RepoRef::parse("acme/widget").unwrap();
    let outcome = provider.fetch(&repo_ref, today()).await;

    let readings = outcome.as_found().expect("expected Found outcome");
    assert_eq!(readings.len(), 3);
    assert!(readings.iter().all(|r| r.item == "acme/widget" && r.source == Source::GitHub && r.date == today()));

    let find = |metric: &str| readings.iter().find(|r| r.metric == metric).unwrap().value;
    assert_eq!(find(STARS), 42);
    assert_eq!(find(FORKS), 7);
    assert_eq!(find(OPEN_ISSUES), 3);
}

#[tokio::test]
async fn test_fetch_missing_repo_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest/repos/repos#get-a-repository"
        })))
        .mount(&mock_server)
        .await;

    let provider = Provider::new(None, Some(&mock_server.uri())).expect("Failed to create provider");
    let repo_ref = RepoRef::parse("acme/gone").unwrap();
    let outcome = provider.fetch(&repo_ref, today()).await;

    assert!(matches!(outcome, FetchOutcome::NotFound));
}
