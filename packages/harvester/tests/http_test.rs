//! Fetcher and pipeline tests against a mock results endpoint.
//!
//! The harvester uses a blocking client, so every call runs inside
//! `spawn_blocking` while the mock server lives on the async runtime.

use std::fs;
use std::path::Path;
use std::time::Duration;

use volby_harvester::http::HttpTransport;
use volby_harvester::{Backoff, HarvestConfig, HarvesterError, Pipeline, RegionFetcher, RetryPolicy};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PATH: &str = "/pls/prez2023/vysledky_kraj";

fn region_xml() -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("vysledky_kraj_cz064.xml");
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn results_url(server: &MockServer) -> String {
    format!("{}{RESULTS_PATH}", server.uri())
}

/// Build the fetcher on the blocking thread; the client must not live on the runtime.
fn fetcher(url: String, retry: RetryPolicy) -> RegionFetcher<HttpTransport> {
    let transport = HttpTransport::new(Duration::from_secs(2)).expect("client builds");
    RegionFetcher::new(transport, url, 1, retry)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_sends_round_and_region() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("kolo", "1"))
        .and(query_param("nuts", "CZ064"))
        .respond_with(ResponseTemplate::new(200).set_body_string(region_xml()))
        .expect(1)
        .mount(&server)
        .await;

    let url = results_url(&server);
    let body = tokio::task::spawn_blocking(move || fetcher(url, RetryPolicy::default()).fetch("CZ064"))
        .await
        .expect("join")
        .expect("fetch succeeds");

    assert_eq!(body, region_xml());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_gives_up_after_six_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(6)
        .mount(&server)
        .await;

    let url = results_url(&server);
    let err = tokio::task::spawn_blocking(move || fetcher(url, RetryPolicy::default()).fetch("CZ010"))
        .await
        .expect("join")
        .expect_err("every attempt fails");

    match err {
        HarvesterError::MaxRetriesExceeded {
            region,
            attempts,
            message,
        } => {
            assert_eq!(region, "CZ010");
            assert_eq!(attempts, 6);
            assert!(message.contains("503"), "{message}");
        }
        other => panic!("expected MaxRetriesExceeded, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_recovers_after_transient_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
        .expect(1)
        .mount(&server)
        .await;

    let retry = RetryPolicy::new(5, Backoff::Fixed(Duration::from_millis(10)));
    let url = results_url(&server);
    let body = tokio::task::spawn_blocking(move || fetcher(url, retry).fetch("CZ010"))
        .await
        .expect("join")
        .expect("third attempt succeeds");

    assert_eq!(body, "<ok/>");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_times_out_slow_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(region_xml())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let url = results_url(&server);
    let err = tokio::task::spawn_blocking(move || {
        let transport = HttpTransport::new(Duration::from_millis(50)).expect("client builds");
        RegionFetcher::new(transport, url, 1, RetryPolicy::new(1, Backoff::None)).fetch("CZ064")
    })
    .await
    .expect("join")
    .expect_err("attempts time out");

    assert!(matches!(
        err,
        HarvesterError::MaxRetriesExceeded { attempts: 2, .. }
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pipeline_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("nuts", "CZ064"))
        .respond_with(ResponseTemplate::new(200).set_body_string(region_xml()))
        .mount(&server)
        .await;

    let config = HarvestConfig::new()
        .with_results_url(results_url(&server))
        .with_regions(["CZ064"]);

    let (records, districts) = tokio::task::spawn_blocking(move || {
        let pipeline = Pipeline::from_config(config)?;
        Ok::<_, HarvesterError>((pipeline.run()?, pipeline.run_districts()?))
    })
    .await
    .expect("join")
    .expect("pipeline succeeds");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].region_id(), "CZ064");
    assert_eq!(records[0].total_votes(), 638_880);
    assert_eq!(districts.len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pipeline_stops_at_failing_region() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("nuts", "CZ010"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<VYSLEDKY_KRAJ/>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("nuts", "CZ064"))
        .respond_with(ResponseTemplate::new(200).set_body_string(region_xml()))
        .expect(0)
        .mount(&server)
        .await;

    let config = HarvestConfig::new()
        .with_results_url(results_url(&server))
        .with_regions(["CZ010", "CZ064"]);

    let err = tokio::task::spawn_blocking(move || Pipeline::from_config(config)?.run())
        .await
        .expect("join")
        .expect_err("first region is invalid");

    assert!(matches!(err, HarvesterError::MissingElement { .. }));
}
