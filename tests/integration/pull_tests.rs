//! Integration tests for the collection pull
//!
//! These tests use wiremock to create mock Discogs endpoints and exercise
//! the full pull cycle end-to-end: pagination, pricing, retry behavior,
//! autosave cadence, and early-abort persistence.

use discollect::config::{ApiConfig, Config, OutputConfig, PullConfig};
use discollect::output::{CsvReport, EnrichedRecord, ReportSink};
use discollect::pull::Walker;
use discollect::RetryPolicy;
use serde_json::json;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USERNAME: &str = "testuser";
const COLLECTION_PATH: &str = "/users/testuser/collection/folders/0/releases";

/// Creates a test configuration pointed at the mock server, with zero pacing
fn create_test_config(base_url: &str, table_path: &str) -> Config {
    Config {
        api: ApiConfig {
            token: "testtoken".to_string(),
            username: USERNAME.to_string(),
            base_url: base_url.to_string(),
            user_agent: "DiscollectTest/1.0".to_string(),
        },
        pull: PullConfig {
            page_size: 100,
            pacing_delay: 0.0,
            autosave_interval: 10,
        },
        output: OutputConfig {
            table_path: table_path.to_string(),
        },
    }
}

/// Retry policy with millisecond backoff so failure tests stay fast
fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        initial_backoff: Duration::from_millis(5),
        request_timeout: Duration::from_secs(5),
    }
}

/// Sink that records how many rows each persist call carried
#[derive(Default)]
struct CountingSink {
    calls: Mutex<Vec<usize>>,
}

impl ReportSink for CountingSink {
    fn persist(&self, records: &[EnrichedRecord]) -> discollect::output::ReportResult<()> {
        self.calls.lock().unwrap().push(records.len());
        Ok(())
    }
}

fn collection_page(releases: serde_json::Value, next: Option<&str>) -> serde_json::Value {
    let urls = match next {
        Some(next) => json!({ "next": next }),
        None => json!({}),
    };
    json!({
        "pagination": { "urls": urls },
        "releases": releases
    })
}

#[tokio::test]
async fn test_end_to_end_two_items() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("table.csv");

    let page = collection_page(
        json!([
            {
                "basic_information": {
                    "id": 111,
                    "title": "Endtroducing.....",
                    "artists": [{"name": "DJ Shadow"}]
                }
            },
            {
                "basic_information": {
                    "id": 222,
                    "title": "Dummy",
                    "artists": [{"name": "Portishead"}]
                }
            }
        ]),
        None,
    );

    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/marketplace/stats/111"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"lowest_price": 12.345, "num_for_sale": 4})),
        )
        .mount(&mock_server)
        .await;

    // Stats exist but carry no data for this release
    Mock::given(method("GET"))
        .and(path("/marketplace/stats/222"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), table_path.to_str().unwrap());
    let sink = CsvReport::new(&table_path);
    let outcome = Walker::with_policy(&config, fast_policy())
        .unwrap()
        .run(&sink)
        .await
        .unwrap();

    assert_eq!(outcome.seen, 2);
    assert_eq!(outcome.stored, 1);
    assert_eq!(outcome.pages, 1);
    assert!(!outcome.aborted);

    let content = std::fs::read_to_string(&table_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "release_id,artist,title,lowest_price,num_for_sale",
            "111,DJ Shadow,Endtroducing.....,12.35,4",
        ]
    );
}

#[tokio::test]
async fn test_pagination_follows_next_verbatim_and_terminates() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("table.csv");

    // The next locator is an arbitrary complete URL; the walker must use it
    // as sent rather than rebuilding it from page numbers
    let next_url = format!("{}/collection-page-two", mock_server.uri());

    let page_one = collection_page(
        json!([{"basic_information": {"id": 1, "title": "One", "artists": [{"name": "A"}]}}]),
        Some(&next_url),
    );
    let page_two = collection_page(
        json!([{"basic_information": {"id": 2, "title": "Two", "artists": [{"name": "B"}]}}]),
        None,
    );

    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_one))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/collection-page-two"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_two))
        .expect(1)
        .mount(&mock_server)
        .await;

    for id in [1, 2] {
        Mock::given(method("GET"))
            .and(path(format!("/marketplace/stats/{}", id)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"lowest_price": 5.0, "num_for_sale": 1})),
            )
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server.uri(), table_path.to_str().unwrap());
    let sink = CsvReport::new(&table_path);
    let outcome = Walker::with_policy(&config, fast_policy())
        .unwrap()
        .run(&sink)
        .await
        .unwrap();

    assert_eq!(outcome.pages, 2);
    assert_eq!(outcome.seen, 2);
    assert_eq!(outcome.stored, 2);
    assert!(!outcome.aborted);

    // Rows keep processing order across pages
    let content = std::fs::read_to_string(&table_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert!(lines[1].starts_with("1,A,One"));
    assert!(lines[2].starts_with("2,B,Two"));
}

#[tokio::test]
async fn test_429_retry_after_overrides_backoff() {
    let mock_server = MockServer::start().await;

    let page = collection_page(
        json!([{"basic_information": {"id": 7, "title": "T", "artists": [{"name": "X"}]}}]),
        None,
    );

    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page))
        .mount(&mock_server)
        .await;

    // First stats call is rate limited with an immediate go-ahead; mounted
    // first so it consumes the first request, then the 200 takes over
    Mock::given(method("GET"))
        .and(path("/marketplace/stats/7"))
        .respond_with(
            ResponseTemplate::new(429).insert_header("Retry-After", "0"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/marketplace/stats/7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"lowest_price": 3.0, "num_for_sale": 2})),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    // A deliberately long backoff: only the Retry-After value of 0 seconds
    // can make this test finish quickly
    let policy = RetryPolicy {
        max_attempts: 5,
        initial_backoff: Duration::from_secs(30),
        request_timeout: Duration::from_secs(5),
    };

    let sink = CountingSink::default();
    let started = Instant::now();
    let outcome = Walker::with_policy(&config, policy)
        .unwrap()
        .run(&sink)
        .await
        .unwrap();

    assert_eq!(outcome.stored, 1);
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "retry waited on backoff instead of Retry-After"
    );
}

#[tokio::test]
async fn test_gives_up_after_five_attempts() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("table.csv");

    // Persistent server errors: exactly 5 attempts, then the call degrades
    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(5)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), table_path.to_str().unwrap());
    let sink = CsvReport::new(&table_path);
    let outcome = Walker::with_policy(&config, fast_policy())
        .unwrap()
        .run(&sink)
        .await
        .unwrap();

    assert!(outcome.aborted);
    assert_eq!(outcome.pages, 0);
    assert_eq!(outcome.stored, 0);

    // Final persist still happened: header-only table on disk
    let content = std::fs::read_to_string(&table_path).unwrap();
    assert_eq!(
        content.trim_end(),
        "release_id,artist,title,lowest_price,num_for_sale"
    );
}

#[tokio::test]
async fn test_unauthorized_is_terminal_single_attempt() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("table.csv");

    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), table_path.to_str().unwrap());
    let sink = CsvReport::new(&table_path);
    let outcome = Walker::with_policy(&config, fast_policy())
        .unwrap()
        .run(&sink)
        .await
        .unwrap();

    assert!(outcome.aborted);
    assert_eq!(outcome.seen, 0);
}

#[tokio::test]
async fn test_failed_page_preserves_partial_results() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("table.csv");

    let next_url = format!("{}/collection-page-two", mock_server.uri());
    let page_one = collection_page(
        json!([{"basic_information": {"id": 5, "title": "Kept", "artists": [{"name": "K"}]}}]),
        Some(&next_url),
    );

    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_one))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/collection-page-two"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/marketplace/stats/5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"lowest_price": 8.5, "num_for_sale": 6})),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), table_path.to_str().unwrap());
    let sink = CsvReport::new(&table_path);
    let outcome = Walker::with_policy(&config, fast_policy())
        .unwrap()
        .run(&sink)
        .await
        .unwrap();

    assert!(outcome.aborted);
    assert_eq!(outcome.pages, 1);
    assert_eq!(outcome.stored, 1);

    // The partial result survived the failed page
    let content = std::fs::read_to_string(&table_path).unwrap();
    assert!(content.lines().nth(1).unwrap().starts_with("5,K,Kept,8.50,6"));
}

#[tokio::test]
async fn test_autosave_counts_seen_items_not_stored() {
    let mock_server = MockServer::start().await;

    // Ten releases, none of which resolve a price
    let releases: Vec<serde_json::Value> = (1..=10)
        .map(|id| {
            json!({"basic_information": {"id": id, "title": format!("R{}", id), "artists": []}})
        })
        .collect();
    let page = collection_page(json!(releases), None);

    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page))
        .mount(&mock_server)
        .await;

    for id in 1..=10 {
        Mock::given(method("GET"))
            .and(path(format!("/marketplace/stats/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lowest_price": null})))
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let sink = CountingSink::default();
    let outcome = Walker::with_policy(&config, fast_policy())
        .unwrap()
        .run(&sink)
        .await
        .unwrap();

    assert_eq!(outcome.seen, 10);
    assert_eq!(outcome.stored, 0);

    // One autosave at the 10th seen item plus the final persist, both with
    // zero rows: the cadence tracks items seen, not records stored
    let calls = sink.calls.lock().unwrap();
    assert_eq!(*calls, vec![0, 0]);
}

#[tokio::test]
async fn test_release_without_id_is_skipped_but_counted() {
    let mock_server = MockServer::start().await;

    let page = collection_page(
        json!([
            {"basic_information": {"title": "No Id Here", "artists": []}},
            {"basic_information": {"id": 3, "title": "Fine", "artists": [{"name": "F"}]}}
        ]),
        None,
    );

    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/marketplace/stats/3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"lowest_price": 1.0, "num_for_sale": 1})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let sink = CountingSink::default();
    let outcome = Walker::with_policy(&config, fast_policy())
        .unwrap()
        .run(&sink)
        .await
        .unwrap();

    assert_eq!(outcome.seen, 2);
    assert_eq!(outcome.stored, 1);
    assert!(!outcome.aborted);
}

#[tokio::test]
async fn test_malformed_collection_body_aborts() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("table.csv");

    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), table_path.to_str().unwrap());
    let sink = CsvReport::new(&table_path);
    let outcome = Walker::with_policy(&config, fast_policy())
        .unwrap()
        .run(&sink)
        .await
        .unwrap();

    assert!(outcome.aborted);
    assert!(table_path.exists());
}
