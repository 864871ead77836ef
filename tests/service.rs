//! End-to-end tests: mocked upstream APIs, real refresh cycle, real HTTP
//! surface on an ephemeral port.

use chrono::NaiveDateTime;
use common::{Reading, TIMESTAMP_FORMAT};
use geocoding_client::GeocodingClient;
use observation_store::ObservationStore;
use open_meteo_client::OpenMeteoClient;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weather_station::{http, scheduler::RefreshJob};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn mock_open_meteo(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "moscow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                { "name": "Moscow", "country": "Russia", "latitude": 55.75, "longitude": 37.62 }
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": { "time": "2025-11-09T06:00", "interval": 900, "temperature_2m": 3.5 }
        })))
        .mount(server)
        .await;
}

async fn serve(store: Arc<ObservationStore>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should bind");
    let addr = listener.local_addr().expect("listener should have an addr");
    tokio::spawn(async move {
        axum::serve(listener, http::router(store))
            .await
            .expect("server should run");
    });
    format!("http://{}", addr)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_one_cycle_then_query() {
    let upstream = MockServer::start().await;
    mock_open_meteo(&upstream).await;

    let store = Arc::new(ObservationStore::new());
    let mut job = RefreshJob::new(
        GeocodingClient::new(TIMEOUT)
            .expect("client should build")
            .with_base_url(upstream.uri()),
        OpenMeteoClient::new(TIMEOUT)
            .expect("client should build")
            .with_base_url(upstream.uri()),
        store.clone(),
        "moscow".into(),
        "moscow".into(),
    );

    job.run_cycle().await.expect("cycle should succeed");

    let base = serve(store).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/moscow", base))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("body should be JSON");
    assert_eq!(
        body,
        serde_json::json!([{ "timestamp": "2025-11-09T06:00", "value": 3.5 }])
    );

    // Mixed-case paths name the same series.
    let resp = client
        .get(format!("{}/Moscow", base))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("{}/paris", base))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(resp.status(), 404);
    assert_eq!(resp.text().await.expect("body should read"), "not found");
}

/// 100 concurrent reads racing an in-flight writer: every response is a 200
/// with a prefix-consistent series, and the whole burst completes within a
/// bounded timeout.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_queries_during_appends() {
    const APPENDS: u32 = 100;
    const READERS: usize = 100;

    let store = Arc::new(ObservationStore::new());
    store
        .append(
            "moscow",
            Reading {
                timestamp: NaiveDateTime::parse_from_str("2025-11-09T06:00", TIMESTAMP_FORMAT)
                    .expect("valid timestamp"),
                value: 0.0,
            },
        )
        .await;

    let base = serve(store.clone()).await;
    let client = reqwest::Client::new();

    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for i in 1..APPENDS {
                store
                    .append(
                        "moscow",
                        Reading {
                            timestamp: NaiveDateTime::parse_from_str(
                                "2025-11-09T06:00",
                                TIMESTAMP_FORMAT,
                            )
                            .expect("valid timestamp"),
                            value: f64::from(i),
                        },
                    )
                    .await;
                tokio::task::yield_now().await;
            }
        })
    };

    let mut readers = Vec::with_capacity(READERS);
    for _ in 0..READERS {
        let client = client.clone();
        let url = format!("{}/moscow", base);
        readers.push(tokio::spawn(async move {
            let resp = client.get(&url).send().await.expect("request should succeed");
            assert_eq!(resp.status(), 200);
            let series: Vec<Reading> = resp.json().await.expect("body should be JSON");
            assert!(!series.is_empty());
            assert!(series.len() <= APPENDS as usize);
            for (i, reading) in series.iter().enumerate() {
                assert_eq!(reading.value, i as f64, "torn read");
            }
        }));
    }

    let deadline = Duration::from_secs(10);
    tokio::time::timeout(deadline, writer)
        .await
        .expect("writer should finish in time")
        .expect("writer should not panic");
    for reader in readers {
        tokio::time::timeout(deadline, reader)
            .await
            .expect("reader should finish in time")
            .expect("reader should not panic");
    }

    assert_eq!(store.len("moscow").await, APPENDS as usize);
}
