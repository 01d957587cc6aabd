//! Integration tests for `CountsClient` using wiremock HTTP mocks.

use nmcoast_api::{ClientError, CountsClient};
use nmcoast_core::{DatastreamDirection, DatastreamType};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> CountsClient {
    CountsClient::new(base_url, 30).expect("client construction should not fail")
}

#[tokio::test]
async fn list_counters_returns_parsed_records() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "counter_id": 1,
            "counter_code": "BOA_STADIUM",
            "counter_name": "Bank of America Stadium",
            "vendor": "SensorCorp",
            "latitude": 35.225833,
            "longitude": -80.852778,
            "counter_notes": "Main entrance"
        },
        {
            "counter_id": 3,
            "counter_code": "FREEDOM_PARK",
            "counter_name": "Freedom Park Main Entrance",
            "vendor": "TrailTech",
            "latitude": 35.186,
            "longitude": -80.827,
            "counter_notes": ""
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/counters/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let counters = client.list_counters().await.expect("should parse counters");

    assert_eq!(counters.len(), 2);
    assert_eq!(counters[0].counter_id, 1);
    assert_eq!(counters[0].counter_name, "Bank of America Stadium");
    assert_eq!(counters[1].vendor, "TrailTech");
}

#[tokio::test]
async fn list_datastreams_hits_nested_path() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "datastream_id": 4,
            "counter_id": 3,
            "datastream_type": "Combined",
            "datastream_name": "Park Entrance Combined",
            "datastream_direction": "COMBINED",
            "datastream_notes": null
        },
        {
            "datastream_id": 5,
            "counter_id": 3,
            "datastream_type": "Roadway Cyclist",
            "datastream_name": "Cyclist Road Entrance",
            "datastream_direction": "IN"
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/counters/3/datastreams/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let streams = client
        .list_datastreams(3)
        .await
        .expect("should parse datastreams");

    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0].datastream_type, DatastreamType::Combined);
    assert_eq!(streams[1].datastream_direction, DatastreamDirection::In);
}

#[tokio::test]
async fn list_counts_parses_qa_flags() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "count_id": 100,
            "datastream_id": 5,
            "date_time": "2024-05-27T08:00:00",
            "raw_count": 162,
            "maxday": 1,
            "maxhour": 1,
            "gap": 1,
            "zero": 1,
            "stat": 0,
            "cleaned_count": 158.9
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/datastreams/5/counts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let counts = client.list_counts(5).await.expect("should parse counts");

    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].raw_count, Some(162));
    assert_eq!(counts[0].stat, Some(0));
}

#[tokio::test]
async fn http_404_surfaces_as_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/counters/99/datastreams/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "detail": "Counter with ID 99 not found."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.list_datastreams(99).await;

    assert!(matches!(result, Err(ClientError::Http(_))), "got: {result:?}");
}

#[tokio::test]
async fn malformed_body_surfaces_as_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/counters/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"an array\"}"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.list_counters().await;

    match result {
        Err(ClientError::Deserialize { context, .. }) => {
            assert_eq!(context, "list_counters");
        }
        other => panic!("expected Deserialize error, got: {other:?}"),
    }
}
