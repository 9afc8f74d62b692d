//! Integration tests for the weather clients using wiremock
//!
//! These tests verify the archive and ASOS clients against a mock HTTP server.

use chrono::NaiveDate;
use integration_weather::{
    ArchiveClient, ArchiveConfig, AsosClient, AsosConfig, AsosRequest, OpenMeteoArchiveClient,
    WeatherError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

/// A full day (24 hours) of archive data with a few missing values
fn sample_archive_response(hours: usize) -> serde_json::Value {
    let time: Vec<String> = (0..hours).map(|h| format!("2023-06-01T{h:02}:00")).collect();
    let temps: Vec<serde_json::Value> = (0..hours)
        .map(|h| {
            if h == 3 {
                serde_json::Value::Null
            } else {
                serde_json::json!(70.0 + h as f64)
            }
        })
        .collect();
    let constant = |v: f64| vec![v; hours];

    serde_json::json!({
        "latitude": 30.42,
        "longitude": -97.91,
        "generationtime_ms": 0.2,
        "utc_offset_seconds": -18000,
        "timezone": "America/Chicago",
        "timezone_abbreviation": "CDT",
        "elevation": 210.0,
        "hourly_units": {
            "time": "iso8601",
            "temperature_2m": "°F",
            "cloud_cover": "%",
            "rain": "inch",
            "snowfall": "inch",
            "surface_pressure": "hPa",
            "pressure_msl": "hPa",
            "wind_speed_10m": "mp/h"
        },
        "hourly": {
            "time": time,
            "temperature_2m": temps,
            "cloud_cover": constant(25.0),
            "rain": constant(0.0),
            "snowfall": constant(0.0),
            "surface_pressure": constant(990.5),
            "pressure_msl": constant(1012.8),
            "wind_speed_10m": constant(7.4)
        }
    })
}

fn create_test_client(mock_server: &MockServer) -> OpenMeteoArchiveClient {
    let config = ArchiveConfig {
        base_url: mock_server.uri(),
        timeout_secs: 5,
        request_interval_ms: 0,
        ..Default::default()
    };
    OpenMeteoArchiveClient::new(config).unwrap()
}

fn june_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
}

async fn setup_archive_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

// ============================================================================
// Archive
// ============================================================================

#[tokio::test]
async fn test_hourly_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("start_date", "2023-06-01"))
        .and(query_param("end_date", "2023-06-01"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .and(query_param("wind_speed_unit", "mph"))
        .and(query_param("precipitation_unit", "inch"))
        .and(query_param("timezone", "America/Chicago"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_archive_response(24)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let samples = client.hourly(30.42, -97.91, june_first()).await.unwrap();

    assert_eq!(samples.len(), 24);
    assert_eq!(samples[12].temperature_2m, Some(82.0));
    assert_eq!(samples[12].time, june_first().and_hms_opt(12, 0, 0).unwrap());
    assert_eq!(samples[3].temperature_2m, None);
    assert_eq!(samples[0].pressure_msl, Some(1012.8));
}

#[tokio::test]
async fn test_hourly_short_series_is_returned_as_is() {
    let mock_server = MockServer::start().await;
    setup_archive_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_archive_response(5)),
    )
    .await;

    let client = create_test_client(&mock_server);
    let samples = client.hourly(30.42, -97.91, june_first()).await.unwrap();
    assert_eq!(samples.len(), 5);
}

#[tokio::test]
async fn test_hourly_missing_block_is_parse_error() {
    let mock_server = MockServer::start().await;
    setup_archive_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 30.42,
            "longitude": -97.91
        })),
    )
    .await;

    let client = create_test_client(&mock_server);
    let err = client.hourly(30.42, -97.91, june_first()).await.unwrap_err();
    assert!(matches!(err, WeatherError::ParseError(_)));
}

#[tokio::test]
async fn test_hourly_invalid_json() {
    let mock_server = MockServer::start().await;
    setup_archive_mock(&mock_server, ResponseTemplate::new(200).set_body_string("{")).await;

    let client = create_test_client(&mock_server);
    let err = client.hourly(30.42, -97.91, june_first()).await.unwrap_err();
    assert!(matches!(err, WeatherError::ParseError(_)));
}

#[tokio::test]
async fn test_hourly_rate_limited() {
    let mock_server = MockServer::start().await;
    setup_archive_mock(&mock_server, ResponseTemplate::new(429)).await;

    let client = create_test_client(&mock_server);
    let err = client.hourly(30.42, -97.91, june_first()).await.unwrap_err();
    assert!(matches!(err, WeatherError::RateLimitExceeded));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_hourly_server_error() {
    let mock_server = MockServer::start().await;
    setup_archive_mock(&mock_server, ResponseTemplate::new(500)).await;

    let client = create_test_client(&mock_server);
    let err = client.hourly(30.42, -97.91, june_first()).await.unwrap_err();
    assert!(matches!(err, WeatherError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn test_hourly_bad_request_not_retryable() {
    let mock_server = MockServer::start().await;
    setup_archive_mock(
        &mock_server,
        ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Parameter 'start_date' is out of allowed range"
        })),
    )
    .await;

    let client = create_test_client(&mock_server);
    let err = client.hourly(30.42, -97.91, june_first()).await.unwrap_err();
    assert!(matches!(err, WeatherError::RequestFailed(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_custom_units_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("temperature_unit", "celsius"))
        .and(query_param("timezone", "UTC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_archive_response(24)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ArchiveConfig {
        base_url: mock_server.uri(),
        temperature_unit: "celsius".into(),
        timezone: "UTC".into(),
        request_interval_ms: 0,
        ..Default::default()
    };
    let client = OpenMeteoArchiveClient::new(config).unwrap();
    assert!(client.hourly(30.42, -97.91, june_first()).await.is_ok());
}

// ============================================================================
// ASOS
// ============================================================================

fn asos_request() -> AsosRequest {
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    AsosRequest {
        stations: vec!["AUS".into(), "SAT".into()],
        variables: vec!["tmpf".into(), "mslp".into()],
        start: day.and_hms_opt(0, 0, 0).unwrap(),
        end: day.and_hms_opt(1, 0, 0).unwrap(),
        timezone: "America/Chicago".into(),
    }
}

fn asos_client(mock_server: &MockServer) -> AsosClient {
    AsosClient::new(AsosConfig {
        base_url: mock_server.uri(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_asos_download_success() {
    let mock_server = MockServer::start().await;
    let body = "station,valid,lon,lat,elevation,tmpf,mslp\n\
                AUS,2024-01-01 00:53,-97.6799,30.1831,150.0,48.0,1021.4\n";

    Mock::given(method("GET"))
        .and(path("/cgi-bin/request/asos.py"))
        .and(query_param("data", "tmpf,mslp"))
        .and(query_param("year1", "2024"))
        .and(query_param("hour2", "1"))
        .and(query_param("tz", "America/Chicago"))
        .and(query_param("format", "onlycomma"))
        .and(query_param("station", "SAT"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let text = asos_client(&mock_server).download(&asos_request()).await.unwrap();
    assert_eq!(text, body);
}

#[tokio::test]
async fn test_asos_server_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/request/asos.py"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = asos_client(&mock_server).download(&asos_request()).await.unwrap_err();
    assert!(matches!(err, WeatherError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn test_asos_invalid_request_is_not_sent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut request = asos_request();
    request.stations.clear();
    let err = asos_client(&mock_server).download(&request).await.unwrap_err();
    assert!(matches!(err, WeatherError::InvalidRequest(_)));
}
