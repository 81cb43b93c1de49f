use std::sync::Arc;

use pokedex_api::middleware::MemorySink;
use pokedex_api::{Client, Error};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_pokemon_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("pikachu.json");

    Mock::given(method("GET"))
        .and(path("/pokemon/pikachu"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client.get_pokemon("Pikachu").await;
    assert!(result.is_ok());

    let raw = result.unwrap();
    assert_eq!(raw["id"], 25);
    assert_eq!(raw["name"], "pikachu");
}

#[tokio::test]
async fn get_pokemon_not_found_is_translated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon/missingno"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client.get_pokemon("missingno").await.unwrap_err();
    assert_eq!(err, Error::NotFound);
    assert_eq!(
        err.to_string(),
        "Pokémon not found. Please try a different search term."
    );
}

#[tokio::test]
async fn get_pokemon_server_error_is_translated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon/pikachu"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client.get_pokemon("pikachu").await.unwrap_err();
    assert_eq!(err, Error::UpstreamUnavailable);
}

#[tokio::test]
async fn get_pokemon_other_status_is_wrapped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon/pikachu"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client.get_pokemon("pikachu").await.unwrap_err();
    assert_eq!(
        err,
        Error::SearchFailed("HTTP 503: Service Unavailable".to_string())
    );
}

#[tokio::test]
async fn get_pokemon_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon/pikachu"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client.get_pokemon("pikachu").await;
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[tokio::test]
async fn unreachable_upstream_is_a_connectivity_error() {
    // Nothing listens on port 1.
    let client = Client::with_base_url("http://127.0.0.1:1");
    let err = client.get_pokemon("pikachu").await.unwrap_err();
    assert_eq!(err, Error::Connectivity);
}

#[tokio::test]
async fn pipeline_events_reach_the_sink() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("pikachu.json");

    Mock::given(method("GET"))
        .and(path("/pokemon/pikachu"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let client = Client::with_base_url(&mock_server.uri()).with_sink(sink.clone());
    client.get_pokemon("pikachu").await.unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(events[0].message.contains("Starting GET"));
    assert_eq!(
        events[0].fields["args"],
        json!(format!("{}/pokemon/pikachu", mock_server.uri()))
    );
    assert_eq!(events[1].fields["resultType"], json!("object"));
    assert_eq!(events[1].fields["hasData"], json!(false));
}

#[tokio::test]
async fn custom_resource_changes_the_path() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("pikachu.json");

    Mock::given(method("GET"))
        .and(path("/entities/pikachu"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).with_resource("entities");
    assert!(client.get_pokemon("pikachu").await.is_ok());
}
