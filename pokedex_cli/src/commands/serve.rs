use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use clap::Args;
use pokedex_lib::{Envelope, LookupHandler, PokedexConfig};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
}

pub async fn run(args: &ServeArgs, config: &PokedexConfig) -> Result<()> {
    let addr = format!("{}:{}", args.host, args.port);
    let handler = Arc::new(LookupHandler::from_config(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Lookup endpoint: http://{}/api/pokemon?q=pikachu", addr);

    axum::serve(listener, router(handler))
        .await
        .context("Server error")?;

    Ok(())
}

/// Routes for the lookup endpoint and a liveness check, with permissive CORS.
pub fn router(handler: Arc<LookupHandler>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/pokemon", get(lookup))
        .route("/health", get(health))
        .layer(cors)
        .with_state(handler)
}

async fn lookup(
    State(handler): State<Arc<LookupHandler>>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<Envelope>) {
    let response = handler.handle(params.q.as_deref()).await;
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body))
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use pokedex_lib::pokedex_api::{self, Client};
    use serde_json::Value;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PIKACHU: &str = include_str!("../../../pokedex_api/tests/fixtures/pikachu.json");

    fn app(base_url: &str) -> Router {
        router(Arc::new(LookupHandler::new(Client::with_base_url(base_url))))
    }

    async fn send_get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send_get(app("http://127.0.0.1:1"), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn missing_query_is_bad_request() {
        for uri in ["/api/pokemon", "/api/pokemon?q=", "/api/pokemon?q=%20%20"] {
            let (status, body) = send_get(app("http://127.0.0.1:1"), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            let body: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body["error"], "Search term is required");
            assert_eq!(body["success"], false);
        }
    }

    #[tokio::test]
    async fn found_record_is_wrapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PIKACHU))
            .mount(&server)
            .await;

        let (status, body) = send_get(app(&server.uri()), "/api/pokemon?q=Pikachu").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["name"], "pikachu");
        assert_eq!(body["data"]["totalMetrics"], 320);
    }

    #[tokio::test]
    async fn upstream_not_found_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/missingno"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (status, body) = send_get(app(&server.uri()), "/api/pokemon?q=missingno").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], pokedex_api::NOT_FOUND_MESSAGE);
        assert_eq!(body["success"], false);
    }
}
