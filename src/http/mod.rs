use std::{io, sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use prometheus::Registry;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;

use crate::constants::METRICS_PATH;
use crate::prometheus_metrics::render;

/// Upper bound on serving a single HTTP request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
struct HttpServiceState {
    metrics: Arc<Registry>,
}

/// Bind the metrics endpoint to `listen_on` (format: `HOST:PORT`).
///
/// Binding happens before anything else is started, so a failure can be fatal.
pub async fn bind(listen_on: &str) -> io::Result<TcpListener> {
    TcpListener::bind(listen_on).await
}

/// Serve the metrics gathered from `metrics`, until `shutdown_token` is cancelled.
///
/// # Arguments
///
/// * `listener` - Bound via [`bind`]
/// * `metrics` - Registry to render at [`METRICS_PATH`]
/// * `shutdown_token` - When cancelled, the server stops accepting connections and returns
pub async fn serve(
    listener: TcpListener,
    metrics: Arc<Registry>,
    shutdown_token: CancellationToken,
) -> io::Result<()> {
    // Assemble the HTTP Service State object, that will be passed to the routes
    let state = HttpServiceState {
        metrics,
    };

    // Setup Router
    let app = Router::new()
        .route("/", get(root))
        .route(METRICS_PATH, get(prometheus_metrics))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state);

    match listener.local_addr() {
        Ok(addr) => info!("Begin listening on '{addr}'..."),
        Err(e) => warn!("Begin listening on unknown address: {e}"),
    }

    // Run Server, with Graceful Shutdown
    axum::serve(listener, app).with_graceful_shutdown(shutdown_token.cancelled_owned()).await
}

async fn root() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"))],
        concat!(
            "<html><head><title>Burrow Exporter</title></head><body>",
            "<h1>Burrow Exporter</h1>",
            "<p><a href=\"/metrics\">Metrics</a></p>",
            "</body></html>"
        ),
    )
}

async fn prometheus_metrics(State(state): State<HttpServiceState>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();

    // As defined by Prometheus: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#basic-info
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; version=0.0.4"));

    match render(&state.metrics) {
        Ok(body) => (StatusCode::OK, headers, body),
        Err(e) => {
            error!("Failed to encode metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, headers, format!("Failed to encode metrics: {e}"))
        },
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use prometheus::{IntGauge, Registry};
    use tokio_util::sync::CancellationToken;

    use super::{bind, serve};

    #[tokio::test]
    async fn serves_registry_until_cancelled() {
        let registry = Arc::new(Registry::new());
        let gauge = IntGauge::new("kafka_burrow_test_gauge", "A test gauge").unwrap();
        registry.register(Box::new(gauge.clone())).unwrap();
        gauge.set(42);

        let listener = bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let token = CancellationToken::new();
        let server = tokio::spawn(serve(listener, registry, token.clone()));

        let res = reqwest::get(format!("http://{addr}/metrics")).await.unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()["content-type"], "text/plain; version=0.0.4");
        assert!(res.text().await.unwrap().contains("kafka_burrow_test_gauge 42"));

        let res = reqwest::get(format!("http://{addr}/")).await.unwrap();
        assert_eq!(res.status(), 200);
        assert!(res.text().await.unwrap().contains("/metrics"));

        let res = reqwest::get(format!("http://{addr}/nope")).await.unwrap();
        assert_eq!(res.status(), 404);

        token.cancel();
        assert!(server.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn bind_fails_on_address_in_use() {
        let taken = bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        assert!(bind(&addr).await.is_err());
    }
}
