use axum::Router;
use axum::extract::MatchedPath;
use axum::routing::get;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::Span;

use crate::config::Config;
use crate::storage;
use crate::todo::{TodoService, TodoState};

pub mod api;

/// Builds the full application: JSON API, health check and the static frontend.
pub fn create_app(todo_state: TodoState, static_dir: &str) -> Router {
    let frontend = ServeDir::new(static_dir).append_index_html_on_directories(true);

    Router::new()
        .merge(api::create_api_router(todo_state))
        .route("/health", get(health_check_handler))
        .fallback_service(frontend)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http().make_span_with(RequestMakeSpan)),
        )
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = storage::connect(&config.db_url).await?;
    let todo_state = TodoState::new(TodoService::new(Arc::new(db.clone())));
    let app = create_app(todo_state, &config.static_dir);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;
    tracing::info!("Web server stopped");

    // Clones share one pool, so closing this handle closes it for all of them.
    storage::close(db).await?;
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

/// Span for every HTTP request, tagged with the route that matched it.
#[derive(Clone, Debug)]
pub struct RequestMakeSpan;

impl<B> MakeSpan<B> for RequestMakeSpan {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let matched_path = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str);

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            matched_path,
        )
    }
}
