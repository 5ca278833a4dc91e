use crate::dispatch::CommandHandler;
use anime_filters_protocol::{
    serialize_json, CommandRequest, CommandResponse, HealthReport, COMMAND_API_VERSION,
};
use anime_filters_store::{store_write_lock_wait_ms_last, store_write_lock_wait_ms_max, LabelStore};
use anyhow::Result;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{Response as HttpResponse, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct HttpState {
    pub(crate) handler: CommandHandler,
}

pub(crate) fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/command", post(http_command))
        .route("/health", get(http_health))
        .with_state(state)
}

pub(crate) async fn serve(bind: &str, handler: CommandHandler) -> Result<()> {
    let app = router(Arc::new(HttpState { handler }));
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    log::info!("Serving Command API: {base_url}/command");
    crate::print_stdout(&format!("Serving Command API: {base_url}/command"))?;
    crate::print_stdout(&format!("Health endpoint: {base_url}/health"))?;
    crate::print_stdout(&format!(
        "Try: curl -X POST {base_url}/command -H 'Content-Type: application/json' -d '{{\"chat_id\":\"local\",\"command\":\"list\"}}'"
    ))?;

    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) fn error_response(code: &str, message: String) -> CommandResponse {
    let hint = match code {
        "invalid_request" => Some(
            "Send a JSON object with chat_id, command and optional args/page.".to_string(),
        ),
        _ => None,
    };
    CommandResponse::error(code, format!("❌ {message}"), message, hint)
}

pub(crate) fn build_response<T: Serialize>(
    status: StatusCode,
    payload: &T,
) -> Result<Response, StatusCode> {
    let bytes = serialize_json(payload)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .into_bytes();

    HttpResponse::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

pub(crate) async fn http_command(
    State(state): State<Arc<HttpState>>,
    body: Bytes,
) -> Result<Response, StatusCode> {
    let request: CommandRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            let response =
                error_response("invalid_request", format!("Invalid JSON request: {err}"));
            return build_response(StatusCode::BAD_REQUEST, &response);
        }
    };
    let response = state.handler.execute(request).await;
    build_response(StatusCode::OK, &response)
}

pub(crate) async fn http_health(
    State(state): State<Arc<HttpState>>,
) -> Result<Response, StatusCode> {
    let report = health_report(state.handler.engine().store().as_ref()).await;
    build_response(StatusCode::OK, &report)
}

/// Snapshot of the store; `degraded` when its statistics cannot be read.
pub(crate) async fn health_report(store: &dyn LabelStore) -> HealthReport {
    let descriptor = store.descriptor();
    let (status, scopes, labels, failure_reason) = match store.stats().await {
        Ok(stats) => ("ok", Some(stats.scopes), Some(stats.labels), None),
        Err(err) => {
            log::warn!("health check failed: {err}");
            ("degraded", None, None, Some(err.to_string()))
        }
    };

    HealthReport {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_version: COMMAND_API_VERSION,
        backend: descriptor.backend.to_string(),
        partition: descriptor.partition.to_string(),
        order: descriptor.order.to_string(),
        location: descriptor.location,
        scopes,
        labels,
        failure_reason,
        write_lock_wait_ms_last: store_write_lock_wait_ms_last(),
        write_lock_wait_ms_max: store_write_lock_wait_ms_max(),
    }
}
