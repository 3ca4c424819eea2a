use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use products_posts::Page;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{config::AppConfig, upstream::Upstream};

/// The served page sits behind an async mutex; a change request holds it for
/// the whole refresh, so concurrent requests queue instead of interleaving.
#[derive(Clone)]
pub struct AppState {
    pub page: Arc<Mutex<Page<Upstream>>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(page: Page<Upstream>, config: Arc<AppConfig>) -> Self {
        Self {
            page: Arc::new(Mutex::new(page)),
            config,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "employee posts server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::POST, Method::GET])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/", get(page_handler))
        .route("/main", get(main_handler))
        .route("/events/change", post(change_handler))
        .route("/events/click/{post_id}", post(click_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
}

async fn page_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.page.lock().await.to_html())
}

async fn main_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.page.lock().await.main_html())
}

/// Body of a dropdown change; `value` may be a string or a number, as a
/// form field or a JSON client would send it.
#[derive(Deserialize)]
struct ChangeRequest {
    #[serde(default)]
    value: Value,
}

impl ChangeRequest {
    fn selected_value(&self) -> String {
        match &self.value {
            Value::String(value) => value.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangeResponse {
    user_id: u64,
    posts: usize,
    detached: usize,
    attached: usize,
}

async fn change_handler(
    State(state): State<AppState>,
    Json(request): Json<ChangeRequest>,
) -> HttpResult<Json<ChangeResponse>> {
    let mut page = state.page.lock().await;
    let report = page
        .dispatch_change(request.selected_value())
        .await
        .map_err(|err| HttpError::internal(err.into()))?
        .ok_or_else(|| HttpError::new(StatusCode::CONFLICT, "page not initialized"))?;
    Ok(Json(ChangeResponse {
        user_id: report.user_id,
        posts: report.posts.len(),
        detached: report.refresh.detached.len(),
        attached: report.refresh.attached.len(),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClickResponse {
    post_id: u64,
    hidden: bool,
    label: String,
}

async fn click_handler(
    State(state): State<AppState>,
    Path(post_id): Path<u64>,
) -> HttpResult<Json<ClickResponse>> {
    let mut page = state.page.lock().await;
    let outcome = page
        .click_post(post_id)
        .map_err(|err| HttpError::internal(err.into()))?
        .ok_or_else(|| HttpError::new(StatusCode::NOT_FOUND, "no comment toggle for post"))?;
    if outcome.section.found().is_none() {
        warn!(post_id, "toggle button has no comment section");
    }
    Ok(Json(ClickResponse {
        post_id,
        hidden: page.comments_hidden(post_id).unwrap_or(true),
        label: page.button_label(post_id).unwrap_or_default(),
    }))
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
        }
    }

    fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
