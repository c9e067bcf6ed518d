use std::{sync::Arc, time::Duration};

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::{
    config::Config,
    features::{encoding_for, EncodingMode},
    model::Regressor,
    models::{feedback::FeedbackEntry, history::HistoryEntry, house::RawInput},
    services::{
        feedback::FeedbackStore,
        location::{self, LocationInsight},
        prediction::{self, Estimate},
        visualization::{self, Visualization},
    },
    session::{history::CSV_FILE_NAME, Session, SessionRegistry, SessionView},
    theme::Theme,
    validation::is_rejection,
};

pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub model: Arc<dyn Regressor>,
    pub sessions: Arc<SessionRegistry>,
    pub feedback: Arc<FeedbackStore>,
}

impl AppState {
    pub fn new(config: Arc<Config>, model: Arc<dyn Regressor>) -> Self {
        let feedback = Arc::new(FeedbackStore::new(&config.feedback_path));
        let idle_timeout = Duration::from_secs(config.session_idle_minutes * 60);
        AppState {
            config,
            model,
            sessions: Arc::new(SessionRegistry::new(idle_timeout)),
            feedback,
        }
    }
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse { data }))
}

/// Unwraps a JSON body, turning a malformed one into a `400` with the
/// usual error body.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        warn!("rejected request body: {}", rejection.body_text());
        api_error(StatusCode::BAD_REQUEST, rejection.body_text())
    })
}

#[derive(Serialize)]
pub struct CreatedSession {
    pub session_id: String,
    pub session: SessionView,
}

#[derive(Deserialize)]
pub struct ThemeRequest {
    pub dark_mode: bool,
}

#[derive(Deserialize)]
pub struct LocationQuery {
    pub city: Option<String>,
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub name: Option<String>,
    #[serde(default = "default_rating")]
    pub rating: i64,
    #[serde(default)]
    pub feedback: String,
}

fn default_rating() -> i64 {
    5
}

#[derive(Serialize)]
pub struct FeedbackBoard {
    pub entries: Vec<FeedbackEntry>,
}

#[derive(Serialize)]
pub struct ModelSummary {
    pub expected_count: Option<usize>,
    pub expected_names: Option<Vec<String>>,
    pub encoding: EncodingMode,
    pub has_feature_importances: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/session", get(current_session).post(create_session))
        .route("/api/session/start", post(get_started))
        .route("/api/session/logout", post(logout))
        .route("/api/session/theme", put(set_theme))
        .route("/api/model", get(model_summary))
        .route("/api/predict", post(predict))
        .route("/api/history", get(history))
        .route("/api/history.csv", get(history_csv))
        .route("/api/visualization", get(visualization_data))
        .route("/api/location", get(location_insights))
        .route("/api/feedback", get(feedback_board).post(submit_feedback))
        .layer(middleware::from_fn(cors_layer))
        .with_state(state)
}

pub async fn start_http_server(
    state: AppState,
    mut shutdown_rx: tokio::sync::broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let bind_addr = state
        .config
        .http_bind_address
        .clone()
        .unwrap_or_else(|| "0.0.0.0:8080".to_string());

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("listening on {}", bind_addr);
    let app = router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    Ok(())
}

async fn cors_layer(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        apply_cors_headers(response.headers_mut());
        *response.status_mut() = StatusCode::NO_CONTENT;
        response
    } else {
        let mut response = next.run(req).await;
        apply_cors_headers(response.headers_mut());
        response
    }
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type, x-session-id"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, OPTIONS"),
    );
}

fn session_id(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "missing session id"))
}

/// Runs `f` on the caller's session, whether logged in or not.
fn with_any_session<R>(
    state: &AppState,
    headers: &HeaderMap,
    f: impl FnOnce(&mut Session) -> R,
) -> Result<R, ApiError> {
    let id = session_id(headers)?;
    state
        .sessions
        .with_session(&id, f)
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "unknown session"))
}

/// Like `with_any_session`, but only past the welcome page.
fn with_app_session<R>(
    state: &AppState,
    headers: &HeaderMap,
    f: impl FnOnce(&mut Session) -> R,
) -> Result<R, ApiError> {
    with_any_session(state, headers, |session| {
        if session.logged_in {
            Some(f(session))
        } else {
            None
        }
    })?
    .ok_or_else(|| api_error(StatusCode::FORBIDDEN, "press Get Started first"))
}

async fn create_session(State(state): State<AppState>) -> ApiResult<CreatedSession> {
    let session_id = state.sessions.create();
    let session = state
        .sessions
        .with_session(&session_id, |session| session.view())
        .ok_or_else(|| api_error(StatusCode::INTERNAL_SERVER_ERROR, "session vanished"))?;
    ok(CreatedSession {
        session_id,
        session,
    })
}

async fn current_session(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<SessionView> {
    ok(with_any_session(&state, &headers, |session| session.view())?)
}

async fn get_started(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<SessionView> {
    ok(with_any_session(&state, &headers, |session| {
        session.get_started();
        session.view()
    })?)
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<SessionView> {
    ok(with_any_session(&state, &headers, |session| {
        session.logout();
        session.view()
    })?)
}

async fn set_theme(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ThemeRequest>, JsonRejection>,
) -> ApiResult<Theme> {
    let body = json_body(body)?;
    let dark = with_any_session(&state, &headers, |session| {
        session.dark_mode = body.dark_mode;
        session.dark_mode
    })?;
    ok(Theme::for_mode(dark))
}

async fn model_summary(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<ModelSummary> {
    with_app_session(&state, &headers, |_| ())?;
    let schema = state.model.schema();
    ok(ModelSummary {
        encoding: encoding_for(&schema),
        expected_count: schema.expected_count,
        expected_names: schema.expected_names,
        has_feature_importances: state.model.feature_importances().is_some(),
    })
}

async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    input: Result<Json<RawInput>, JsonRejection>,
) -> ApiResult<Estimate> {
    with_app_session(&state, &headers, |_| ())?;
    let input = json_body(input)?;

    let estimate = prediction::estimate(state.model.as_ref(), &state.config.currency_symbol, &input)
        .await
        .map_err(|err| {
            if is_rejection(&err) {
                api_error(StatusCode::BAD_REQUEST, err.to_string())
            } else {
                error!("prediction failed: {:#}", err);
                api_error(StatusCode::UNPROCESSABLE_ENTITY, format!("{:#}", err))
            }
        })?;

    // Recorded even if the session logged out while the model was answering
    let currency = state.config.currency_symbol.clone();
    with_any_session(&state, &headers, |session| {
        session.history.record(&input, estimate.price, &currency)
    })?;

    ok(estimate)
}

async fn history(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Vec<HistoryEntry>> {
    ok(with_app_session(&state, &headers, |session| {
        session.history.entries().to_vec()
    })?)
}

async fn history_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let csv = with_app_session(&state, &headers, |session| session.history.to_csv())?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        csv,
    ))
}

async fn visualization_data(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Visualization> {
    ok(with_app_session(&state, &headers, |session| {
        visualization::build(state.model.as_ref(), &session.history)
    })?)
}

async fn location_insights(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(LocationQuery { city }): Query<LocationQuery>,
) -> ApiResult<LocationInsight> {
    with_app_session(&state, &headers, |_| ())?;
    ok(location::insights(city.as_deref()))
}

async fn feedback_board(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<FeedbackBoard> {
    with_app_session(&state, &headers, |_| ())?;
    let entries = state.feedback.recent(state.config.feedback_board_size).await;
    ok(FeedbackBoard { entries })
}

async fn submit_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> ApiResult<FeedbackEntry> {
    with_app_session(&state, &headers, |_| ())?;
    let body = json_body(body)?;

    let entry = state
        .feedback
        .submit(body.name.as_deref(), body.rating, &body.feedback)
        .await
        .map_err(|err| {
            if is_rejection(&err) {
                warn!("feedback rejected: {}", err);
                api_error(StatusCode::BAD_REQUEST, err.to_string())
            } else {
                error!("failed to store feedback: {:#}", err);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to store feedback")
            }
        })?;

    with_any_session(&state, &headers, |session| session.feedback_submitted = true)?;
    ok(entry)
}
