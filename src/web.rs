// Comment Dashboard - HTTP API
// Routes behind the web dashboard; the binary in bin/server.rs only binds and serves them

use crate::charts::{ChartKind, ChartOutcome};
use crate::dashboard::{CardPage, Dashboard, Layout};
use crate::data::BankFilter;
use crate::navigation::{Direction, PageCursor};
use crate::sessions::SessionStore;
use crate::stats::StatisticsSnapshot;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};
use uuid::Uuid;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    dashboard: Arc<Dashboard>,
    sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(dashboard: Dashboard, session_ttl: chrono::Duration) -> Self {
        let sessions = SessionStore::new(dashboard.max_page(), session_ttl);
        Self {
            dashboard: Arc::new(dashboard),
            sessions: Arc::new(sessions),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<Option<()>> {
    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Card page plus the session it belongs to
#[derive(Serialize)]
struct SessionPage {
    session_id: Uuid,
    #[serde(flatten)]
    page: CardPage,
}

#[derive(Deserialize)]
struct ChartQuery {
    bank: Option<String>,
}

impl ChartQuery {
    fn filter(&self) -> BankFilter {
        self.bank
            .as_deref()
            .map(BankFilter::from_selection)
            .unwrap_or_default()
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/layout - Tabs, controls and dropdown options
async fn get_layout(State(state): State<AppState>) -> Json<ApiResponse<Layout>> {
    Json(ApiResponse::ok(state.dashboard.layout()))
}

/// GET /api/stats - Statistics snapshot
async fn get_stats(State(state): State<AppState>) -> Json<ApiResponse<StatisticsSnapshot>> {
    Json(ApiResponse::ok(state.dashboard.stats().clone()))
}

/// POST /api/sessions - Start a pagination session on page 0
async fn create_session(State(state): State<AppState>) -> Response {
    let (session_id, cursor) = state.sessions.create();
    let page = state.dashboard.card_page(&cursor);

    (
        StatusCode::CREATED,
        Json(ApiResponse::ok(SessionPage { session_id, page })),
    )
        .into_response()
}

/// GET /api/sessions/:id/cards - Current page of a session
async fn get_session_cards(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match Uuid::parse_str(&id) {
        Ok(session_id) => session_page(&state, session_id, state.sessions.current(&session_id)),
        Err(_) => unknown_session(&id),
    }
}

/// POST /api/sessions/:id/next
async fn next_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    navigate_session(&state, &id, Direction::Next)
}

/// POST /api/sessions/:id/prev
async fn prev_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    navigate_session(&state, &id, Direction::Prev)
}

// Ids that are not UUIDs get the same 404 envelope as expired sessions
fn navigate_session(state: &AppState, id: &str, direction: Direction) -> Response {
    match Uuid::parse_str(id) {
        Ok(session_id) => session_page(
            state,
            session_id,
            state.sessions.navigate(&session_id, direction),
        ),
        Err(_) => unknown_session(id),
    }
}

fn session_page(state: &AppState, session_id: Uuid, cursor: Option<PageCursor>) -> Response {
    match cursor {
        Some(cursor) => {
            debug!("Session {} on page {}", session_id, cursor.page());
            let page = state.dashboard.card_page(&cursor);
            Json(ApiResponse::ok(SessionPage { session_id, page })).into_response()
        }
        None => unknown_session(&session_id.to_string()),
    }
}

fn unknown_session(id: &str) -> Response {
    warn!("Unknown or expired session {}", id);
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(format!("unknown session {}", id))),
    )
        .into_response()
}

/// GET /api/charts/comments-by-year?bank=
async fn comments_by_year_chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Json<ApiResponse<ChartOutcome>> {
    let outcome = state
        .dashboard
        .chart(ChartKind::CommentsByYear, &query.filter());
    Json(ApiResponse::ok(outcome))
}

/// GET /api/charts/sentiment-by-bank?bank=
async fn sentiment_by_bank_chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Json<ApiResponse<ChartOutcome>> {
    let outcome = state
        .dashboard
        .chart(ChartKind::SentimentByBank, &query.filter());
    Json(ApiResponse::ok(outcome))
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState, static_dir: &FsPath) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/layout", get(get_layout))
        .route("/stats", get(get_stats))
        .route("/sessions", post(create_session))
        .route("/sessions/:id/cards", get(get_session_cards))
        .route("/sessions/:id/next", post(next_page))
        .route("/sessions/:id/prev", post(prev_page))
        .route("/charts/comments-by-year", get(comments_by_year_chart))
        .route("/charts/sentiment-by-bank", get(sentiment_by_bank_chart))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CommentRecord, CommentTable};
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state(bank_count: usize) -> AppState {
        let mut records = vec![
            CommentRecord::new("BankA", 2020, Some("pos")),
            CommentRecord::new("BankA", 2021, Some("neg")),
            CommentRecord::new("BankB", 2020, Some("pos")),
        ];
        for i in 0..bank_count {
            records.push(CommentRecord::new(&format!("Extra{i:02}"), 2022, Some("neutral")));
        }
        let dashboard = Dashboard::new(CommentTable::new(records, true), 16);
        AppState::new(dashboard, chrono::Duration::minutes(30))
    }

    fn app(state: AppState) -> Router {
        router(state, FsPath::new("web"))
    }

    async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = send(app(test_state(0)), Method::GET, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], "OK");
    }

    #[tokio::test]
    async fn test_stats() {
        let (status, json) = send(app(test_state(0)), Method::GET, "/api/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total_comments"], 3);
        assert_eq!(json["data"]["comments_by_year"]["2020"], 2);
        assert_eq!(json["data"]["comments_by_bank"][0]["bank"], "BankA");
    }

    #[tokio::test]
    async fn test_session_navigation_is_per_client() {
        // 2 + 20 banks -> 23 cards -> pages 0..=1
        let state = test_state(20);

        let (status, first) = send(app(state.clone()), Method::POST, "/api/sessions").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["data"]["page"], 0);
        assert_eq!(first["data"]["max_page"], 1);
        assert_eq!(first["data"]["cards"].as_array().unwrap().len(), 16);

        let (_, second) = send(app(state.clone()), Method::POST, "/api/sessions").await;

        let a = first["data"]["session_id"].as_str().unwrap().to_string();
        let b = second["data"]["session_id"].as_str().unwrap().to_string();

        for _ in 0..3 {
            send(app(state.clone()), Method::POST, &format!("/api/sessions/{a}/next")).await;
        }

        let (_, a_page) =
            send(app(state.clone()), Method::GET, &format!("/api/sessions/{a}/cards")).await;
        let (_, b_page) =
            send(app(state.clone()), Method::GET, &format!("/api/sessions/{b}/cards")).await;

        assert_eq!(a_page["data"]["page"], 1, "next must clamp at max_page");
        assert_eq!(a_page["data"]["cards"].as_array().unwrap().len(), 7);
        assert_eq!(b_page["data"]["page"], 0, "other session must not move");

        let (_, back) =
            send(app(state.clone()), Method::POST, &format!("/api/sessions/{a}/prev")).await;
        assert_eq!(back["data"]["page"], 0);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let uri = format!("/api/sessions/{}/next", Uuid::new_v4());
        let (status, json) = send(app(test_state(0)), Method::POST, &uri).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("unknown session"));
    }

    #[tokio::test]
    async fn test_malformed_session_id_is_404_envelope() {
        for (method, uri) in [
            (Method::POST, "/api/sessions/not-a-uuid/next"),
            (Method::POST, "/api/sessions/null/prev"),
            (Method::GET, "/api/sessions/null/cards"),
        ] {
            let (status, json) = send(app(test_state(0)), method, uri).await;

            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(json["success"], false, "{uri} must return the JSON envelope");
            assert!(json["error"].as_str().unwrap().contains("unknown session"));
        }
    }

    #[tokio::test]
    async fn test_comments_by_year_chart() {
        let (status, json) = send(
            app(test_state(0)),
            Method::GET,
            "/api/charts/comments-by-year?bank=BankA",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let outcome = &json["data"];
        assert_eq!(outcome["status"], "ready");
        let bars = outcome["chart"]["bars"].as_array().unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0]["category"], "2020");
        assert_eq!(bars[0]["value"], 1);
    }

    #[tokio::test]
    async fn test_chart_defaults_to_all_banks() {
        let (_, json) = send(
            app(test_state(0)),
            Method::GET,
            "/api/charts/sentiment-by-bank",
        )
        .await;

        let chart = &json["data"]["chart"];
        assert_eq!(chart["title"], "Distribution des Sentiments pour Tout");
        assert_eq!(chart["bars"][0]["category"], "pos");
        assert_eq!(chart["bars"][0]["value"], 2);
    }

    #[tokio::test]
    async fn test_unknown_bank_chart_is_empty() {
        let (status, json) = send(
            app(test_state(0)),
            Method::GET,
            "/api/charts/comments-by-year?bank=Nowhere",
        )
        .await;

        assert_eq!(status, StatusCode::OK, "empty charts are not errors");
        assert_eq!(json["data"]["status"], "empty");
        assert_eq!(json["data"]["reason"]["kind"], "no_matching_rows");
    }

    #[tokio::test]
    async fn test_layout() {
        let (_, json) = send(app(test_state(0)), Method::GET, "/api/layout").await;

        let tabs = json["data"]["tabs"].as_array().unwrap();
        assert_eq!(tabs.len(), 3);
        assert_eq!(tabs[0]["label"], "Accueil");
        assert_eq!(tabs[2]["controls"][0]["options"][0]["value"], "Tout");
    }

    #[tokio::test]
    async fn test_index_served() {
        let response = app(test_state(0))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("card-container"));
    }
}
