//! HTTP front for a single heatmap controller.
//!
//! Routes:
//!   GET  /api/health              → health check
//!   GET  /api/state               → year, birth profile, rebuild counter
//!   GET  /api/heatmap             → render commands for the whole canvas
//!   GET  /api/cell?x=&y=          → day under a canvas pixel (404 when none)
//!   GET  /api/tooltip?x=&y=&vw=&vh= → cell plus tooltip placement
//!   PUT  /api/year                → switch year and rebuild
//!   PUT  /api/birth               → replace birth profile and rebuild
//!   PUT  /api/canvas              → resize the drawing area
//!   POST /api/regenerate          → rescore with fresh randomness

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post, put};
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use heatmap_core::controller::HeatmapController;
use heatmap_core::profile::{BirthProfile, RawProfile};
use heatmap_core::protocol::{
    CanvasRequest, CellInfo, HealthResponse, StateResponse, TooltipResponse, YearRequest,
};
use heatmap_core::random::ChaChaSource;
use heatmap_core::render::RenderCommands;

type Controller = HeatmapController<ChaChaSource>;

/// Shared state for route handlers.
#[derive(Clone)]
struct AppState {
    controller: Arc<Mutex<Controller>>,
    start_time: Instant,
}

impl AppState {
    fn new(controller: Controller) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            start_time: Instant::now(),
        }
    }

    fn controller(&self) -> Result<MutexGuard<'_, Controller>, ApiError> {
        self.controller
            .lock()
            .map_err(|_| ApiError::internal("controller lock poisoned"))
    }
}

/// Start the HTTP server. Blocks until shutdown.
pub async fn run(
    controller: Controller,
    listen_addr: &str,
    shutdown: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let app = router(AppState::new(controller));

    let listener = TcpListener::bind(listen_addr).await?;
    info!("Heatmap HTTP server listening on {listen_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            loop {
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
            }
        })
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/state", get(current_state))
        .route("/api/heatmap", get(heatmap))
        .route("/api/cell", get(cell))
        .route("/api/tooltip", get(tooltip))
        .route("/api/year", put(set_year))
        .route("/api/birth", put(set_birth))
        .route("/api/canvas", put(set_canvas))
        .route("/api/regenerate", post(regenerate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── errors ───────────────────────────────────────────────────────────────

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

// ── queries ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PointQuery {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct TooltipQuery {
    x: f64,
    y: f64,
    /// Viewport size; defaults to the canvas.
    vw: Option<f64>,
    vh: Option<f64>,
}

// ── route handlers ───────────────────────────────────────────────────────

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn current_state(State(state): State<AppState>) -> Result<Json<StateResponse>, ApiError> {
    Ok(Json(state.controller()?.state()))
}

async fn heatmap(State(state): State<AppState>) -> Result<Json<RenderCommands>, ApiError> {
    Ok(Json(state.controller()?.render()))
}

async fn cell(
    State(state): State<AppState>,
    Query(q): Query<PointQuery>,
) -> Result<Json<CellInfo>, ApiError> {
    state
        .controller()?
        .cell_info_at(q.x, q.y)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("no day at ({}, {})", q.x, q.y)))
}

async fn tooltip(
    State(state): State<AppState>,
    Query(q): Query<TooltipQuery>,
) -> Result<Json<TooltipResponse>, ApiError> {
    let controller = state.controller()?;
    let (cw, ch) = controller.layout().canvas_size();
    let viewport = (q.vw.unwrap_or(cw), q.vh.unwrap_or(ch));
    controller
        .tooltip_at(q.x, q.y, viewport)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("no day at ({}, {})", q.x, q.y)))
}

async fn set_year(
    State(state): State<AppState>,
    Json(req): Json<YearRequest>,
) -> Result<Json<StateResponse>, ApiError> {
    let mut controller = state.controller()?;
    controller.set_year(req.year);
    info!("Year set to {}", req.year);
    Ok(Json(controller.state()))
}

async fn set_birth(
    State(state): State<AppState>,
    Json(raw): Json<RawProfile>,
) -> Result<Json<StateResponse>, ApiError> {
    let profile = BirthProfile::try_from(raw).map_err(|e| {
        warn!("Rejected birth profile: {e}");
        ApiError::unprocessable(e.to_string())
    })?;
    let mut controller = state.controller()?;
    controller.set_birth_profile(profile);
    info!("Birth profile set to {profile}");
    Ok(Json(controller.state()))
}

async fn set_canvas(
    State(state): State<AppState>,
    Json(req): Json<CanvasRequest>,
) -> Result<Json<StateResponse>, ApiError> {
    let mut controller = state.controller()?;
    controller
        .set_canvas_size(req.width, req.height)
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;
    Ok(Json(controller.state()))
}

async fn regenerate(State(state): State<AppState>) -> Result<Json<StateResponse>, ApiError> {
    let mut controller = state.controller()?;
    controller.regenerate();
    Ok(Json(controller.state()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatmap_core::config::HeatmapConfig;

    fn app_state() -> AppState {
        let controller = HeatmapController::new(
            HeatmapConfig::default(),
            BirthProfile::default(),
            2024,
            ChaChaSource::seeded(3),
        )
        .unwrap();
        AppState::new(controller)
    }

    fn center_of(state: &AppState, row: usize, col: usize) -> (f64, f64) {
        state.controller().unwrap().layout().cell_rect(row, col).center()
    }

    #[tokio::test]
    async fn test_health() {
        let Json(h) = health(State(app_state())).await;
        assert_eq!(h.status, "ok");
    }

    #[tokio::test]
    async fn test_cell_hit_and_miss() {
        let state = app_state();
        let (x, y) = center_of(&state, 0, 0);
        let Json(info) = cell(State(state.clone()), Query(PointQuery { x, y }))
            .await
            .unwrap();
        assert_eq!(info.date, "2024-01-01");
        assert_eq!(info.weekday, "Monday");

        let err = cell(State(state), Query(PointQuery { x: 1.0, y: 1.0 }))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tooltip_defaults_viewport_to_canvas() {
        let state = app_state();
        let (x, y) = center_of(&state, 0, 0);
        let q = TooltipQuery {
            x,
            y,
            vw: None,
            vh: None,
        };
        let Json(t) = tooltip(State(state), Query(q)).await.unwrap();
        assert_eq!(t.placement.x, x + 15.0);
        assert_eq!(t.cell.date, "2024-01-01");
    }

    #[tokio::test]
    async fn test_set_year_rebuilds() {
        let state = app_state();
        let Json(s) = set_year(State(state.clone()), Json(YearRequest { year: 2023 }))
            .await
            .unwrap();
        assert_eq!(s.year, 2023);
        assert_eq!(s.occupied, 365);
        assert_eq!(s.generation, 2);
    }

    #[tokio::test]
    async fn test_invalid_birth_is_unprocessable() {
        let state = app_state();
        let raw = RawProfile {
            year: 1990,
            month: 2,
            day: 30,
        };
        let err = set_birth(State(state.clone()), Json(raw)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.message.contains("1990-02"));

        let Json(s) = current_state(State(state)).await.unwrap();
        assert_eq!(s.birth, BirthProfile::default());
        assert_eq!(s.generation, 1);
    }

    #[tokio::test]
    async fn test_valid_birth_rebuilds() {
        let state = app_state();
        let raw = RawProfile {
            year: 1985,
            month: 3,
            day: 7,
        };
        let Json(s) = set_birth(State(state), Json(raw)).await.unwrap();
        assert_eq!(s.birth, BirthProfile::new(1985, 3, 7).unwrap());
        assert_eq!(s.generation, 2);
    }

    #[tokio::test]
    async fn test_canvas_too_small() {
        let state = app_state();
        let req = CanvasRequest {
            width: 10.0,
            height: 10.0,
        };
        let err = set_canvas(State(state), Json(req)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_regenerate_and_heatmap() {
        let state = app_state();
        let Json(s) = regenerate(State(state.clone())).await.unwrap();
        assert_eq!(s.generation, 2);
        let Json(cmds) = heatmap(State(state)).await.unwrap();
        assert_eq!(cmds.fills().count(), 7 * 53);
    }
}
