//! HTTP route definitions

use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::app::AppState;
use crate::party::{BattleEnemy, PartyError, PlayerId};
use crate::util::time::uptime_secs;

use super::protocol::{
    AttackSequenceBody, BattleEnemyRequest, BattleResultResponse, EnemiesResponse, ExistResponse,
    IsActiveRequest, JoinRequest, PlayerView, PositionRequest, PositionResponse,
};

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let party_routes = Router::new()
        .route("/join", post(join_handler))
        .route("/:player_id", delete(leave_handler))
        .route("/:player_id/position", post(position_handler))
        .route("/:player_id/enemiesData", get(enemies_handler))
        .route("/:player_id/battleEnemy", post(battle_enemy_handler))
        .route(
            "/:player_id/attackSequence",
            get(get_attack_sequence_handler).post(set_attack_sequence_handler),
        )
        .route("/:player_id/isActive", put(is_active_handler))
        .route("/:player_id/addVictory", put(add_victory_handler))
        .route("/:player_id/exist", get(exist_handler))
        .route("/:player_id/battleResult", get(battle_result_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/mokepon", party_routes)
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(state.config.client_origin.as_deref()))
        .with_state(state)
}

/// CORS for the configured origins (comma-separated), or any origin
fn cors_layer(client_origin: Option<&str>) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    match client_origin {
        Some(origins) => {
            let allowed_origins: Vec<header::HeaderValue> = origins
                .split(',')
                .filter_map(|s| s.trim().parse::<header::HeaderValue>().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods(methods)
                .allow_headers([header::CONTENT_TYPE])
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE]),
    }
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    players: usize,
    paired_players: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (players, paired_players) = state.party.counts().await;

    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        players,
        paired_players,
    })
}

// ============================================================================
// Party endpoints
// ============================================================================

async fn join_handler(
    State(state): State<AppState>,
    Json(req): Json<JoinRequest>,
) -> Result<String, AppError> {
    let position = req.position.unwrap_or_default();
    let id = state.party.join(&req.mokepon, position).await?;

    Ok(id.to_string())
}

async fn position_handler(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
    Json(req): Json<PositionRequest>,
) -> Json<PositionResponse> {
    let position = req.position.unwrap_or_default();

    let collided_enemy = state
        .party
        .report_position(&player_id, position, req.size)
        .await
        .map(PlayerView::from);

    Json(PositionResponse { collided_enemy })
}

async fn enemies_handler(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Json<EnemiesResponse> {
    let enemies = state.party.enemies(&player_id).await;

    Json(EnemiesResponse {
        enemies_data: enemies.into_iter().map(PlayerView::from).collect(),
    })
}

async fn battle_enemy_handler(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
    Json(req): Json<BattleEnemyRequest>,
) -> StatusCode {
    let value = req.battle_enemy.unwrap_or(BattleEnemy::Open);
    state.party.set_battle_enemy(&player_id, value).await;

    StatusCode::OK
}

async fn get_attack_sequence_handler(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Json<AttackSequenceBody> {
    let attack_sequence = state.party.attack_sequence(&player_id).await;

    Json(AttackSequenceBody { attack_sequence })
}

async fn set_attack_sequence_handler(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
    Json(req): Json<AttackSequenceBody>,
) -> StatusCode {
    state
        .party
        .set_attack_sequence(&player_id, req.attack_sequence)
        .await;

    StatusCode::OK
}

async fn is_active_handler(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
    Json(req): Json<IsActiveRequest>,
) -> StatusCode {
    if let Some(is_active) = req.is_active {
        state.party.set_active(&player_id, is_active).await;
    }

    StatusCode::OK
}

async fn add_victory_handler(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> StatusCode {
    state.party.add_victory(&player_id).await;
    StatusCode::OK
}

async fn leave_handler(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> StatusCode {
    state.party.leave(&player_id).await;
    StatusCode::OK
}

async fn exist_handler(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Json<ExistResponse> {
    let player_exist = state.party.exists(&player_id).await;
    Json(ExistResponse { player_exist })
}

async fn battle_result_handler(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Json<BattleResultResponse> {
    let report = state.party.battle_report(&player_id).await;

    Json(BattleResultResponse {
        ready: report.is_some(),
        report,
    })
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<PartyError> for AppError {
    fn from(err: PartyError) -> Self {
        match err {
            PartyError::EmptyPetName => AppError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
