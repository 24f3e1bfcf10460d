use super::card::{Card, Color};
use super::error::{ErrorCategory, GameError};
use super::game::{Game, GameView};
use super::registry::RoomRegistry;
use crate::config::ServerConfig;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;
use thiserror::Error;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

#[derive(Clone)]
pub struct AppState {
    pub registry: RoomRegistry,
    pub default_max_players: usize,
    pub max_players_limit: usize,
}

impl AppState {
    pub fn new(registry: RoomRegistry, config: &ServerConfig) -> Self {
        Self {
            registry,
            default_max_players: config.default_max_players,
            max_players_limit: config.max_players_limit,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateGameRequest {
    name: String,
    #[serde(default)]
    max_players: Option<usize>,
    username: String,
}

#[derive(Deserialize)]
pub struct PlayerRequest {
    username: String,
}

#[derive(Deserialize)]
pub struct PlayCardRequest {
    username: String,
    card: Card,
    #[serde(default)]
    color: Option<Color>,
}

#[derive(Deserialize)]
pub struct AccuseRequest {
    username: String,
    accused: String,
}

#[derive(Deserialize)]
pub struct ViewerQuery {
    viewer: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct PlayResponse {
    round_winner: Option<String>,
    game: GameView,
}

#[derive(Serialize, Deserialize)]
pub struct AccuseResponse {
    penalised: bool,
    game: GameView,
}

/// Failures reported to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Game not found")]
    GameNotFound,

    #[error("Player {0} is not seated in this game")]
    NotSeated(String),

    #[error("Not your turn")]
    NotYourTurn,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Game(#[from] GameError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::GameNotFound => StatusCode::NOT_FOUND,
            ApiError::NotSeated(_) => StatusCode::FORBIDDEN,
            ApiError::NotYourTurn => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Game(e) => match e.category() {
                ErrorCategory::Validation => StatusCode::BAD_REQUEST,
                ErrorCategory::State => StatusCode::CONFLICT,
            },
        };
        info!("Request rejected ({}): {}", status, self);
        (status, self.to_string()).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn seat_of(game: &Game, username: &str) -> ApiResult<usize> {
    game.seat_of(username)
        .ok_or_else(|| ApiError::NotSeated(username.to_string()))
}

fn current_seat_of(game: &Game, username: &str) -> ApiResult<usize> {
    let seat = seat_of(game, username)?;
    if seat != game.current_player {
        return Err(ApiError::NotYourTurn);
    }
    Ok(seat)
}

pub async fn create_game(
    State(state): State<AppState>,
    Json(req): Json<CreateGameRequest>,
) -> ApiResult<impl IntoResponse> {
    let max_players = req.max_players.unwrap_or(state.default_max_players);
    if !(2..=state.max_players_limit).contains(&max_players) {
        return Err(ApiError::BadRequest(format!(
            "Rooms hold between 2 and {} players",
            state.max_players_limit
        )));
    }

    info!(
        "Creating game {} for {} with {} seats",
        req.name, req.username, max_players
    );
    let game = Game::new(req.name, max_players, [req.username.clone()]).map_err(|e| {
        error!("Failed to create game: {}", e);
        e
    })?;
    let view = game.redact_for_viewer(&[&req.username]);
    state.registry.insert(game).await;

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list_games(State(state): State<AppState>) -> Json<Vec<GameView>> {
    let games = state.registry.list_public().await;
    info!("Listing {} games", games.len());
    Json(games)
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> ApiResult<Json<GameView>> {
    state
        .registry
        .with_room(&id, |game| -> ApiResult<GameView> {
            match &query.viewer {
                Some(viewer) => {
                    seat_of(game, viewer)?;
                    Ok(game.redact_for_viewer(&[viewer]))
                }
                None => Ok(game.public_view()),
            }
        })
        .await
        .ok_or(ApiError::GameNotFound)?
        .map(Json)
}

pub async fn join_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PlayerRequest>,
) -> ApiResult<Json<GameView>> {
    info!("Player {} joining game {}", req.username, id);
    state
        .registry
        .with_room(&id, |game| -> ApiResult<GameView> {
            game.add_player(req.username.clone())?;
            Ok(game.redact_for_viewer(&[&req.username]))
        })
        .await
        .ok_or(ApiError::GameNotFound)?
        .map(Json)
}

/// Draws one card for the current player and passes the turn.
pub async fn draw_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PlayerRequest>,
) -> ApiResult<Json<GameView>> {
    info!("Player {} drawing in game {}", req.username, id);
    state
        .registry
        .with_room(&id, |game| -> ApiResult<GameView> {
            let seat = current_seat_of(game, &req.username)?;
            game.draw_card(seat)?;
            game.skip_turn();
            Ok(game.redact_for_viewer(&[&req.username]))
        })
        .await
        .ok_or(ApiError::GameNotFound)?
        .map(Json)
}

/// Plays a card for the current player. Emptying the hand ends the round and
/// deals the next one.
pub async fn play_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PlayCardRequest>,
) -> ApiResult<Json<PlayResponse>> {
    info!(
        "Player {} playing card {} in game {}",
        req.username, req.card.id, id
    );
    state
        .registry
        .with_room(&id, |game| -> ApiResult<PlayResponse> {
            let seat = current_seat_of(game, &req.username)?;
            game.play_card(&req.card, req.color)?;

            let round_winner = if game.players[seat].has_won() {
                info!("Player {} won the round in game {}", req.username, id);
                game.new_round();
                game.deal();
                Some(req.username.clone())
            } else {
                None
            };

            Ok(PlayResponse {
                round_winner,
                game: game.redact_for_viewer(&[&req.username]),
            })
        })
        .await
        .ok_or(ApiError::GameNotFound)?
        .map(Json)
}

pub async fn accuse_uno(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AccuseRequest>,
) -> ApiResult<Json<AccuseResponse>> {
    info!(
        "Player {} accusing {} in game {}",
        req.username, req.accused, id
    );
    state
        .registry
        .with_room(&id, |game| -> ApiResult<AccuseResponse> {
            seat_of(game, &req.username)?;
            let accused = seat_of(game, &req.accused)?;
            let penalised = game.accuse_uno(accused)?;
            Ok(AccuseResponse {
                penalised,
                game: game.redact_for_viewer(&[&req.username]),
            })
        })
        .await
        .ok_or(ApiError::GameNotFound)?
        .map(Json)
}

pub async fn call_uno(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PlayerRequest>,
) -> ApiResult<Json<GameView>> {
    info!("Player {} calling uno in game {}", req.username, id);
    state
        .registry
        .with_room(&id, |game| -> ApiResult<GameView> {
            let seat = seat_of(game, &req.username)?;
            game.call_uno(seat)?;
            Ok(game.redact_for_viewer(&[&req.username]))
        })
        .await
        .ok_or(ApiError::GameNotFound)?
        .map(Json)
}

pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    info!("Deleting game with ID: {}", id);
    if state.registry.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::GameNotFound)
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().include_headers(true))
        .on_response(DefaultOnResponse::new().include_headers(true));

    Router::new()
        .route("/games", post(create_game).get(list_games))
        .route("/games/{id}", get(get_game).delete(delete_game))
        .route("/games/{id}/join", post(join_game))
        .route("/games/{id}/draw", post(draw_card))
        .route("/games/{id}/play", post(play_card))
        .route("/games/{id}/accuse", post(accuse_uno))
        .route("/games/{id}/uno", post(call_uno))
        .layer(cors)
        .layer(trace_layer)
        .with_state(state)
}

pub async fn start_api_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Uno API server...");

    let registry = RoomRegistry::new();
    let state = AppState::new(registry.clone(), &config);

    let idle_timeout = config.idle_timeout;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(StdDuration::from_secs(60));
        loop {
            ticker.tick().await;
            registry.evict_idle(idle_timeout).await;
        }
    });

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("API server running on http://{}", config.bind);
    axum::serve(listener, router(state)).await?;

    Ok(())
}
