//! HTTP Server
//!
//! The JSON boundary over the protocol layer. This layer is
//! **non-deterministic** plumbing only: every game-semantic decision
//! lives in `protocol/` and `game/`.
//!
//! Audit failures (`verified: false`) are business outcomes and return
//! 200; only boundary rejections use 4xx.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpResponse};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::network::wire::{
    finish_response, CommitmentResponse, ErrorResponse, FinishGameRequest, HealthResponse,
    StartGameRequest, StartGameResponse, StatusResponse, VersionResponse,
};
use crate::protocol::commitment::CommitmentSlot;
use crate::protocol::registry::GameRegistry;
use crate::protocol::ProtocolError;
use crate::{PROTOCOL, VERSION};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The commitment slot, serialised behind one lock; every access is
    /// a read-and-clone.
    pub commitments: Arc<RwLock<CommitmentSlot>>,
    /// The game registry.
    pub registry: Arc<GameRegistry>,
}

impl AppState {
    /// Build state with a fresh commitment and empty registry.
    pub fn new(rotation_interval: Duration) -> Self {
        Self {
            commitments: Arc::new(RwLock::new(CommitmentSlot::new(rotation_interval))),
            registry: Arc::new(GameRegistry::new()),
        }
    }
}

fn protocol_error_response(err: &ProtocolError) -> HttpResponse {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    match err {
        ProtocolError::GameNotFound => HttpResponse::NotFound().json(body),
        ProtocolError::Internal(_) => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// `GET /commitment`
async fn get_commitment(state: web::Data<AppState>) -> HttpResponse {
    let info = state.commitments.read().await.info();
    HttpResponse::Ok().json(CommitmentResponse {
        commitment: info.commitment,
        timestamp: info.timestamp,
        expires_in: info.expires_in,
    })
}

/// `POST /game/start`
async fn start_game(state: web::Data<AppState>, req: web::Json<StartGameRequest>) -> HttpResponse {
    let req = req.into_inner();

    let num_balls = match u32::try_from(req.num_balls) {
        Ok(n) => n,
        Err(_) => return protocol_error_response(&ProtocolError::InvalidNumBalls),
    };

    // Snapshot the pair under a short read lock
    let pair = {
        let slot = state.commitments.read().await;
        match slot.pair_for(req.recorded_commitment.as_deref()) {
            Ok(pair) => pair.clone(),
            Err(err) => return protocol_error_response(&err),
        }
    };

    match state
        .registry
        .start_game(&pair, &req.client_seed, num_balls)
        .await
    {
        Ok(started) => HttpResponse::Ok().json(StartGameResponse {
            game_id: started.game_id,
            commitment: started.commitment,
            game_seed_hex: started.game_seed_hex,
        }),
        Err(err) => protocol_error_response(&err),
    }
}

/// `POST /game/{id}/finish`
async fn finish_game(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<FinishGameRequest>,
) -> HttpResponse {
    let game_id = path.into_inner();
    let req = req.into_inner();

    let report = match state
        .registry
        .finish_game(&game_id, req.input_log, req.client_total_win)
        .await
    {
        Ok(report) => report,
        Err(err) => return protocol_error_response(&err),
    };

    match finish_response(report) {
        Ok(verified) => HttpResponse::Ok().json(verified),
        Err(mismatch) => HttpResponse::Ok().json(mismatch),
    }
}

/// `GET /game/{id}/status`
async fn game_status(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match state.registry.status(&path.into_inner()).await {
        Ok(status) => HttpResponse::Ok().json(StatusResponse::from(status)),
        Err(err) => protocol_error_response(&err),
    }
}

/// `GET /health`
async fn health(state: web::Data<AppState>) -> HttpResponse {
    let (open_games, finished_games) = state.registry.counts().await;
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".into(),
        service: "paddla-server".into(),
        open_games,
        finished_games,
    })
}

/// `GET /version`
async fn version() -> HttpResponse {
    HttpResponse::Ok().json(VersionResponse {
        service: "paddla-server".into(),
        version: VERSION.into(),
        protocol: PROTOCOL.into(),
    })
}

/// Register all routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/commitment", web::get().to(get_commitment))
        .route("/game/start", web::post().to(start_game))
        .route("/game/{id}/finish", web::post().to(finish_game))
        .route("/game/{id}/status", web::get().to(game_status))
        .route("/health", web::get().to(health))
        .route("/version", web::get().to(version));
}

/// Rotate the commitment on a fixed interval, forever.
pub fn spawn_rotation_task(state: AppState) {
    tokio::spawn(async move {
        let interval = state.commitments.read().await.rotation_interval();
        loop {
            tokio::time::sleep(interval).await;
            let mut slot = state.commitments.write().await;
            slot.rotate();
            info!(commitment = %slot.current().commitment, "commitment rotated");
        }
    });
}

/// Sweep finished games past their grace TTL on a fixed interval, forever.
pub fn spawn_sweeper_task(state: AppState, ttl: Duration, every: Duration) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(every).await;
            let swept = state.registry.sweep_finished(ttl).await;
            if swept > 0 {
                debug!(swept, "swept finished games");
            }
        }
    });
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Target;
    use crate::game::tick::play;
    use crate::network::wire::{FinishVerifiedResponse, StartGameResponse};
    use crate::protocol::commitment::DEFAULT_ROTATION_INTERVAL;
    use actix_web::{test as awtest, App};
    use serde_json::{json, Value};

    fn test_state() -> AppState {
        AppState::new(DEFAULT_ROTATION_INTERVAL)
    }

    macro_rules! test_app {
        ($state:expr) => {
            awtest::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_and_version() {
        let state = test_state();
        let app = test_app!(state);

        let resp = awtest::call_service(&app, awtest::TestRequest::get().uri("/health").to_request()).await;
        assert!(resp.status().is_success());
        let body: Value = awtest::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["openGames"], 0);

        let resp = awtest::call_service(&app, awtest::TestRequest::get().uri("/version").to_request()).await;
        let body: Value = awtest::read_body_json(resp).await;
        assert_eq!(body["protocol"], PROTOCOL);
    }

    #[actix_web::test]
    async fn test_commitment_endpoint_shape() {
        let state = test_state();
        let app = test_app!(state);

        let resp =
            awtest::call_service(&app, awtest::TestRequest::get().uri("/commitment").to_request())
                .await;
        assert!(resp.status().is_success());
        let body: Value = awtest::read_body_json(resp).await;

        let commitment = body["commitment"].as_str().unwrap();
        assert_eq!(commitment.len(), 64);
        assert!(commitment.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(body["expiresIn"].as_u64().unwrap() <= 3_600_000);
        assert!(body["timestamp"].as_u64().unwrap() > 0);
    }

    #[actix_web::test]
    async fn test_start_rejects_bad_parameters() {
        let state = test_state();
        let app = test_app!(state);

        // Empty clientSeed
        let req = awtest::TestRequest::post()
            .uri("/game/start")
            .set_json(json!({"clientSeed": "", "numBalls": 5}))
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = awtest::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid parameters"));

        // Out-of-range numBalls
        for bad in [0i64, 1001, -3] {
            let req = awtest::TestRequest::post()
                .uri("/game/start")
                .set_json(json!({"clientSeed": "s", "numBalls": bad}))
                .to_request();
            let resp = awtest::call_service(&app, req).await;
            assert_eq!(resp.status(), 400, "numBalls={bad} must be rejected");
        }

        // Unknown recorded commitment
        let req = awtest::TestRequest::post()
            .uri("/game/start")
            .set_json(json!({
                "clientSeed": "s",
                "numBalls": 5,
                "recordedCommitment": "00".repeat(32),
            }))
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = awtest::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid commitment"));
    }

    #[actix_web::test]
    async fn test_full_flow_over_http() {
        let state = test_state();
        let app = test_app!(state);

        // Record the commitment first, like a careful client
        let resp =
            awtest::call_service(&app, awtest::TestRequest::get().uri("/commitment").to_request())
                .await;
        let commitment: Value = awtest::read_body_json(resp).await;

        // Open a game against it
        let req = awtest::TestRequest::post()
            .uri("/game/start")
            .set_json(json!({
                "clientSeed": "dice-are-fair",
                "numBalls": 2,
                "recordedCommitment": commitment["commitment"],
            }))
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let started: StartGameResponse = awtest::read_body_json(resp).await;
        assert_eq!(started.game_seed_hex.len(), 64);
        assert_eq!(started.commitment, commitment["commitment"].as_str().unwrap());

        // Play locally
        let outcome = play(&started.game_seed_hex, 2, |_| Some(Target { x: 5.0, y: 3.0 }));

        // Status before finish
        let req = awtest::TestRequest::get()
            .uri(&format!("/game/{}/status", started.game_id))
            .to_request();
        let status: Value = awtest::read_body_json(awtest::call_service(&app, req).await).await;
        assert_eq!(status["finished"], false);

        // Submit the log
        let req = awtest::TestRequest::post()
            .uri(&format!("/game/{}/finish", started.game_id))
            .set_json(json!({
                "inputLog": outcome.input_log,
                "clientTotalWin": outcome.total_win,
            }))
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let finished: FinishVerifiedResponse = awtest::read_body_json(resp).await;
        assert!(finished.verified);
        assert_eq!(finished.total_win, outcome.total_win);
        assert_eq!(finished.verification.game_id, started.game_id);

        // The revealed seed hashes to the recorded commitment
        assert_eq!(
            crate::core::crypto::sha256_hex(&finished.verification.server_seed),
            started.commitment
        );
    }

    #[actix_web::test]
    async fn test_mismatch_is_a_business_outcome_not_an_error() {
        let state = test_state();
        let app = test_app!(state);

        let req = awtest::TestRequest::post()
            .uri("/game/start")
            .set_json(json!({"clientSeed": "s", "numBalls": 1}))
            .to_request();
        let started: StartGameResponse =
            awtest::read_body_json(awtest::call_service(&app, req).await).await;

        let outcome = play(&started.game_seed_hex, 1, |_| None);

        let req = awtest::TestRequest::post()
            .uri(&format!("/game/{}/finish", started.game_id))
            .set_json(json!({
                "inputLog": outcome.input_log,
                "clientTotalWin": outcome.total_win + 7,
            }))
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        // 200, not 4xx: the request was well-formed, the claim was wrong
        assert!(resp.status().is_success());
        let body: Value = awtest::read_body_json(resp).await;
        assert_eq!(body["verified"], false);
        assert_eq!(body["clientTotalWin"].as_u64().unwrap(), outcome.total_win + 7);
        assert_eq!(body["serverTotalWin"].as_u64().unwrap(), outcome.total_win);
    }

    #[actix_web::test]
    async fn test_finish_unknown_game_is_404() {
        let state = test_state();
        let app = test_app!(state);

        let req = awtest::TestRequest::post()
            .uri("/game/deadbeef/finish")
            .set_json(json!({"inputLog": [], "clientTotalWin": 0}))
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
