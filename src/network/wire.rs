//! Wire Formats
//!
//! JSON request and response bodies for the HTTP boundary. Field names
//! are bit-significant: clients hash and compare several of these values,
//! so every struct here pins its serialized shape with `camelCase`
//! renames and is covered by shape tests.

use serde::{Deserialize, Serialize};

use crate::game::state::InputRecord;
use crate::protocol::registry::{FinishReport, GameStatus};

/// `GET /commitment` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentResponse {
    /// Published commitment hash (64 hex chars).
    pub commitment: String,
    /// When the commitment was published (ms since epoch).
    pub timestamp: u64,
    /// Milliseconds until the next rotation.
    pub expires_in: u64,
}

/// `POST /game/start` request body.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    /// Player-chosen seed; any non-empty string.
    pub client_seed: String,
    /// Balls to play, 1..=1000. Deserialized wide so range errors are
    /// reported by the protocol, not the JSON layer.
    pub num_balls: i64,
    /// Commitment the client recorded before starting, if any.
    #[serde(default)]
    pub recorded_commitment: Option<String>,
}

/// `POST /game/start` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameResponse {
    /// Assigned game id.
    pub game_id: String,
    /// Commitment the game is bound to.
    pub commitment: String,
    /// Derived game seed; safe to publish before play.
    pub game_seed_hex: String,
}

/// `POST /game/{id}/finish` request body.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishGameRequest {
    /// The client's recorded input log.
    pub input_log: Vec<InputRecord>,
    /// The client's computed total.
    pub client_total_win: u64,
}

/// Reveal block inside a verified finish response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationBody {
    /// The revealed server seed.
    pub server_seed: String,
    /// The game seed it derived.
    pub game_seed_hex: String,
    /// The player's seed.
    pub client_seed: String,
    /// The game id.
    pub game_id: String,
}

/// `POST /game/{id}/finish` response on a verified match.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishVerifiedResponse {
    /// Always true in this shape.
    pub verified: bool,
    /// The agreed total.
    pub total_win: u64,
    /// Everything the client needs to audit offline.
    pub verification: VerificationBody,
}

/// `POST /game/{id}/finish` response on a mismatch.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishMismatchResponse {
    /// Always false in this shape.
    pub verified: bool,
    /// Total the server's replay computed.
    pub server_total_win: u64,
    /// Total the client claimed.
    pub client_total_win: u64,
    /// Human-readable summary of the mismatch.
    pub error: String,
}

/// `GET /game/{id}/status` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Game id.
    pub game_id: String,
    /// Ball count.
    pub num_balls: u32,
    /// Whether finish has run.
    pub finished: bool,
    /// Whether the replay matched.
    pub verified: bool,
    /// Creation time (ms since epoch).
    pub created_at: u64,
}

/// Error body for 4xx responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// What went wrong.
    pub error: String,
}

/// `GET /health` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Liveness flag, always "healthy" when reachable.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Games currently open.
    pub open_games: usize,
    /// Finished games retained in the grace window.
    pub finished_games: usize,
}

/// `GET /version` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    /// Service name.
    pub service: String,
    /// Crate version.
    pub version: String,
    /// Protocol tag clients can pin.
    pub protocol: String,
}

impl From<GameStatus> for StatusResponse {
    fn from(status: GameStatus) -> Self {
        Self {
            game_id: status.game_id,
            num_balls: status.num_balls,
            finished: status.finished,
            verified: status.verified,
            created_at: status.created_at_ms,
        }
    }
}

/// Split a finish report into its wire shape.
pub fn finish_response(report: FinishReport) -> Result<FinishVerifiedResponse, FinishMismatchResponse> {
    match report.verification {
        Some(reveal) if report.verified => Ok(FinishVerifiedResponse {
            verified: true,
            total_win: report.server_total_win,
            verification: VerificationBody {
                server_seed: reveal.server_seed,
                game_seed_hex: reveal.game_seed_hex,
                client_seed: reveal.client_seed,
                game_id: reveal.game_id,
            },
        }),
        _ => Err(FinishMismatchResponse {
            verified: false,
            server_total_win: report.server_total_win,
            client_total_win: report.client_total_win,
            error: format!(
                "Total win mismatch: server computed {}, client claimed {}",
                report.server_total_win, report.client_total_win
            ),
        }),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_response_field_names() {
        let body = CommitmentResponse {
            commitment: "ab".repeat(32),
            timestamp: 1_700_000_000_000,
            expires_in: 3_600_000,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"commitment\""));
        assert!(json.contains("\"timestamp\""));
        assert!(json.contains("\"expiresIn\""));
    }

    #[test]
    fn test_start_request_accepts_optional_commitment() {
        let json = r#"{"clientSeed":"abc","numBalls":5}"#;
        let req: StartGameRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.client_seed, "abc");
        assert_eq!(req.num_balls, 5);
        assert!(req.recorded_commitment.is_none());

        let json = r#"{"clientSeed":"abc","numBalls":5,"recordedCommitment":"aabb"}"#;
        let req: StartGameRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.recorded_commitment.as_deref(), Some("aabb"));
    }

    #[test]
    fn test_finish_request_shape() {
        let json = r#"{"inputLog":[{"tick":1,"target":{"x":4.5,"y":2.0}}],"clientTotalWin":42}"#;
        let req: FinishGameRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.input_log.len(), 1);
        assert_eq!(req.input_log[0].tick, 1);
        assert_eq!(req.client_total_win, 42);
    }

    #[test]
    fn test_verified_response_field_names() {
        let body = FinishVerifiedResponse {
            verified: true,
            total_win: 99,
            verification: VerificationBody {
                server_seed: "s".into(),
                game_seed_hex: "g".into(),
                client_seed: "c".into(),
                game_id: "i".into(),
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        for field in [
            "\"verified\"",
            "\"totalWin\"",
            "\"verification\"",
            "\"serverSeed\"",
            "\"gameSeedHex\"",
            "\"clientSeed\"",
            "\"gameId\"",
        ] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
    }

    #[test]
    fn test_mismatch_response_field_names() {
        let body = FinishMismatchResponse {
            verified: false,
            server_total_win: 10,
            client_total_win: 20,
            error: "Total win mismatch".into(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"serverTotalWin\":10"));
        assert!(json.contains("\"clientTotalWin\":20"));
        assert!(json.contains("\"verified\":false"));
    }

    #[test]
    fn test_status_response_created_at_name() {
        let body = StatusResponse {
            game_id: "x".into(),
            num_balls: 3,
            finished: false,
            verified: false,
            created_at: 123,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"createdAt\":123"));
        assert!(json.contains("\"numBalls\":3"));
    }
}
