//! Game Registry
//!
//! Server-side lifecycle of games: open against a commitment, settle by
//! replaying the submitted input log, expose status, sweep old entries.
//!
//! The registry is a concurrent map of per-game locks: map-level locks
//! are held only to look entries up, and each start/finish runs under
//! that entry's own lock, so games never serialise against each other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::game::state::InputRecord;
use crate::protocol::commitment::CommitmentPair;
use crate::protocol::replay::{replay, validate_input_log};
use crate::protocol::{derive_game_seed, now_ms, ProtocolError};

/// Smallest accepted ball count.
pub const MIN_NUM_BALLS: u32 = 1;
/// Largest accepted ball count.
pub const MAX_NUM_BALLS: u32 = 1000;

/// Default grace period finished entries are kept for diagnostics.
pub const DEFAULT_FINISHED_TTL: Duration = Duration::from_secs(300);

/// One registered game.
#[derive(Clone, Debug)]
pub struct GameEntry {
    /// Assigned 128-bit game id (hex).
    pub game_id: String,
    /// The player's seed.
    pub client_seed: String,
    /// Server seed snapshot taken at start; fixed for the game's life.
    pub server_seed: String,
    /// Commitment snapshot taken at start.
    pub commitment: String,
    /// Derived per-game RNG key.
    pub game_seed_hex: String,
    /// Ball count.
    pub num_balls: u32,
    /// Creation time (ms since epoch).
    pub created_at_ms: u64,
    /// Whether finish has run.
    pub finished: bool,
    /// Whether the replay matched the client's total.
    pub verified: bool,
    /// Stored settle result, returned on repeated finish calls.
    pub verdict: Option<Verdict>,
    /// When finish ran (ms since epoch).
    pub finished_at_ms: Option<u64>,
}

/// The recorded outcome of a finish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    /// Did the totals match?
    pub verified: bool,
    /// Total the server's replay computed.
    pub server_total_win: u64,
    /// Total the client claimed.
    pub client_total_win: u64,
}

/// Response data for a successful start.
#[derive(Clone, Debug)]
pub struct StartedGame {
    /// Assigned game id.
    pub game_id: String,
    /// Commitment the game is bound to.
    pub commitment: String,
    /// Derived game seed, safe to publish before play.
    pub game_seed_hex: String,
}

/// The reveal block returned to a verified player.
#[derive(Clone, Debug)]
pub struct Verification {
    /// The now-revealed server seed.
    pub server_seed: String,
    /// The game seed it derived.
    pub game_seed_hex: String,
    /// The player's seed.
    pub client_seed: String,
    /// The game id.
    pub game_id: String,
}

/// Result of a finish call (idempotent across repeats).
#[derive(Clone, Debug)]
pub struct FinishReport {
    /// Did the totals match?
    pub verified: bool,
    /// Total the server's replay computed.
    pub server_total_win: u64,
    /// Total the client claimed.
    pub client_total_win: u64,
    /// Reveal block, present only when verified.
    pub verification: Option<Verification>,
}

/// Status view of a game.
#[derive(Clone, Debug)]
pub struct GameStatus {
    /// Game id.
    pub game_id: String,
    /// Ball count.
    pub num_balls: u32,
    /// Whether finish has run.
    pub finished: bool,
    /// Whether the replay matched.
    pub verified: bool,
    /// Creation time (ms since epoch).
    pub created_at_ms: u64,
}

/// Concurrent map of games keyed by game id.
pub struct GameRegistry {
    games: RwLock<HashMap<String, Arc<RwLock<GameEntry>>>>,
}

impl GameRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
        }
    }

    /// Open a game bound to a commitment pair.
    ///
    /// The pair must already be resolved through the commitment slot, so
    /// expired commitments never reach this point. Returns the data the
    /// client needs to start playing.
    pub async fn start_game(
        &self,
        pair: &CommitmentPair,
        client_seed: &str,
        num_balls: u32,
    ) -> Result<StartedGame, ProtocolError> {
        if client_seed.is_empty() {
            return Err(ProtocolError::EmptyClientSeed);
        }
        if !(MIN_NUM_BALLS..=MAX_NUM_BALLS).contains(&num_balls) {
            return Err(ProtocolError::InvalidNumBalls);
        }

        let game_id = uuid::Uuid::new_v4().simple().to_string();
        let game_seed_hex = derive_game_seed(&pair.server_seed, client_seed, &game_id);

        let entry = GameEntry {
            game_id: game_id.clone(),
            client_seed: client_seed.to_string(),
            server_seed: pair.server_seed.clone(),
            commitment: pair.commitment.clone(),
            game_seed_hex: game_seed_hex.clone(),
            num_balls,
            created_at_ms: now_ms(),
            finished: false,
            verified: false,
            verdict: None,
            finished_at_ms: None,
        };

        let mut games = self.games.write().await;
        games.insert(game_id.clone(), Arc::new(RwLock::new(entry)));

        tracing::debug!(game_id = %game_id, num_balls, "game opened");

        Ok(StartedGame {
            game_id,
            commitment: pair.commitment.clone(),
            game_seed_hex,
        })
    }

    /// Settle a game by replaying the submitted input log.
    ///
    /// Idempotent: once a verdict is recorded, later calls return it
    /// without re-running the replay.
    pub async fn finish_game(
        &self,
        game_id: &str,
        input_log: Vec<InputRecord>,
        client_total_win: u64,
    ) -> Result<FinishReport, ProtocolError> {
        let entry = self
            .lookup(game_id)
            .await
            .ok_or(ProtocolError::GameNotFound)?;
        let mut entry = entry.write().await;

        if entry.finished {
            return Ok(Self::report_from(&entry));
        }

        validate_input_log(&input_log)?;

        // Replay is CPU-bound; keep it off the async workers
        let seed = entry.game_seed_hex.clone();
        let num_balls = entry.num_balls;
        let outcome = tokio::task::spawn_blocking(move || replay(&seed, num_balls, &input_log))
            .await
            .map_err(|e| ProtocolError::Internal(format!("replay worker failed: {e}")))?;

        let verified = outcome.total_win == client_total_win;
        entry.finished = true;
        entry.verified = verified;
        entry.finished_at_ms = Some(now_ms());
        entry.verdict = Some(Verdict {
            verified,
            server_total_win: outcome.total_win,
            client_total_win,
        });

        if verified {
            tracing::info!(game_id = %entry.game_id, total_win = outcome.total_win, "game verified");
        } else {
            tracing::warn!(
                game_id = %entry.game_id,
                server_total = outcome.total_win,
                client_total = client_total_win,
                "replay mismatch"
            );
        }

        Ok(Self::report_from(&entry))
    }

    /// Status view of a game.
    pub async fn status(&self, game_id: &str) -> Result<GameStatus, ProtocolError> {
        let entry = self
            .lookup(game_id)
            .await
            .ok_or(ProtocolError::GameNotFound)?;
        let entry = entry.read().await;
        Ok(GameStatus {
            game_id: entry.game_id.clone(),
            num_balls: entry.num_balls,
            finished: entry.finished,
            verified: entry.verified,
            created_at_ms: entry.created_at_ms,
        })
    }

    /// Drop finished entries older than `ttl`. Returns how many were swept.
    pub async fn sweep_finished(&self, ttl: Duration) -> usize {
        let cutoff = now_ms().saturating_sub(ttl.as_millis() as u64);
        let mut games = self.games.write().await;

        let mut swept = Vec::new();
        for (id, entry) in games.iter() {
            let entry = entry.read().await;
            if let Some(finished_at) = entry.finished_at_ms {
                if finished_at <= cutoff {
                    swept.push(id.clone());
                }
            }
        }
        for id in &swept {
            games.remove(id);
        }
        swept.len()
    }

    /// Counts of (open, finished) entries.
    pub async fn counts(&self) -> (usize, usize) {
        let games = self.games.read().await;
        let mut open = 0;
        let mut finished = 0;
        for entry in games.values() {
            if entry.read().await.finished {
                finished += 1;
            } else {
                open += 1;
            }
        }
        (open, finished)
    }

    async fn lookup(&self, game_id: &str) -> Option<Arc<RwLock<GameEntry>>> {
        let games = self.games.read().await;
        games.get(game_id).cloned()
    }

    fn report_from(entry: &GameEntry) -> FinishReport {
        let verdict = entry.verdict.expect("finished entry always carries a verdict");
        let verification = if verdict.verified {
            Some(Verification {
                server_seed: entry.server_seed.clone(),
                game_seed_hex: entry.game_seed_hex.clone(),
                client_seed: entry.client_seed.clone(),
                game_id: entry.game_id.clone(),
            })
        } else {
            None
        };
        FinishReport {
            verified: verdict.verified,
            server_total_win: verdict.server_total_win,
            client_total_win: verdict.client_total_win,
            verification,
        }
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
