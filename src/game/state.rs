//! Game State Definitions
//!
//! All state types for one PADDLA game. Balls live in a `Vec` in spawn
//! order; every phase of the tick iterates that order, which is part of
//! the engine contract.

use serde::{Deserialize, Serialize};

use crate::core::rng::GameRng;
use crate::game::config::{
    BUMPER_START_X, BUMPER_START_Y,
};

// =============================================================================
// BALLS
// =============================================================================

/// Ball kind, fixed at spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallKind {
    /// Decays over time, can recharge at the center.
    Normal,
    /// Never decays; pays triple and clears the timeout streak on goal.
    Golden,
    /// Never decays; detonates on goal, collecting the upper half.
    Explosive,
}

impl BallKind {
    /// Win multiplier carried by this kind.
    #[inline]
    pub fn multiplier(self) -> u32 {
        match self {
            BallKind::Golden => crate::game::config::GOLDEN_MULTIPLIER,
            BallKind::Normal | BallKind::Explosive => 1,
        }
    }

    /// Whether this kind participates in value decay and recharge.
    #[inline]
    pub fn is_normal(self) -> bool {
        matches!(self, BallKind::Normal)
    }
}

/// One projectile on the field.
///
/// Created by the spawn phase, mutated only by the engine, removed by the
/// compact phase once `alive` is false.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ball {
    /// Stable id, unique within a game.
    pub id: u32,

    /// Position (fixed-precision decimal).
    pub x: f64,
    /// Position (fixed-precision decimal).
    pub y: f64,

    /// Velocity (fixed-precision decimal).
    pub dx: f64,
    /// Velocity (fixed-precision decimal).
    pub dy: f64,

    /// Current value, 0..=9. Scored as `value * multiplier * progressive`.
    pub value: u32,

    /// Ticks since the last decay or recharge.
    pub ticks_since_countdown: u32,

    /// Ball kind.
    pub kind: BallKind,

    /// Win multiplier (1, or 3 for golden).
    pub multiplier: u32,

    /// False once the ball has scored, lost a collision or timed out.
    pub alive: bool,

    /// Transient flag: died by decay this tick. Consumed by the timeout
    /// tally phase in the same tick that observes it.
    #[serde(skip)]
    pub died_from_timeout: bool,
}

impl Ball {
    /// Prize this ball pays at the given progressive multiplier.
    #[inline]
    pub fn prize(&self, progressive: u32) -> u32 {
        self.value * self.multiplier * progressive
    }
}

// =============================================================================
// BUMPER
// =============================================================================

/// The single player-controlled paddle.
///
/// Invariant: after every tick both the position and the target lie
/// inside the bumper bounding box.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bumper {
    /// Current position.
    pub x: f64,
    /// Current position.
    pub y: f64,
    /// Target the bumper steps toward, clamped to the bounding box.
    pub target_x: f64,
    /// Target the bumper steps toward, clamped to the bounding box.
    pub target_y: f64,
}

impl Bumper {
    /// Bumper at the start position with no pending movement.
    pub fn at_start() -> Self {
        Self {
            x: BUMPER_START_X,
            y: BUMPER_START_Y,
            target_x: BUMPER_START_X,
            target_y: BUMPER_START_Y,
        }
    }
}

impl Default for Bumper {
    fn default() -> Self {
        Self::at_start()
    }
}

// =============================================================================
// INPUT LOG
// =============================================================================

/// A bumper target point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Target x.
    pub x: f64,
    /// Target y.
    pub y: f64,
}

/// One input log entry: the bumper target in effect at a tick.
///
/// The engine appends one record per tick, so `inputLog.length` always
/// equals `tickCount`. Wire field names are bit-significant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Tick the target applied to (1-based).
    pub tick: u32,
    /// The clamped target in effect for that tick.
    pub target: Target,
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Input-seeded RNG bound to this game's seed.
    pub rng: GameRng,

    /// Ticks simulated so far.
    pub tick_count: u32,

    /// Balls spawned so far.
    pub balls_spawned: u32,

    /// Total balls this game will spawn.
    pub num_balls: u32,

    /// Ticks remaining before another spawn is allowed.
    pub spawn_cooldown: u32,

    /// Progressive win multiplier, 1..=PROGRESSIVE_CAP.
    pub progressive: u32,

    /// Consecutive-timeout streak counter.
    pub timeout_count: u32,

    /// Accumulated winnings in integer win units.
    pub total_win: u64,

    /// One record per tick: the target in effect.
    pub input_log: Vec<InputRecord>,

    /// Set once all balls have spawned and left the field.
    pub finished: bool,

    /// Next ball id (monotonic counter).
    pub next_ball_id: u32,

    /// Live balls in spawn order.
    pub balls: Vec<Ball>,

    /// The paddle.
    pub bumper: Bumper,
}

impl GameState {
    /// Create the initial state for a game seed and ball count.
    pub fn new(game_seed_hex: &str, num_balls: u32) -> Self {
        Self {
            rng: GameRng::new(game_seed_hex),
            tick_count: 0,
            balls_spawned: 0,
            num_balls,
            spawn_cooldown: 0,
            progressive: 1,
            timeout_count: 0,
            total_win: 0,
            input_log: Vec::new(),
            finished: false,
            next_ball_id: 0,
            balls: Vec::new(),
            bumper: Bumper::at_start(),
        }
    }

    /// Number of balls currently on the field.
    pub fn balls_on_field(&self) -> usize {
        self.balls.len()
    }

    /// Whether any normal ball remains on the field.
    pub fn has_normal_ball(&self) -> bool {
        self.balls.iter().any(|b| b.kind.is_normal())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::{BUMPER_START_X, BUMPER_START_Y, PROGRESSIVE_CAP};

    const SEED: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    #[test]
    fn test_initial_state() {
        let state = GameState::new(SEED, 5);
        assert_eq!(state.tick_count, 0);
        assert_eq!(state.balls_spawned, 0);
        assert_eq!(state.num_balls, 5);
        assert_eq!(state.progressive, 1);
        assert_eq!(state.timeout_count, 0);
        assert_eq!(state.total_win, 0);
        assert!(state.input_log.is_empty());
        assert!(!state.finished);
        assert!(state.balls.is_empty());
        assert_eq!(state.bumper.x, BUMPER_START_X);
        assert_eq!(state.bumper.y, BUMPER_START_Y);
        assert!(state.progressive <= PROGRESSIVE_CAP);
    }

    #[test]
    fn test_ball_kind_multipliers() {
        assert_eq!(BallKind::Normal.multiplier(), 1);
        assert_eq!(BallKind::Explosive.multiplier(), 1);
        assert_eq!(BallKind::Golden.multiplier(), 3);
    }

    #[test]
    fn test_ball_prize() {
        let ball = Ball {
            id: 0,
            x: 4.5,
            y: 4.5,
            dx: 0.0,
            dy: 0.0,
            value: 9,
            ticks_since_countdown: 0,
            kind: BallKind::Golden,
            multiplier: BallKind::Golden.multiplier(),
            alive: true,
            died_from_timeout: false,
        };
        assert_eq!(ball.prize(1), 27);
        assert_eq!(ball.prize(5), 135);
    }

    #[test]
    fn test_ball_kind_wire_names() {
        assert_eq!(serde_json::to_string(&BallKind::Normal).unwrap(), "\"normal\"");
        assert_eq!(serde_json::to_string(&BallKind::Golden).unwrap(), "\"golden\"");
        assert_eq!(serde_json::to_string(&BallKind::Explosive).unwrap(), "\"explosive\"");
    }

    #[test]
    fn test_input_record_wire_shape() {
        let record = InputRecord {
            tick: 3,
            target: Target { x: 4.5, y: 2.0 },
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"tick":3,"target":{"x":4.5,"y":2.0}}"#);

        let back: InputRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
