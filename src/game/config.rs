//! Physics Constants
//!
//! The entire simulation is defined by these values. They are part of the
//! protocol: client and server must agree on every one of them, so none
//! are runtime-configurable.

/// Field edge length. The playfield is the square `[0, FIELD] x [0, FIELD]`.
pub const FIELD: f64 = 9.0;

/// Ball radius.
pub const BALL_R: f64 = 0.2;

/// Base ball speed (units per tick).
pub const SPEED: f64 = 0.05;

/// Goal capture radius around the corners `(0,0)` and `(FIELD,0)`.
pub const GOAL_R: f64 = 1.02;

/// Radius of the center recharge disc.
pub const CENTER_R: f64 = 0.225;

/// Center disc position.
pub const CENTER_X: f64 = 4.5;
/// Center disc position.
pub const CENTER_Y: f64 = 4.5;

/// Ticks between value decays of a normal ball.
pub const COUNTDOWN: u32 = 45;

/// Probability that a spawned ball is golden.
pub const GOLDEN_CHANCE: f64 = 0.01;

/// Probability that a spawned ball is explosive.
pub const EXPLOSIVE_CHANCE: f64 = 1.0 / 75.0;

/// Cooldown in ticks after a spawn before the next one.
pub const SPAWN_COOLDOWN: u32 = 60;

/// A spawn may only happen on ticks divisible by this interval.
pub const SPAWN_INTERVAL: u32 = 60;

/// Maximum concurrent balls on the field.
pub const MAX_ON_FIELD: usize = 10;

/// Timeouts in a streak before the progressive multiplier resets.
pub const TIMEOUT_LIMIT: u32 = 5;

/// Upper bound of the progressive win multiplier.
pub const PROGRESSIVE_CAP: u32 = 5;

/// Stake per ball (informational; payouts are computed in win units).
pub const BET_PER_BALL: u32 = 5;

/// Replay bound: no game may run longer than `numBalls` times this.
pub const MAX_TICKS_PER_BALL: u32 = 600;

/// Win multiplier of a golden ball.
pub const GOLDEN_MULTIPLIER: u32 = 3;

// =============================================================================
// BUMPER
// =============================================================================

/// Bumper collision radius.
pub const BUMPER_RADIUS: f64 = 0.4;

/// Bumper bounding box, X axis.
pub const BUMPER_MIN_X: f64 = 1.5;
/// Bumper bounding box, X axis.
pub const BUMPER_MAX_X: f64 = 7.5;
/// Bumper bounding box, Y axis.
pub const BUMPER_MIN_Y: f64 = 0.4;
/// Bumper bounding box, Y axis.
pub const BUMPER_MAX_Y: f64 = 3.5;

/// Maximum bumper travel per tick.
pub const BUMPER_MAX_SPEED: f64 = 0.15;

/// Bumper start position.
pub const BUMPER_START_X: f64 = 4.5;
/// Bumper start position.
pub const BUMPER_START_Y: f64 = 2.0;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bumper_box_inside_field() {
        assert!(BUMPER_MIN_X >= BALL_R && BUMPER_MAX_X <= FIELD - BALL_R);
        assert!(BUMPER_MIN_Y >= BALL_R && BUMPER_MAX_Y <= FIELD - BALL_R);
        assert!(BUMPER_MIN_X < BUMPER_MAX_X);
        assert!(BUMPER_MIN_Y < BUMPER_MAX_Y);
    }

    #[test]
    fn test_bumper_starts_inside_box() {
        assert!((BUMPER_MIN_X..=BUMPER_MAX_X).contains(&BUMPER_START_X));
        assert!((BUMPER_MIN_Y..=BUMPER_MAX_Y).contains(&BUMPER_START_Y));
    }

    #[test]
    fn test_spawn_chances_sum_below_one() {
        assert!(GOLDEN_CHANCE + EXPLOSIVE_CHANCE < 1.0);
    }

    #[test]
    fn test_spawn_band_inside_walls() {
        // Spawn x is drawn from [0.5, 8.5), y is FIELD - 0.3
        assert!(0.5 >= BALL_R);
        assert!(8.5 <= FIELD - BALL_R);
        assert!(FIELD - 0.3 <= FIELD - BALL_R);
    }
}
