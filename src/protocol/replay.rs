//! Bounded Deterministic Replay
//!
//! Re-runs a game from `(gameSeedHex, numBalls, inputLog)` to recompute
//! its total. The input policy is carry-forward: a log record whose tick
//! matches the upcoming tick supplies a new target, every other tick
//! keeps the previous one. A hard tick bound caps the work a hostile log
//! can demand.

use crate::game::config::MAX_TICKS_PER_BALL;
use crate::game::state::InputRecord;
use crate::game::tick::{create_initial_state, tick};
use crate::protocol::ProtocolError;

/// Result of a replay run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Recomputed total in win units.
    pub total_win: u64,
    /// Ticks simulated.
    pub ticks: u32,
    /// Whether the game reached its natural end within the bound.
    pub finished: bool,
}

/// Check an input log is a well-formed sequence.
///
/// Ticks must be 1-based and strictly increasing, targets finite. The
/// engine clamps targets itself, so out-of-box coordinates are legal
/// here; NaN and infinity are not.
pub fn validate_input_log(log: &[InputRecord]) -> Result<(), ProtocolError> {
    let mut last = 0u32;
    for record in log {
        if record.tick == 0 {
            return Err(ProtocolError::MalformedInputLog(
                "tick numbers are 1-based".into(),
            ));
        }
        if record.tick <= last {
            return Err(ProtocolError::MalformedInputLog(format!(
                "tick {} does not increase over {}",
                record.tick, last
            )));
        }
        if !record.target.x.is_finite() || !record.target.y.is_finite() {
            return Err(ProtocolError::MalformedInputLog(format!(
                "non-finite target at tick {}",
                record.tick
            )));
        }
        last = record.tick;
    }
    Ok(())
}

/// Replay a game to completion or to the tick bound.
///
/// Assumes a validated log. Records are consumed exactly when the game
/// reaches their tick; records beyond the bound are ignored.
pub fn replay(game_seed_hex: &str, num_balls: u32, input_log: &[InputRecord]) -> ReplayOutcome {
    let mut state = create_initial_state(game_seed_hex, num_balls);
    let bound = num_balls.saturating_mul(MAX_TICKS_PER_BALL);
    let mut next = 0usize;

    while !state.finished && state.tick_count < bound {
        let target = match input_log.get(next) {
            Some(record) if record.tick == state.tick_count + 1 => {
                next += 1;
                Some(record.target)
            }
            _ => None,
        };
        tick(&mut state, target);
    }

    ReplayOutcome {
        total_win: state.total_win,
        ticks: state.tick_count,
        finished: state.finished,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Target;
    use crate::game::tick::play;

    const SEED: &str = "0f0e0d0c0b0a09080706050403020100f0e0d0c0b0a090807060504030201000";
    const SEED2: &str = "c0ffee00c0ffee00c0ffee00c0ffee00c0ffee00c0ffee00c0ffee00c0ffee00";

    fn record(tick: u32, x: f64, y: f64) -> InputRecord {
        InputRecord {
            tick,
            target: Target { x, y },
        }
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let log = vec![record(1, 4.5, 2.0), record(2, 4.4, 2.0), record(10, 1.5, 0.4)];
        assert!(validate_input_log(&log).is_ok());
        assert!(validate_input_log(&[]).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_tick() {
        let log = vec![record(0, 4.5, 2.0)];
        assert!(matches!(
            validate_input_log(&log),
            Err(ProtocolError::MalformedInputLog(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_increasing() {
        let log = vec![record(5, 4.5, 2.0), record(5, 4.5, 2.0)];
        assert!(validate_input_log(&log).is_err());

        let log = vec![record(5, 4.5, 2.0), record(3, 4.5, 2.0)];
        assert!(validate_input_log(&log).is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_targets() {
        let log = vec![record(1, f64::NAN, 2.0)];
        assert!(validate_input_log(&log).is_err());

        let log = vec![record(1, 4.5, f64::INFINITY)];
        assert!(validate_input_log(&log).is_err());
    }

    #[test]
    fn test_replay_reproduces_played_game() {
        let outcome = play(SEED2, 2, |state| {
            // Wander the bumper deterministically
            let t = state.tick_count as f64;
            Some(Target {
                x: 4.5 + (t * 0.01).sin() * 2.5,
                y: 2.0 + (t * 0.013).cos() * 1.2,
            })
        });

        assert!(validate_input_log(&outcome.input_log).is_ok());
        let replayed = replay(SEED2, 2, &outcome.input_log);

        assert_eq!(replayed.total_win, outcome.total_win);
        assert_eq!(replayed.ticks, outcome.ticks);
        assert_eq!(replayed.finished, outcome.finished);
    }

    #[test]
    fn test_replay_carries_last_target_forward() {
        // A log that stops early behaves like holding the final target
        let short_log = vec![record(1, 7.5, 3.5)];
        let a = replay(SEED2, 1, &short_log);

        let b = play(SEED2, 1, |state| {
            if state.tick_count == 0 {
                Some(Target { x: 7.5, y: 3.5 })
            } else {
                None
            }
        });

        assert_eq!(a.total_win, b.total_win);
        assert_eq!(a.ticks, b.ticks);
    }

    #[test]
    fn test_replay_with_empty_log_is_bounded() {
        let outcome = replay(SEED, 1, &[]);
        assert!(outcome.ticks <= MAX_TICKS_PER_BALL);
    }

    #[test]
    fn test_replay_ignores_gap_records_beyond_end() {
        // Records for ticks the bound never reaches are simply unused
        let log = vec![record(1, 4.0, 2.0), record(10_000_000, 1.5, 0.4)];
        let a = replay(SEED2, 1, &log);
        let b = replay(SEED2, 1, &log[..1]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let log = vec![record(1, 2.0, 1.0), record(30, 6.5, 3.0), record(61, 4.5, 0.4)];
        assert_eq!(replay(SEED2, 3, &log), replay(SEED2, 3, &log));
    }
}
