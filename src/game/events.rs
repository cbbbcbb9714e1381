//! Game Events
//!
//! Events generated during simulation. The event stream is part of the
//! deterministic output: two replays of the same game produce identical
//! streams, which makes events usable both for client presentation and
//! for audit diffing.

use serde::{Deserialize, Serialize};

use crate::game::state::BallKind;

/// Which goal corner a ball entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalSide {
    /// The `(0, 0)` corner.
    Left,
    /// The `(FIELD, 0)` corner.
    Right,
}

/// One observable event within a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    /// A ball entered the field.
    Spawn {
        /// Ball id.
        id: u32,
        /// Ball kind.
        kind: BallKind,
        /// Spawn position.
        x: f64,
        /// Spawn position.
        y: f64,
    },

    /// A normal ball decayed to zero and died.
    Timeout {
        /// Ball id.
        id: u32,
    },

    /// A ball bounced off the bumper.
    BumperHit {
        /// Ball id.
        id: u32,
    },

    /// A normal ball recharged to full value at the center disc.
    Recharge {
        /// Ball id.
        id: u32,
    },

    /// A ball scored in a goal corner.
    Goal {
        /// Ball id.
        id: u32,
        /// Goal corner.
        side: GoalSide,
        /// Win units awarded.
        prize: u32,
    },

    /// A ball was collected by an explosive chain reaction.
    Exploded {
        /// Victim ball id.
        id: u32,
        /// Win units awarded for the victim.
        prize: u32,
    },

    /// A ball-ball collision resolved with a casualty.
    Collision {
        /// Surviving ball id.
        winner: u32,
        /// Destroyed ball id.
        loser: u32,
        /// Win units awarded for the collision.
        prize: u32,
    },

    /// The timeout streak hit the limit; progressive reset to 1.
    ProgressiveReset,

    /// Only special balls remained; one was scored as if it reached a goal.
    AutoCollect {
        /// Ball id.
        id: u32,
        /// Win units awarded.
        prize: u32,
    },

    /// All balls spawned and cleared; the game is over.
    GameEnd {
        /// Final total in win units.
        total_win: u64,
    },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_tags() {
        let event = GameEvent::Goal {
            id: 4,
            side: GoalSide::Left,
            prize: 45,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"goal","id":4,"side":"left","prize":45}"#);
    }

    #[test]
    fn test_camel_case_variants() {
        let json = serde_json::to_string(&GameEvent::ProgressiveReset).unwrap();
        assert_eq!(json, r#"{"type":"progressiveReset"}"#);

        let json = serde_json::to_string(&GameEvent::AutoCollect { id: 1, prize: 9 }).unwrap();
        assert!(json.contains(r#""type":"autoCollect""#));

        let json = serde_json::to_string(&GameEvent::GameEnd { total_win: 120 }).unwrap();
        assert!(json.contains(r#""type":"gameEnd""#));
    }

    #[test]
    fn test_event_roundtrip() {
        let events = vec![
            GameEvent::Spawn {
                id: 0,
                kind: BallKind::Explosive,
                x: 4.1,
                y: 8.7,
            },
            GameEvent::BumperHit { id: 0 },
            GameEvent::Collision {
                winner: 1,
                loser: 0,
                prize: 18,
            },
        ];
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<GameEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, events);
    }
}
