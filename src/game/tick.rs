//! Authoritative Simulation Tick
//!
//! The core game loop. One call to [`tick`] advances a game by exactly one
//! step and returns the events observed in that step.
//!
//! ## Phase order is the contract
//!
//! Every phase below runs in a fixed order, and the RNG advances once per
//! drawn event, so reordering any two phases (or any two draws inside a
//! phase) changes every subsequent outcome. Server and client replay the
//! same order or they disagree about the whole game.
//!
//! 1. guard on `finished`
//! 2. advance the tick counter, cool the spawner
//! 3. apply the supplied bumper target (clamped)
//! 4. move the bumper toward its target
//! 5. bind the RNG context to `(tick, bumperX, bumperY)`
//! 6. append the input record
//! 7. spawn
//! 8. integrate balls, wall bounces, value decay
//! 9. bumper collisions
//! 10. center recharges
//! 11. goals and explosive chains
//! 12. ball-ball collisions
//! 13. timeout tally
//! 14. compact
//! 15. auto-collect
//! 16. game end

use crate::core::geom::{clamp, dist, fp_round};
use crate::game::collision::{
    jitter_direction, resolve_ball_collisions, resolve_bumper_hits, resolve_center_recharges,
};
use crate::game::config::{
    BALL_R, BUMPER_MAX_SPEED, BUMPER_MAX_X, BUMPER_MAX_Y, BUMPER_MIN_X, BUMPER_MIN_Y, COUNTDOWN,
    EXPLOSIVE_CHANCE, FIELD, GOAL_R, GOLDEN_CHANCE, MAX_ON_FIELD, MAX_TICKS_PER_BALL,
    PROGRESSIVE_CAP, SPAWN_COOLDOWN, SPAWN_INTERVAL, SPEED, TIMEOUT_LIMIT,
};
use crate::game::events::{GameEvent, GoalSide};
use crate::game::state::{Ball, BallKind, Bumper, GameState, InputRecord, Target};

/// Create the initial state for a game.
pub fn create_initial_state(game_seed_hex: &str, num_balls: u32) -> GameState {
    GameState::new(game_seed_hex, num_balls)
}

/// Advance the game by one tick.
///
/// `target` is the player's bumper target for this tick; `None` keeps the
/// previous target (the bumper continues toward wherever it was already
/// heading). Returns the events observed this tick; a finished game
/// returns none and stays untouched.
pub fn tick(state: &mut GameState, target: Option<Target>) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.finished {
        return events;
    }

    state.tick_count += 1;
    if state.spawn_cooldown > 0 {
        state.spawn_cooldown -= 1;
    }

    if let Some(t) = target {
        state.bumper.target_x = clamp(t.x, BUMPER_MIN_X, BUMPER_MAX_X);
        state.bumper.target_y = clamp(t.y, BUMPER_MIN_Y, BUMPER_MAX_Y);
    }

    move_bumper(&mut state.bumper);

    // The committed position seeds every draw for the rest of this tick
    state
        .rng
        .set_tick_context(state.tick_count, state.bumper.x, state.bumper.y);

    state.input_log.push(InputRecord {
        tick: state.tick_count,
        target: Target {
            x: state.bumper.target_x,
            y: state.bumper.target_y,
        },
    });

    maybe_spawn_ball(state, &mut events);
    update_balls(state, &mut events);
    resolve_bumper_hits(state, &mut events);
    resolve_center_recharges(state, &mut events);
    process_goals(state, &mut events);
    resolve_ball_collisions(state, &mut events);
    tally_timeouts(state, &mut events);

    state.balls.retain(|b| b.alive);

    auto_collect(state, &mut events);

    if state.balls_spawned == state.num_balls && state.balls.is_empty() {
        state.finished = true;
        events.push(GameEvent::GameEnd {
            total_win: state.total_win,
        });
    }

    events
}

/// Step the bumper toward its target, capped at `BUMPER_MAX_SPEED`.
fn move_bumper(bumper: &mut Bumper) {
    let dx = bumper.target_x - bumper.x;
    let dy = bumper.target_y - bumper.y;
    let len = (dx * dx + dy * dy).sqrt();

    if len > BUMPER_MAX_SPEED {
        bumper.x = fp_round(bumper.x + dx / len * BUMPER_MAX_SPEED);
        bumper.y = fp_round(bumper.y + dy / len * BUMPER_MAX_SPEED);
    } else {
        bumper.x = bumper.target_x;
        bumper.y = bumper.target_y;
    }
}

/// Spawn a ball if the interval, cooldown, field cap and ball budget allow.
fn maybe_spawn_ball(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.tick_count % SPAWN_INTERVAL != 0
        || state.balls.len() >= MAX_ON_FIELD
        || state.spawn_cooldown > 0
        || state.balls_spawned >= state.num_balls
    {
        return;
    }

    let r_x = state.rng.next_double("spawn_x");
    let r_angle = state.rng.next_double("spawn_angle");
    let r_type = state.rng.next_double("spawn_type");

    let x = fp_round(0.5 + r_x * 8.0);
    let y = FIELD - 0.3;

    // Downward cone: 220..320 degrees
    let angle = (220.0 + r_angle * 100.0) * std::f64::consts::PI / 180.0;
    let dx = fp_round(angle.cos() * SPEED);
    let dy = fp_round(angle.sin() * SPEED);

    let kind = if r_type < GOLDEN_CHANCE {
        BallKind::Golden
    } else if r_type < GOLDEN_CHANCE + EXPLOSIVE_CHANCE {
        BallKind::Explosive
    } else {
        BallKind::Normal
    };

    let id = state.next_ball_id;
    state.next_ball_id += 1;

    state.balls.push(Ball {
        id,
        x,
        y,
        dx,
        dy,
        value: 9,
        ticks_since_countdown: 0,
        kind,
        multiplier: kind.multiplier(),
        alive: true,
        died_from_timeout: false,
    });

    state.balls_spawned += 1;
    state.spawn_cooldown = SPAWN_COOLDOWN;

    events.push(GameEvent::Spawn { id, kind, x, y });
}

/// Integrate ball motion, reflect off walls, decay normal-ball value.
fn update_balls(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let GameState { balls, rng, .. } = state;

    for ball in balls.iter_mut() {
        if !ball.alive {
            continue;
        }

        ball.ticks_since_countdown += 1;

        ball.x = fp_round(ball.x + ball.dx);
        ball.y = fp_round(ball.y + ball.dy);

        // Wall reflection, each axis independently
        let mut hit_wall = false;
        if ball.x < BALL_R {
            ball.x = BALL_R;
            ball.dx = -ball.dx;
            hit_wall = true;
        } else if ball.x > FIELD - BALL_R {
            ball.x = FIELD - BALL_R;
            ball.dx = -ball.dx;
            hit_wall = true;
        }
        if ball.y < BALL_R {
            ball.y = BALL_R;
            ball.dy = -ball.dy;
            hit_wall = true;
        } else if ball.y > FIELD - BALL_R {
            ball.y = FIELD - BALL_R;
            ball.dy = -ball.dy;
            hit_wall = true;
        }

        if ball.kind.is_normal() && ball.ticks_since_countdown >= COUNTDOWN && ball.value > 0 {
            ball.value -= 1;
            ball.ticks_since_countdown = 0;
            if ball.value == 0 {
                ball.alive = false;
                ball.died_from_timeout = true;
                events.push(GameEvent::Timeout { id: ball.id });
            }
        }

        if ball.alive && hit_wall {
            let r = rng.next_double(&format!("wall_{}", ball.id));
            jitter_direction(ball, r);
        }
    }
}

/// Score balls that reached a goal corner; detonate explosive scorers.
fn process_goals(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let count = state.balls.len();

    for i in 0..count {
        if !state.balls[i].alive {
            continue;
        }

        let (bx, by) = (state.balls[i].x, state.balls[i].y);
        let d_left = dist(bx, by, 0.0, 0.0);
        let d_right = dist(bx, by, FIELD, 0.0);
        if d_left >= GOAL_R && d_right >= GOAL_R {
            continue;
        }
        let side = if d_left < GOAL_R {
            GoalSide::Left
        } else {
            GoalSide::Right
        };

        let prize = state.balls[i].prize(state.progressive);
        state.total_win += u64::from(prize);
        state.balls[i].alive = false;

        let kind = state.balls[i].kind;
        if kind == BallKind::Golden {
            state.timeout_count = 0;
        }
        if state.progressive < PROGRESSIVE_CAP {
            state.progressive += 1;
        }

        events.push(GameEvent::Goal {
            id: state.balls[i].id,
            side,
            prize,
        });

        if kind == BallKind::Explosive {
            // Chain reaction: collect every live ball in the upper half.
            // Victims resolve in spawn order; the progressive steps per
            // victim, so later victims pay out at a higher multiplier.
            state.timeout_count = 0;
            for j in 0..count {
                if j == i || !state.balls[j].alive {
                    continue;
                }
                if state.balls[j].y < FIELD / 2.0 {
                    let prize = state.balls[j].prize(state.progressive);
                    state.total_win += u64::from(prize);
                    if state.progressive < PROGRESSIVE_CAP {
                        state.progressive += 1;
                    }
                    state.balls[j].alive = false;
                    events.push(GameEvent::Exploded {
                        id: state.balls[j].id,
                        prize,
                    });
                }
            }
        }
    }
}

/// Count decay deaths toward the streak; reset the progressive at the limit.
fn tally_timeouts(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let GameState {
        balls,
        timeout_count,
        progressive,
        ..
    } = state;

    for ball in balls.iter_mut() {
        if !ball.died_from_timeout {
            continue;
        }
        ball.died_from_timeout = false;
        *timeout_count += 1;
        if *timeout_count >= TIMEOUT_LIMIT {
            *progressive = 1;
            *timeout_count = 0;
            events.push(GameEvent::ProgressiveReset);
        }
    }
}

/// Collect the whole field once no normal ball remains on it.
fn auto_collect(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.balls.is_empty() || state.has_normal_ball() {
        return;
    }

    for i in 0..state.balls.len() {
        let prize = state.balls[i].prize(state.progressive);
        state.total_win += u64::from(prize);
        if state.progressive < PROGRESSIVE_CAP {
            state.progressive += 1;
        }
        events.push(GameEvent::AutoCollect {
            id: state.balls[i].id,
            prize,
        });
    }
    state.balls.clear();
}

// =============================================================================
// LOCAL PLAY
// =============================================================================

/// Outcome of playing a game locally to completion.
#[derive(Clone, Debug)]
pub struct PlayedGame {
    /// The recorded input log, one entry per tick.
    pub input_log: Vec<InputRecord>,
    /// Final total in win units.
    pub total_win: u64,
    /// The full event stream.
    pub events: Vec<GameEvent>,
    /// Whether the game reached its natural end within the tick bound.
    pub finished: bool,
    /// Ticks simulated.
    pub ticks: u32,
}

/// Play a game under a target policy until it ends or hits the tick bound.
///
/// The policy is called before every tick with the current state and may
/// return a new bumper target or `None` to keep the previous one. This is
/// what a client does during live play; tests and bots use it directly.
pub fn play<F>(game_seed_hex: &str, num_balls: u32, mut policy: F) -> PlayedGame
where
    F: FnMut(&GameState) -> Option<Target>,
{
    let mut state = create_initial_state(game_seed_hex, num_balls);
    let bound = num_balls * MAX_TICKS_PER_BALL;
    let mut events = Vec::new();

    while !state.finished && state.tick_count < bound {
        let target = policy(&state);
        events.extend(tick(&mut state, target));
    }

    PlayedGame {
        input_log: state.input_log,
        total_win: state.total_win,
        events,
        finished: state.finished,
        ticks: state.tick_count,
    }
}

// =============================================================================
// TESTS
// =============================================================================
