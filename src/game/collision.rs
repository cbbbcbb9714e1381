//! Collision Resolution
//!
//! Bumper bounces, center-disc recharges and ball-ball collisions.
//! All functions iterate balls in spawn order and draw randomness through
//! the state's input-seeded RNG; call order is part of the engine
//! contract because every draw advances the per-tick counter.

use std::f64::consts::PI;

use crate::core::geom::{clamp, dist, fp_round};
use crate::game::config::{BALL_R, BUMPER_RADIUS, CENTER_R, CENTER_X, CENTER_Y, FIELD, SPEED};
use crate::game::events::GameEvent;
use crate::game::state::{Ball, GameState};

/// Rotate a ball's velocity by `(r - 0.5) * 0.1 * π`, keeping its speed.
///
/// `r` is a unit-interval draw; the rotation band is ±9 degrees.
pub(crate) fn jitter_direction(ball: &mut Ball, r: f64) {
    let speed = (ball.dx * ball.dx + ball.dy * ball.dy).sqrt();
    let angle = ball.dy.atan2(ball.dx) + (r - 0.5) * 0.1 * PI;
    ball.dx = fp_round(angle.cos() * speed);
    ball.dy = fp_round(angle.sin() * speed);
}

/// Reflect balls off the bumper.
///
/// Each overlapping ball is mirrored about the contact normal, pushed out
/// to the contact distance and direction-jittered with a `bumper_{id}`
/// draw.
pub(crate) fn resolve_bumper_hits(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let GameState {
        balls, rng, bumper, ..
    } = state;
    let reach = BALL_R + BUMPER_RADIUS;

    for ball in balls.iter_mut() {
        if !ball.alive {
            continue;
        }
        let d = dist(ball.x, ball.y, bumper.x, bumper.y);
        if d >= reach || d <= 0.0 {
            continue;
        }

        let nx = (ball.x - bumper.x) / d;
        let ny = (ball.y - bumper.y) / d;

        // v' = v - 2 (v . n) n
        let dot = ball.dx * nx + ball.dy * ny;
        ball.dx = fp_round(ball.dx - 2.0 * dot * nx);
        ball.dy = fp_round(ball.dy - 2.0 * dot * ny);

        // Snap out of the overlap; the contact point can poke past the
        // field near the box floor, so pin it back inside
        ball.x = fp_round(clamp(bumper.x + nx * reach, BALL_R, FIELD - BALL_R));
        ball.y = fp_round(clamp(bumper.y + ny * reach, BALL_R, FIELD - BALL_R));

        let r = rng.next_double(&format!("bumper_{}", ball.id));
        jitter_direction(ball, r);

        events.push(GameEvent::BumperHit { id: ball.id });
    }
}

/// Redirect balls passing through the center disc.
///
/// The velocity is pointed outward from the center at base speed and
/// jittered with a `center_{id}` draw. Normal balls below full value are
/// recharged to 9 with a fresh countdown.
pub(crate) fn resolve_center_recharges(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let GameState { balls, rng, .. } = state;
    let reach = CENTER_R + BALL_R;

    for ball in balls.iter_mut() {
        if !ball.alive {
            continue;
        }
        let d = dist(ball.x, ball.y, CENTER_X, CENTER_Y);
        if d >= reach || d <= 0.0 {
            continue;
        }

        let nx = (ball.x - CENTER_X) / d;
        let ny = (ball.y - CENTER_Y) / d;
        ball.dx = fp_round(nx * SPEED);
        ball.dy = fp_round(ny * SPEED);

        let r = rng.next_double(&format!("center_{}", ball.id));
        jitter_direction(ball, r);

        if ball.kind.is_normal() && ball.value < 9 {
            ball.value = 9;
            ball.ticks_since_countdown = 0;
            events.push(GameEvent::Recharge { id: ball.id });
        }
    }
}

/// Resolve ball-ball collisions over upper-triangle pairs in spawn order.
///
/// Outcomes by kind:
/// - two specials bounce elastically (no casualty, two jitter draws),
/// - a special destroys a normal for 1 win unit,
/// - equal-value normals double the value and a `double_{i}_{j}` draw
///   picks the casualty,
/// - unequal normals destroy the lower value for 1 win unit and the
///   winner flees along the contact normal.
///
/// Collision labels use pair *indices*; `win_{id}` uses the winner's id.
pub(crate) fn resolve_ball_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let GameState {
        balls,
        rng,
        total_win,
        ..
    } = state;
    let n = balls.len();

    for i in 0..n {
        for j in (i + 1)..n {
            if !balls[i].alive || !balls[j].alive {
                continue;
            }
            let d = dist(balls[i].x, balls[i].y, balls[j].x, balls[j].y);
            if d >= 2.0 * BALL_R {
                continue;
            }

            let special_i = !balls[i].kind.is_normal();
            let special_j = !balls[j].kind.is_normal();

            if special_i && special_j {
                if d <= 0.0 {
                    continue;
                }
                let (head, tail) = balls.split_at_mut(j);
                let b1 = &mut head[i];
                let b2 = &mut tail[0];

                let nx = (b2.x - b1.x) / d;
                let ny = (b2.y - b1.y) / d;

                // Separate the overlap evenly, then send both along the normal
                let half = (2.0 * BALL_R - d) / 2.0;
                b1.x = fp_round(clamp(b1.x - nx * half, BALL_R, FIELD - BALL_R));
                b1.y = fp_round(clamp(b1.y - ny * half, BALL_R, FIELD - BALL_R));
                b2.x = fp_round(clamp(b2.x + nx * half, BALL_R, FIELD - BALL_R));
                b2.y = fp_round(clamp(b2.y + ny * half, BALL_R, FIELD - BALL_R));

                b1.dx = fp_round(-nx * SPEED);
                b1.dy = fp_round(-ny * SPEED);
                b2.dx = fp_round(nx * SPEED);
                b2.dy = fp_round(ny * SPEED);

                let r1 = rng.next_double(&format!("coll_{}_{}_1", i, j));
                jitter_direction(b1, r1);
                let r2 = rng.next_double(&format!("coll_{}_{}_2", i, j));
                jitter_direction(b2, r2);
            } else if special_i != special_j {
                let (winner, loser) = if special_i { (i, j) } else { (j, i) };
                balls[loser].alive = false;
                *total_win += 1;
                events.push(GameEvent::Collision {
                    winner: balls[winner].id,
                    loser: balls[loser].id,
                    prize: 1,
                });
            } else if balls[i].value == balls[j].value {
                let prize = balls[i].value * 2;
                *total_win += u64::from(prize);
                let r = rng.next_double(&format!("double_{}_{}", i, j));
                let (winner, loser) = if r < 0.5 { (i, j) } else { (j, i) };
                balls[loser].alive = false;
                events.push(GameEvent::Collision {
                    winner: balls[winner].id,
                    loser: balls[loser].id,
                    prize,
                });
            } else {
                let (winner, loser) = if balls[i].value > balls[j].value {
                    (i, j)
                } else {
                    (j, i)
                };
                *total_win += 1;

                if d > 0.0 {
                    let nx = (balls[winner].x - balls[loser].x) / d;
                    let ny = (balls[winner].y - balls[loser].y) / d;
                    balls[winner].dx = fp_round(nx * SPEED);
                    balls[winner].dy = fp_round(ny * SPEED);
                }
                let winner_id = balls[winner].id;
                let r = rng.next_double(&format!("win_{}", winner_id));
                jitter_direction(&mut balls[winner], r);

                balls[loser].alive = false;
                events.push(GameEvent::Collision {
                    winner: winner_id,
                    loser: balls[loser].id,
                    prize: 1,
                });
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
