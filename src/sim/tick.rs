//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::collision::resolve_collisions;
use super::motion::{clamp_dt, integrate};
use super::spawn::update_spawner;
use super::state::{GameEvent, GamePhase, GameState};
use crate::distance;

/// Distance the autopilot tries to keep from the nearest hazard
const AUTOPILOT_STANDOFF: f32 = 250.0;
/// Autopilot only goes for dust when no hazard is this close
const AUTOPILOT_SAFE_DISTANCE: f32 = 200.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering target (from mouse/touch position)
    pub target: Option<Vec2>,
    /// Fire (held button)
    pub shoot: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        let toggled = match state.phase {
            GamePhase::Playing => state.pause(),
            GamePhase::Paused => state.resume(),
            _ => Ok(()),
        };
        if let Err(err) = toggled {
            log::warn!("Ignoring pause toggle: {}", err);
        }
        if state.phase == GamePhase::Paused {
            return;
        }
    }

    // Menu, pause, shop and game over freeze every timer
    if state.phase != GamePhase::Playing {
        return;
    }

    let dt = clamp_dt(dt);

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    if let Some(target) = input.target {
        state.player.set_target(target);
    }

    if input.shoot && state.player.can_shoot() {
        let id = state.next_entity_id();
        if state.player.shoot(id) {
            state.push_event(GameEvent::ProjectileFired { id });
        }
    }

    update_spawner(state, dt);
    integrate(state, dt);
    let report = resolve_collisions(state);

    state.time_ticks += 1;
    state.elapsed += dt;

    // Death wins over a level-up earned on the same tick
    if report.player_killed || !state.player.is_alive() {
        state.end_run();
        return;
    }

    if report.leveled_up {
        if let Err(err) = state.open_shop() {
            log::warn!("Level-up without shop: {}", err);
        }
    }
}

/// Demo AI: keep a standoff from the nearest hazard and shoot at it,
/// sweep up dust when nothing is close
fn autopilot(state: &GameState, input: &mut TickInput) {
    let ship = state.player.pos;

    let nearest = state.hazards.iter().min_by(|a, b| {
        a.pos
            .distance_squared(ship)
            .partial_cmp(&b.pos.distance_squared(ship))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let threat_close = nearest
        .map(|h| distance(h.pos, ship) - h.radius() < AUTOPILOT_SAFE_DISTANCE)
        .unwrap_or(false);

    if !threat_close {
        let dust = state.collectibles.iter().min_by(|a, b| {
            a.pos
                .distance_squared(ship)
                .partial_cmp(&b.pos.distance_squared(ship))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(dust) = dust {
            input.target = Some(dust.pos);
            input.shoot = nearest.is_some();
            return;
        }
    }

    match nearest {
        Some(hazard) => {
            // Lead the target slightly along its velocity
            let lead = hazard.pos + hazard.vel * 0.2;
            let away = (ship - lead).normalize_or_zero();
            input.target = Some(lead + away * AUTOPILOT_STANDOFF);
            input.shoot = true;
        }
        None => {
            // Drift back toward the middle
            input.target = Some(state.size / 2.0);
        }
    }
}
