//! Procedural spawning
//!
//! Hazards enter from a random canvas edge on a timer; dust collectibles drop
//! where a hazard was destroyed in combat.

use glam::Vec2;
use rand::Rng;

use super::entities::{Collectible, Hazard, HazardVariant};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Canvas edge a hazard enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub fn from_index(index: u32) -> Self {
        match index % 4 {
            0 => Edge::Top,
            1 => Edge::Right,
            2 => Edge::Bottom,
            _ => Edge::Left,
        }
    }

    /// Point `along` (0..1) this edge, pushed `margin` outside the canvas
    pub fn point(&self, size: Vec2, along: f32, margin: f32) -> Vec2 {
        match self {
            Edge::Top => Vec2::new(along * size.x, -margin),
            Edge::Right => Vec2::new(size.x + margin, along * size.y),
            Edge::Bottom => Vec2::new(along * size.x, size.y + margin),
            Edge::Left => Vec2::new(-margin, along * size.y),
        }
    }
}

/// Sanitize a spawn interval: never below the floor, never NaN
pub fn clamp_interval(interval: f32) -> f32 {
    if interval.is_finite() {
        interval.max(MIN_SPAWN_INTERVAL)
    } else {
        INITIAL_SPAWN_INTERVAL
    }
}

/// Advance the spawn timer and spawn at most one hazard.
/// Each time the timer fires the interval is recomputed for the current level.
pub fn update_spawner(state: &mut GameState, dt: f32) {
    state.spawn_interval = clamp_interval(state.spawn_interval);
    state.spawn_timer += dt;
    if state.spawn_timer < state.spawn_interval {
        return;
    }
    state.spawn_timer = 0.0;

    if state.hazards.len() < MAX_HAZARDS {
        spawn_hazard(state);
    }
    state.spawn_interval = clamp_interval(state.progression.spawn_interval());
}

/// Spawn one hazard on a random edge at the current level
pub fn spawn_hazard(state: &mut GameState) -> u32 {
    let edge = Edge::from_index(state.rng.random_range(0..4));
    let along: f32 = state.rng.random();
    let pos = edge.point(state.size, along, SPAWN_MARGIN);
    let variant = HazardVariant::from_draw(state.rng.random());
    let heading = state.rng.random_range(0.0..std::f32::consts::TAU);
    let rotation_speed = state.rng.random_range(-2.0..2.0);
    let level = state.level();

    let id = state.next_entity_id();
    state
        .hazards
        .push(Hazard::new(id, variant, level, pos, heading, rotation_speed));
    state.push_event(GameEvent::HazardSpawned { id });
    log::debug!(
        "Spawned {} hazard {} at ({:.0}, {:.0}) on {:?} edge",
        variant.as_str(),
        id,
        pos.x,
        pos.y,
        edge
    );
    id
}

/// Drop `count` dust collectibles around a death position
pub fn spawn_dust(state: &mut GameState, pos: Vec2, count: u32) {
    for _ in 0..count {
        let jitter = Vec2::new(
            state.rng.random_range(-COLLECTIBLE_JITTER..=COLLECTIBLE_JITTER),
            state.rng.random_range(-COLLECTIBLE_JITTER..=COLLECTIBLE_JITTER),
        );
        let id = state.next_entity_id();
        state.collectibles.push(Collectible::new(id, pos + jitter, 1));
    }
}
