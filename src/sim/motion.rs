//! Motion integration
//!
//! Advances positions, velocities and timers. Boundary policy differs per
//! entity: hazards bounce, the player is clamped, projectiles are culled.

use glam::Vec2;

use super::entities::{Hazard, Player};
use super::state::GameState;
use crate::clamp;
use crate::consts::*;

/// Sanitize a frame delta: non-finite becomes 0, stalls are capped
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 }
}

/// Integrate every entity by `dt`
pub fn integrate(state: &mut GameState, dt: f32) {
    let size = state.size;

    update_player(&mut state.player, dt, size);

    for hazard in &mut state.hazards {
        update_hazard(hazard, dt, size);
    }

    update_collectibles(state, dt);

    state.particles.update(dt);
}

/// Steer toward the target, integrate, clamp to the canvas, tick timers
pub fn update_player(player: &mut Player, dt: f32, size: Vec2) {
    if !player.alive {
        return;
    }

    let speed_multiplier = player.upgrades.speed_multiplier;
    let to_target = player.target - player.pos;
    let dist = to_target.length();
    if dist > PLAYER_ARRIVE_DISTANCE {
        let accel = to_target / dist * PLAYER_ACCELERATION * speed_multiplier;
        player.vel += accel * dt;
    }

    let max_speed = PLAYER_MAX_SPEED * speed_multiplier;
    player.vel = player.vel.clamp_length_max(max_speed);
    player.vel *= PLAYER_FRICTION;

    player.pos += player.vel * dt;
    player.pos.x = clamp(player.pos.x, player.radius, size.x - player.radius);
    player.pos.y = clamp(player.pos.y, player.radius, size.y - player.radius);

    player.update_aim();

    if player.shoot_timer > 0.0 {
        player.shoot_timer = (player.shoot_timer - dt).max(0.0);
    }

    for projectile in &mut player.projectiles {
        projectile.pos += projectile.vel * dt;
        projectile.age += dt;
    }
    player
        .projectiles
        .retain(|p| !p.expired() && !p.out_of_bounds(size));

    player.upgrades.tick(dt);
}

/// Drift, spin, and bounce off canvas edges
pub fn update_hazard(hazard: &mut Hazard, dt: f32, size: Vec2) {
    hazard.pos += hazard.vel * dt;
    hazard.rotation += hazard.rotation_speed * dt;

    let r = hazard.radius();
    if hazard.pos.x - r < 0.0 || hazard.pos.x + r > size.x {
        hazard.vel.x = -hazard.vel.x;
        hazard.pos.x = clamp(hazard.pos.x, r, size.x - r);
    }
    if hazard.pos.y - r < 0.0 || hazard.pos.y + r > size.y {
        hazard.vel.y = -hazard.vel.y;
        hazard.pos.y = clamp(hazard.pos.y, r, size.y - r);
    }

    if hazard.flash_timer > 0.0 {
        hazard.flash_timer = (hazard.flash_timer - dt).max(0.0);
    }
}

/// Age dust, pull it toward a magnetized ship, drop expired pieces
fn update_collectibles(state: &mut GameState, dt: f32) {
    let magnet = state.player.alive && state.player.upgrades.magnet;
    let ship = state.player.pos;

    for c in &mut state.collectibles {
        c.age += dt;
        if magnet {
            let to_ship = ship - c.pos;
            let dist = to_ship.length();
            if dist > 0.0 && dist < MAGNET_RANGE {
                let step = (MAGNET_PULL_SPEED * dt).min(dist);
                c.pos += to_ship / dist * step;
            }
        }
    }
    state.collectibles.retain(|c| !c.expired());
}
