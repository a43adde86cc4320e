//! Stellar Drift - an arcade survival simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, progression, shop)
//! - `platform`: Frame driver and renderer collaborator seam
//! - `highscores`: Personal best tracking
//! - `persistence`: JSON file storage for the personal best
//! - `leaderboard`: Remote leaderboard wire contract and ranking rules
//! - `settings`: Data-driven configuration

pub mod highscores;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::{BestRecord, BestStore, MemoryBestStore};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest dt a single tick will integrate (frame stalls are capped)
    pub const MAX_DT: f32 = 0.1;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default canvas dimensions
    pub const CANVAS_WIDTH: f32 = 1280.0;
    pub const CANVAS_HEIGHT: f32 = 720.0;

    /// Player ship
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_MAX_SPEED: f32 = 300.0;
    pub const PLAYER_ACCELERATION: f32 = 800.0;
    /// Velocity retained per tick
    pub const PLAYER_FRICTION: f32 = 0.95;
    /// Player stops steering when this close to its target
    pub const PLAYER_ARRIVE_DISTANCE: f32 = 5.0;
    /// Seconds between shots
    pub const SHOOT_COOLDOWN: f32 = 0.2;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 600.0;
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    pub const PROJECTILE_DAMAGE: f32 = 20.0;
    pub const PROJECTILE_TTL: f32 = 2.0;

    /// Hazard spawning
    pub const MAX_HAZARDS: usize = 15;
    pub const INITIAL_SPAWN_INTERVAL: f32 = 2.0;
    pub const MIN_SPAWN_INTERVAL: f32 = 0.5;
    /// Distance outside the canvas edge where hazards appear
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Collectibles
    pub const COLLECTIBLE_LIFETIME: f32 = 10.0;
    pub const COLLECTIBLE_JITTER: f32 = 20.0;
    pub const MAGNET_RANGE: f32 = 200.0;
    pub const MAGNET_PULL_SPEED: f32 = 300.0;

    /// Decorative particles
    pub const MAX_PARTICLES: usize = 1000;
    pub const PARTICLE_GRAVITY: f32 = 50.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// True when two circles strictly overlap (distance between centers < sum of radii)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Clamp a scalar to `[min, max]`
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
