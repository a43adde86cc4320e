//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod motion;
pub mod particles;
pub mod phase;
pub mod progression;
pub mod shop;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, resolve_collisions};
pub use entities::{
    ActiveUpgrades, Collectible, DamageOutcome, Hazard, HazardStats, HazardVariant, Player,
    Projectile,
};
pub use particles::{Particle, ParticlePool};
pub use phase::PhaseError;
pub use progression::{BIOMES, Biome, Progression};
pub use shop::{CATALOG, PurchaseError, ShopOffer, ShopSession, UpgradeId, UpgradeItem};
pub use state::{GameEvent, GamePhase, GameState, RunSummary, Snapshot};
pub use tick::{TickInput, tick};
