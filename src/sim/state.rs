//! Game state and core simulation types
//!
//! `GameState` is the explicit simulation context every system receives.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Collectible, Hazard, Player, Projectile};
use super::particles::ParticlePool;
use super::progression::{Biome, Progression};
use super::shop::ShopSession;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no run in progress
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Upgrade shop between levels
    Shop,
    /// Run ended
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::Shop => "shop",
            GamePhase::GameOver => "game_over",
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result of a run, handed to the scoring collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub level: u32,
    /// Total dust gathered during the run
    pub dust: u64,
}

/// Things that happened during a tick, for audio/UI collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted { seed: u64 },
    HazardSpawned { id: u32 },
    ProjectileFired { id: u32 },
    HazardDestroyed { id: u32, pos: Vec2, score: u64 },
    /// Hazard destroyed by ramming the player
    HazardRammed { id: u32, pos: Vec2 },
    PlayerHit { damage: f32, health: f32 },
    ShieldAbsorbed,
    DustCollected { value: u32 },
    LevelUp { level: u32 },
    ShopOpened { level: u32 },
    ShopClosed,
    UpgradePurchased { id: super::shop::UpgradeId, cost: u64 },
    Paused,
    Resumed,
    GameOver(RunSummary),
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Canvas dimensions
    pub size: Vec2,
    pub score: u64,
    /// Spendable dust
    pub dust: u64,
    /// Dust gathered over the whole run (never decreases)
    pub dust_collected: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds of Playing time
    pub elapsed: f32,
    pub player: Player,
    /// Live hazards in spawn order
    pub hazards: Vec<Hazard>,
    /// Live collectibles in spawn order
    pub collectibles: Vec<Collectible>,
    pub progression: Progression,
    pub shop: ShopSession,
    /// Seconds accumulated toward the next hazard spawn
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    /// Set once the run ends
    pub summary: Option<RunSummary>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: ParticlePool,
    /// Pending events, drained by collaborators
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    particle_capacity: usize,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default settings
    pub fn new(seed: u64) -> Self {
        Self::with_size(seed, Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT), MAX_PARTICLES)
    }

    /// Create a game state configured from settings
    pub fn from_settings(seed: u64, settings: &Settings) -> Self {
        Self::with_size(seed, settings.canvas_size(), settings.max_particles())
    }

    pub fn with_size(seed: u64, size: Vec2, particle_capacity: usize) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            size,
            score: 0,
            dust: 0,
            dust_collected: 0,
            time_ticks: 0,
            elapsed: 0.0,
            player: Player::new(size / 2.0),
            hazards: Vec::new(),
            collectibles: Vec::new(),
            progression: Progression::new(),
            shop: ShopSession::new(),
            spawn_timer: 0.0,
            spawn_interval: INITIAL_SPAWN_INTERVAL,
            summary: None,
            particles: ParticlePool::new(particle_capacity, seed ^ PARTICLE_STREAM),
            events: Vec::new(),
            particle_capacity,
            next_id: 1,
        }
    }

    /// Wipe all run state back to a fresh run with a new seed.
    /// The phase is left for the caller to set. Undrained events carry over
    /// so a `GameOver` is still delivered after an immediate restart.
    pub fn reset_run(&mut self, seed: u64) {
        let phase = self.phase;
        let events = std::mem::take(&mut self.events);
        *self = Self::with_size(seed, self.size, self.particle_capacity);
        self.phase = phase;
        self.events = events;
    }

    /// Load a saved state. Particles are not saved, so the pool is rebuilt
    /// from the stored capacity and seed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut state: Self = serde_json::from_str(json)?;
        state.restore_particles();
        Ok(state)
    }

    /// Replace the particle pool with an empty one sized for this run
    pub fn restore_particles(&mut self) {
        self.particles = ParticlePool::new(self.particle_capacity, self.seed ^ PARTICLE_STREAM);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current result tuple
    pub fn run_summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            level: self.progression.level,
            dust: self.dust_collected,
        }
    }

    /// Credit dust from a kill or pickup
    pub fn add_dust(&mut self, amount: u64) {
        self.dust += amount;
        self.dust_collected += amount;
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            size: self.size,
            player: &self.player,
            projectiles: &self.player.projectiles,
            hazards: &self.hazards,
            collectibles: &self.collectibles,
            particles: &self.particles,
            score: self.score,
            dust: self.dust,
            level: self.progression.level,
            progress: self.progression.progress(),
            biome: self.progression.biome(),
            elapsed: self.elapsed,
        }
    }
}

/// Salt for the particle RNG stream
const PARTICLE_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Borrowed, read-only view of a frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub size: Vec2,
    pub player: &'a Player,
    pub projectiles: &'a [Projectile],
    pub hazards: &'a [Hazard],
    pub collectibles: &'a [Collectible],
    pub particles: &'a ParticlePool,
    pub score: u64,
    pub dust: u64,
    pub level: u32,
    /// Fraction of the current level cleared
    pub progress: f32,
    pub biome: &'static Biome,
    pub elapsed: f32,
}

impl Snapshot<'_> {
    /// Player health as a fraction of max, for the HUD bar
    pub fn health_fraction(&self) -> f32 {
        if self.player.max_health <= 0.0 {
            return 0.0;
        }
        self.player.health / self.player.max_health
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_in_menu() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.player.pos, Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0));
        assert_eq!(state.level(), 1);
        assert_eq!(state.spawn_interval, INITIAL_SPAWN_INTERVAL);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(7);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_add_dust_tracks_total() {
        let mut state = GameState::new(7);
        state.add_dust(5);
        state.dust -= 3;
        state.add_dust(2);
        assert_eq!(state.dust, 4);
        assert_eq!(state.run_summary().dust, 7);
    }

    #[test]
    fn test_reset_run_keeps_phase_and_size() {
        let mut state = GameState::with_size(1, Vec2::new(400.0, 300.0), 10);
        state.phase = GamePhase::Playing;
        state.score = 500;
        state.reset_run(2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.seed, 2);
        assert_eq!(state.size, Vec2::new(400.0, 300.0));
        assert_eq!(state.particles.capacity(), 10);
    }

    #[test]
    fn test_from_json_restores_particle_pool() {
        let mut state = GameState::with_size(4, Vec2::new(400.0, 300.0), 10);
        state.score = 250;
        let json = serde_json::to_string(&state).unwrap();

        let loaded = GameState::from_json(&json).unwrap();
        assert_eq!(loaded.score, 250);
        assert_eq!(loaded.particles.capacity(), 10);
        assert!(loaded.particles.is_empty());

        state.particles = ParticlePool::default();
        state.restore_particles();
        assert_eq!(state.particles.capacity(), 10);
        assert!(GameState::from_json("{").is_err());
    }

    #[test]
    fn test_drain_events() {
        let mut state = GameState::new(7);
        state.push_event(GameEvent::ShieldAbsorbed);
        assert_eq!(state.drain_events(), vec![GameEvent::ShieldAbsorbed]);
        assert!(state.drain_events().is_empty());
    }
}
