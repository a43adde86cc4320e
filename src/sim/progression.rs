//! Level progression, biomes and difficulty
//!
//! Kills advance a per-level counter; reaching the requirement levels up and
//! asks the state machine to open the shop.

use serde::{Deserialize, Serialize};

use crate::consts::{INITIAL_SPAWN_INTERVAL, MIN_SPAWN_INTERVAL};

/// Kills needed to clear level 1
pub const INITIAL_ENEMIES_REQUIRED: u32 = 20;
/// Levels spent in each biome before the theme changes
pub const LEVELS_PER_BIOME: u32 = 3;

/// Cosmetic visual theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Biome {
    pub name: &'static str,
    pub primary_hue: u16,
    pub secondary_hue: u16,
}

pub const BIOMES: [Biome; 6] = [
    Biome { name: "Blue Nebula", primary_hue: 220, secondary_hue: 260 },
    Biome { name: "Purple Zone", primary_hue: 280, secondary_hue: 320 },
    Biome { name: "Emerald Sector", primary_hue: 140, secondary_hue: 180 },
    Biome { name: "Amber Rift", primary_hue: 30, secondary_hue: 60 },
    Biome { name: "Crimson Abyss", primary_hue: 0, secondary_hue: 20 },
    Biome { name: "Cosmic Void", primary_hue: 240, secondary_hue: 280 },
];

/// Kills required to clear `level` once it has been reached by leveling up
pub fn enemies_required_for(level: u32) -> u32 {
    level.saturating_mul(5).saturating_add(20)
}

/// Biome index for a level
pub fn biome_index_for(level: u32) -> usize {
    ((level.max(1) - 1) / LEVELS_PER_BIOME) as usize % BIOMES.len()
}

/// Hazard spawn interval for a level, never below the floor
pub fn spawn_interval_for(level: u32) -> f32 {
    let interval = INITIAL_SPAWN_INTERVAL - level as f32 * 0.1;
    if interval.is_finite() {
        interval.max(MIN_SPAWN_INTERVAL)
    } else {
        MIN_SPAWN_INTERVAL
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub enemies_defeated: u32,
    pub enemies_required: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            enemies_defeated: 0,
            enemies_required: INITIAL_ENEMIES_REQUIRED,
        }
    }
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a combat kill. Returns true when it caused a level-up.
    pub fn add_kill(&mut self) -> bool {
        self.enemies_defeated += 1;
        if self.enemies_defeated >= self.enemies_required {
            self.level_up();
            return true;
        }
        false
    }

    pub fn level_up(&mut self) {
        self.level += 1;
        self.enemies_defeated = 0;
        self.enemies_required = enemies_required_for(self.level);
        log::info!(
            "Level up -> {} ({} kills required, biome {})",
            self.level,
            self.enemies_required,
            self.biome().name
        );
    }

    pub fn biome_index(&self) -> usize {
        biome_index_for(self.level)
    }

    pub fn biome(&self) -> &'static Biome {
        &BIOMES[self.biome_index()]
    }

    /// Scaling factor for damage/health tuning outside the core loop
    pub fn difficulty_multiplier(&self) -> f32 {
        1.0 + (self.level.max(1) - 1) as f32 * 0.15
    }

    /// Fraction of the current level cleared, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.enemies_required == 0 {
            return 1.0;
        }
        (self.enemies_defeated as f32 / self.enemies_required as f32).min(1.0)
    }

    pub fn spawn_interval(&self) -> f32 {
        spawn_interval_for(self.level)
    }
}
