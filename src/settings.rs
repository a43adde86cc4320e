//! Game settings and preferences
//!
//! Persisted as JSON next to the personal best file.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, MAX_PARTICLES, MAX_SUBSTEPS, SIM_DT};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 250,
            QualityPreset::Medium => 500,
            QualityPreset::High => MAX_PARTICLES,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (explosions, sparkles)
    pub particles: bool,

    // === Canvas ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Simulation ===
    /// Fixed run seed; a fresh one is picked when absent
    pub seed: Option<u64>,
    /// Fixed steps per second
    pub step_rate: u32,
    /// Maximum substeps per rendered frame
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            particles: true,

            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            seed: None,
            step_rate: (1.0 / SIM_DT).round() as u32,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Settings {
    /// Apply a quality preset named on the command line. Unknown names
    /// leave the loaded preset in place.
    pub fn override_quality(&mut self, name: &str) -> bool {
        match QualityPreset::from_str(name) {
            Some(preset) => {
                log::info!("Quality preset overridden: {}", preset.as_str());
                self.quality = preset;
                true
            }
            None => {
                log::warn!("Unknown quality preset '{}', keeping {}", name, self.quality.as_str());
                false
            }
        }
    }

    /// Canvas size, falling back to the default for degenerate values
    pub fn canvas_size(&self) -> Vec2 {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(self.canvas_width) && valid(self.canvas_height) {
            Vec2::new(self.canvas_width, self.canvas_height)
        } else {
            Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT)
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Fixed timestep in seconds
    pub fn step_dt(&self) -> f32 {
        if self.step_rate == 0 {
            SIM_DT
        } else {
            1.0 / self.step_rate as f32
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(err) => log::warn!("Ignoring invalid settings {}: {}", path.display(), err),
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => log::warn!("Could not read settings {}: {}", path.display(), err),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), crate::persistence::PersistenceError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
