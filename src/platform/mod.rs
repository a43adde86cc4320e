//! Platform abstraction layer
//!
//! Handles the host side of the game loop:
//! - Frame timing (fixed-step accumulator)
//! - One-shot input latching
//! - Handing a read-only snapshot to the renderer each frame

use crate::consts::{MAX_DT, MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;
use crate::sim::{GameState, Snapshot, TickInput, tick};

/// Presentation collaborator; sees state only through a snapshot
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot);
}

/// Renderer that logs a one-line HUD every `every` frames
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub every: u64,
    frames: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self { every, frames: 0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &Snapshot) {
        self.frames += 1;
        if self.every == 0 || self.frames % self.every != 0 {
            return;
        }
        log::debug!(
            "[{}] {} | level {} ({:.0}%) | score {} | dust {} | hp {:.0}% | hazards {} | particles {}",
            snapshot.phase,
            snapshot.biome.name,
            snapshot.level,
            snapshot.progress * 100.0,
            snapshot.score,
            snapshot.dust,
            snapshot.health_fraction() * 100.0,
            snapshot.hazards.len(),
            snapshot.particles.len()
        );
    }
}

/// Fixed-step frame driver
#[derive(Debug)]
pub struct FrameDriver {
    pub state: GameState,
    pub input: TickInput,
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl FrameDriver {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            input: TickInput::default(),
            accumulator: 0.0,
            step: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    pub fn from_settings(state: GameState, settings: &Settings) -> Self {
        Self {
            step: settings.step_dt(),
            max_substeps: settings.max_substeps.max(1),
            ..Self::new(state)
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Request a pause toggle on the next substep
    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    /// Run simulation ticks for one frame; returns the substeps taken
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            let input = self.input.clone();
            tick(&mut self.state, &input, self.step);
            self.accumulator -= self.step;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.pause = false;
        }

        // Drop time we could not catch up on
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        substeps
    }

    /// Advance one frame and render it
    pub fn frame(&mut self, dt: f32, renderer: &mut dyn Renderer) -> u32 {
        let substeps = self.update(dt);
        renderer.render(&self.state.snapshot());
        substeps
    }

    /// Replace the running state (restart from the host side)
    pub fn reset(&mut self, state: GameState) {
        self.state = state;
        self.accumulator = 0.0;
        self.input = TickInput::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    #[derive(Default)]
    struct CountingRenderer {
        frames: u32,
        last_phase: Option<GamePhase>,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, snapshot: &Snapshot) {
            self.frames += 1;
            self.last_phase = Some(snapshot.phase);
        }
    }

    fn driver() -> FrameDriver {
        let mut state = GameState::new(5);
        state.start().unwrap();
        FrameDriver::new(state)
    }

    #[test]
    fn test_accumulator_substeps() {
        let mut driver = driver();
        assert_eq!(driver.update(SIM_DT * 0.5), 0);
        assert_eq!(driver.update(SIM_DT * 0.6), 1);
        assert_eq!(driver.state.time_ticks, 1);
    }

    #[test]
    fn test_frame_dt_capped() {
        let mut driver = driver();
        // A 1 s stall is capped to 0.1 s, i.e. 6 steps at 60 Hz
        let steps = driver.update(1.0);
        assert!(steps <= 6);
        assert!(steps >= 5);
    }

    #[test]
    fn test_substeps_limited() {
        let mut state = GameState::new(5);
        state.start().unwrap();
        let settings = Settings {
            step_rate: 240,
            max_substeps: 8,
            ..Settings::default()
        };
        let mut driver = FrameDriver::from_settings(state, &settings);
        assert_eq!(driver.update(0.1), 8);
    }

    #[test]
    fn test_pause_is_one_shot() {
        let mut driver = driver();
        driver.toggle_pause();
        driver.update(SIM_DT * 3.0);
        assert_eq!(driver.state.phase, GamePhase::Paused);
        assert!(!driver.input.pause);
    }

    #[test]
    fn test_frame_renders_once() {
        let mut driver = driver();
        let mut renderer = CountingRenderer::default();
        driver.frame(SIM_DT, &mut renderer);
        driver.frame(SIM_DT, &mut renderer);
        assert_eq!(renderer.frames, 2);
        assert_eq!(renderer.last_phase, Some(GamePhase::Playing));
    }

    #[test]
    fn test_log_renderer_counts_frames() {
        let mut driver = driver();
        let mut renderer = LogRenderer::new(2);
        for _ in 0..3 {
            driver.frame(SIM_DT, &mut renderer);
        }
        assert_eq!(renderer.frames(), 3);
    }
}
