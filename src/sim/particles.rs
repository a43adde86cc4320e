//! Decorative particle pool
//!
//! Bounded ring buffer; the oldest particle is evicted when full. Particles
//! draw from their own RNG stream and never feed back into gameplay.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{MAX_PARTICLES, PARTICLE_GRAVITY};
use crate::{direction, lerp};

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Hue in degrees for color lookup
    pub hue: f32,
    pub size: f32,
    pub age: f32,
    pub lifetime: f32,
}

impl Particle {
    /// Opacity, 1 at birth fading to 0
    pub fn alpha(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 0.0;
        }
        lerp(1.0, 0.0, (self.age / self.lifetime).clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: VecDeque<Particle>,
    capacity: usize,
    rng: Pcg32,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(MAX_PARTICLES, 0)
    }
}

impl ParticlePool {
    pub fn new(capacity: usize, seed: u64) -> Self {
        let capacity = capacity.min(MAX_PARTICLES);
        Self {
            particles: VecDeque::with_capacity(capacity),
            capacity,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Add a particle, evicting the oldest when at capacity
    pub fn push(&mut self, particle: Particle) {
        if self.capacity == 0 {
            return;
        }
        if self.particles.len() >= self.capacity {
            self.particles.pop_front();
        }
        self.particles.push_back(particle);
    }

    /// Radial burst, evenly spaced around the origin
    pub fn explosion(&mut self, pos: Vec2, count: usize, hue: Option<f32>) {
        let base_hue = hue.unwrap_or_else(|| self.rng.random_range(0.0..360.0));
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let speed: f32 = self.rng.random_range(100.0..300.0);
            let particle = Particle {
                pos,
                vel: direction(angle) * speed,
                hue: base_hue + self.rng.random_range(-30.0..30.0),
                size: self.rng.random_range(2.0..6.0),
                age: 0.0,
                lifetime: self.rng.random_range(0.5..1.5),
            };
            self.push(particle);
        }
    }

    /// Small random sparkles, used for dust pickups
    pub fn sparkles(&mut self, pos: Vec2, count: usize, hue: f32) {
        for _ in 0..count {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed: f32 = self.rng.random_range(50.0..150.0);
            let particle = Particle {
                pos,
                vel: direction(angle) * speed,
                hue,
                size: self.rng.random_range(1.0..3.0),
                age: 0.0,
                lifetime: self.rng.random_range(0.3..0.8),
            };
            self.push(particle);
        }
    }

    /// Integrate and drop expired particles
    pub fn update(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            p.vel.y += PARTICLE_GRAVITY * dt;
            p.age += dt;
        }
        self.particles.retain(|p| p.age < p.lifetime);
    }
}
