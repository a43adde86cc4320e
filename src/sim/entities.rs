//! Gameplay entities
//!
//! Player ship, drifting hazards, projectiles and dust collectibles. Derived
//! hazard stats are a pure function of `(variant, level)`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{angle_between, direction};

/// Timed and permanent upgrade effects carried by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveUpgrades {
    /// Shield absorbs the next contact hit completely
    pub shield: bool,
    pub shield_remaining: f32,
    /// Rapid fire halves the shot cooldown
    pub rapid_fire: bool,
    pub rapid_fire_remaining: f32,
    /// Magnet pulls nearby dust toward the ship
    pub magnet: bool,
    pub magnet_remaining: f32,
    pub damage_multiplier: f32,
    pub speed_multiplier: f32,
}

impl Default for ActiveUpgrades {
    fn default() -> Self {
        Self {
            shield: false,
            shield_remaining: 0.0,
            rapid_fire: false,
            rapid_fire_remaining: 0.0,
            magnet: false,
            magnet_remaining: 0.0,
            damage_multiplier: 1.0,
            speed_multiplier: 1.0,
        }
    }
}

impl ActiveUpgrades {
    /// Count down timed effects; a flag clears when its duration runs out
    pub fn tick(&mut self, dt: f32) {
        tick_timed(&mut self.shield, &mut self.shield_remaining, dt);
        tick_timed(&mut self.rapid_fire, &mut self.rapid_fire_remaining, dt);
        tick_timed(&mut self.magnet, &mut self.magnet_remaining, dt);
    }
}

fn tick_timed(flag: &mut bool, remaining: &mut f32, dt: f32) {
    if *remaining > 0.0 {
        *remaining -= dt;
        if *remaining <= 0.0 {
            *remaining = 0.0;
            *flag = false;
        }
    }
}

/// What a contact hit did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Shield took the hit and was consumed
    Absorbed,
    Damaged,
    Killed,
}

/// A projectile fired by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub age: f32,
    pub ttl: f32,
}

impl Projectile {
    pub fn expired(&self) -> bool {
        self.age >= self.ttl
    }

    /// Outside the open canvas rectangle
    pub fn out_of_bounds(&self, size: Vec2) -> bool {
        self.pos.x <= 0.0 || self.pos.x >= size.x || self.pos.y <= 0.0 || self.pos.y >= size.y
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Steering target (mouse/touch position)
    pub target: Vec2,
    /// Facing angle, toward the target
    pub aim_angle: f32,
    pub health: f32,
    pub max_health: f32,
    pub radius: f32,
    pub upgrades: ActiveUpgrades,
    /// Seconds until the next shot is allowed
    pub shoot_timer: f32,
    /// Live projectiles, oldest first
    pub projectiles: Vec<Projectile>,
    pub alive: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            target: pos,
            aim_angle: 0.0,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            radius: PLAYER_RADIUS,
            upgrades: ActiveUpgrades::default(),
            shoot_timer: 0.0,
            projectiles: Vec::new(),
            alive: true,
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Radius used for dust pickup (twice the hull radius)
    pub fn pickup_radius(&self) -> f32 {
        self.radius * 2.0
    }

    /// Current cooldown between shots
    pub fn shot_cooldown(&self) -> f32 {
        if self.upgrades.rapid_fire && self.upgrades.rapid_fire_remaining > 0.0 {
            SHOOT_COOLDOWN / 2.0
        } else {
            SHOOT_COOLDOWN
        }
    }

    pub fn can_shoot(&self) -> bool {
        self.alive && self.shoot_timer <= 0.0
    }

    /// Fire a projectile along the aim angle if the cooldown allows it
    pub fn shoot(&mut self, id: u32) -> bool {
        if !self.can_shoot() {
            return false;
        }
        let dir = direction(self.aim_angle);
        self.projectiles.push(Projectile {
            id,
            pos: self.pos + dir * self.radius,
            vel: dir * PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
            damage: PROJECTILE_DAMAGE * self.upgrades.damage_multiplier,
            age: 0.0,
            ttl: PROJECTILE_TTL,
        });
        self.shoot_timer = self.shot_cooldown();
        true
    }

    /// Apply contact damage; an active shield absorbs it and is consumed
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.upgrades.shield {
            self.upgrades.shield = false;
            self.upgrades.shield_remaining = 0.0;
            return DamageOutcome::Absorbed;
        }

        self.health -= amount.max(0.0);
        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Restore health, capped at max
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }

    /// Re-aim toward the current target
    pub fn update_aim(&mut self) {
        self.aim_angle = angle_between(self.pos, self.target);
    }
}

/// Hazard size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardVariant {
    Small,
    Medium,
    Large,
}

impl HazardVariant {
    /// Cumulative weighted pick from a uniform draw in [0, 1)
    pub fn from_draw(draw: f32) -> Self {
        if draw < 0.6 {
            HazardVariant::Small
        } else if draw < 0.9 {
            HazardVariant::Medium
        } else {
            HazardVariant::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardVariant::Small => "small",
            HazardVariant::Medium => "medium",
            HazardVariant::Large => "large",
        }
    }
}

/// Stats derived from variant and level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardStats {
    pub radius: f32,
    pub max_health: f32,
    pub speed: f32,
    /// Damage dealt to the player on contact
    pub damage: f32,
    /// Base score; multiplied by the current level on a combat kill
    pub score_yield: u32,
    /// Dust granted and collectibles dropped on a combat kill
    pub dust_yield: u32,
}

impl HazardStats {
    pub fn for_variant(variant: HazardVariant, level: u32) -> Self {
        let level = level.max(1);
        let lvl = level as f32;
        let health_multiplier = 1.0 + (lvl - 1.0) * 0.2;

        match variant {
            HazardVariant::Small => Self {
                radius: 15.0,
                max_health: 20.0 * health_multiplier,
                speed: 100.0 + lvl * 10.0,
                damage: 10.0,
                score_yield: 10,
                dust_yield: 1,
            },
            HazardVariant::Medium => Self {
                radius: 25.0,
                max_health: 50.0 * health_multiplier,
                speed: 70.0 + lvl * 5.0,
                damage: 20.0,
                score_yield: 25,
                dust_yield: 3,
            },
            HazardVariant::Large => Self {
                radius: 40.0,
                max_health: 100.0 * health_multiplier,
                speed: 50.0 + lvl * 3.0,
                damage: 30.0,
                score_yield: 50,
                dust_yield: 5,
            },
        }
    }
}

/// A drifting hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub variant: HazardVariant,
    /// Level the hazard was spawned at
    pub level: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub health: f32,
    pub stats: HazardStats,
    /// Hit flash for the renderer
    #[serde(default)]
    pub flash_timer: f32,
}

impl Hazard {
    pub fn new(
        id: u32,
        variant: HazardVariant,
        level: u32,
        pos: Vec2,
        heading: f32,
        rotation_speed: f32,
    ) -> Self {
        let stats = HazardStats::for_variant(variant, level);
        Self {
            id,
            variant,
            level: level.max(1),
            pos,
            vel: direction(heading) * stats.speed,
            rotation: 0.0,
            rotation_speed,
            health: stats.max_health,
            stats,
            flash_timer: 0.0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.stats.radius
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Apply damage; returns true if this hit killed the hazard
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health -= amount.max(0.0);
        self.flash_timer = 0.1;
        if self.health <= 0.0 {
            self.health = 0.0;
            true
        } else {
            false
        }
    }
}

/// A dust pickup dropped by a destroyed hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub value: u32,
    pub radius: f32,
    pub age: f32,
    pub lifetime: f32,
}

impl Collectible {
    pub fn new(id: u32, pos: Vec2, value: u32) -> Self {
        Self {
            id,
            pos,
            value,
            radius: 8.0 + value as f32 * 2.0,
            age: 0.0,
            lifetime: COLLECTIBLE_LIFETIME,
        }
    }

    pub fn expired(&self) -> bool {
        self.age >= self.lifetime
    }
}
