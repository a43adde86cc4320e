//! Collision detection and resolution
//!
//! Three passes run in a fixed order each tick:
//! 1. projectiles vs hazards (combat kills)
//! 2. player vs hazards (ramming)
//! 3. player vs dust (pickup)
//!
//! Entities are never removed while a pass iterates. Each pass marks ids and
//! the collections are compacted once the pass is done.

use glam::Vec2;

use super::entities::DamageOutcome;
use super::spawn::spawn_dust;
use super::state::{GameEvent, GameState};
use crate::circles_overlap;

/// Dust pickup sparkle hue
const DUST_HUE: f32 = 45.0;

/// What the collision passes produced this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Hazards destroyed by projectiles
    pub kills: u32,
    /// Hazards destroyed by ramming the player
    pub rams: u32,
    pub score_gained: u64,
    pub dust_gained: u64,
    /// A kill completed the level
    pub leveled_up: bool,
    pub player_killed: bool,
}

/// A hazard destroyed in combat, resolved after the pass
struct Kill {
    id: u32,
    pos: Vec2,
    score_yield: u32,
    dust_yield: u32,
}

/// Run all three passes in order
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    projectiles_vs_hazards(state, &mut report);
    player_vs_hazards(state, &mut report);
    player_vs_collectibles(state, &mut report);
    report
}

/// Pass 1: each projectile damages at most one hazard and is consumed
pub fn projectiles_vs_hazards(state: &mut GameState, report: &mut CollisionReport) {
    let mut spent: Vec<u32> = Vec::new();
    let mut kills: Vec<Kill> = Vec::new();

    for projectile in &state.player.projectiles {
        let target = state.hazards.iter_mut().find(|h| {
            !h.is_dead() && circles_overlap(projectile.pos, projectile.radius, h.pos, h.radius())
        });
        let Some(hazard) = target else {
            continue;
        };

        spent.push(projectile.id);
        if hazard.take_damage(projectile.damage) {
            kills.push(Kill {
                id: hazard.id,
                pos: hazard.pos,
                score_yield: hazard.stats.score_yield,
                dust_yield: hazard.stats.dust_yield,
            });
        }
    }

    if !spent.is_empty() {
        state.player.projectiles.retain(|p| !spent.contains(&p.id));
    }
    if kills.is_empty() {
        return;
    }
    state.hazards.retain(|h| !h.is_dead());

    for kill in kills {
        // Score uses the level at the moment of the kill
        let score = kill.score_yield as u64 * state.level() as u64;
        state.score += score;
        state.add_dust(kill.dust_yield as u64);
        spawn_dust(state, kill.pos, kill.dust_yield);
        state.particles.explosion(kill.pos, 15, None);
        state.push_event(GameEvent::HazardDestroyed {
            id: kill.id,
            pos: kill.pos,
            score,
        });

        report.kills += 1;
        report.score_gained += score;
        report.dust_gained += kill.dust_yield as u64;

        if state.progression.add_kill() {
            report.leveled_up = true;
            state.push_event(GameEvent::LevelUp {
                level: state.progression.level,
            });
        }
    }
}

/// Pass 2: contact damage; the hazard is destroyed with no yield
pub fn player_vs_hazards(state: &mut GameState, report: &mut CollisionReport) {
    let mut rammed: Vec<(u32, Vec2, f32, DamageOutcome)> = Vec::new();
    let player = &mut state.player;

    for hazard in &state.hazards {
        if !circles_overlap(player.pos, player.radius, hazard.pos, hazard.radius()) {
            continue;
        }
        let damage = hazard.stats.damage;
        let outcome = player.take_damage(damage);
        rammed.push((hazard.id, hazard.pos, damage, outcome));
    }

    if rammed.is_empty() {
        return;
    }
    state
        .hazards
        .retain(|h| !rammed.iter().any(|(id, ..)| *id == h.id));

    let health = state.player.health;
    for (id, pos, damage, outcome) in rammed {
        state.particles.explosion(pos, 10, None);
        state.push_event(GameEvent::HazardRammed { id, pos });
        match outcome {
            DamageOutcome::Absorbed => state.push_event(GameEvent::ShieldAbsorbed),
            DamageOutcome::Damaged => state.push_event(GameEvent::PlayerHit { damage, health }),
            DamageOutcome::Killed => {
                state.push_event(GameEvent::PlayerHit { damage, health });
                report.player_killed = true;
            }
        }
        report.rams += 1;
    }
}

/// Pass 3: dust inside the enlarged pickup radius is collected
pub fn player_vs_collectibles(state: &mut GameState, report: &mut CollisionReport) {
    let pickup_radius = state.player.pickup_radius();
    let ship = state.player.pos;

    let collected: Vec<(u32, Vec2, u32)> = state
        .collectibles
        .iter()
        .filter(|c| circles_overlap(ship, pickup_radius, c.pos, c.radius))
        .map(|c| (c.id, c.pos, c.value))
        .collect();

    if collected.is_empty() {
        return;
    }
    state
        .collectibles
        .retain(|c| !collected.iter().any(|(id, _, _)| *id == c.id));

    for (_, pos, value) in collected {
        state.add_dust(value as u64);
        state.particles.sparkles(pos, 8, DUST_HUE);
        state.push_event(GameEvent::DustCollected { value });
        report.dust_gained += value as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Collectible, Hazard, HazardVariant, Projectile};

    fn hazard_at(state: &mut GameState, variant: HazardVariant, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        let level = state.level();
        state.hazards.push(Hazard::new(id, variant, level, pos, 0.0, 0.0));
        id
    }

    fn projectile_at(state: &mut GameState, pos: Vec2, damage: f32) -> u32 {
        let id = state.next_entity_id();
        state.player.projectiles.push(Projectile {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: 4.0,
            damage,
            age: 0.0,
            ttl: 2.0,
        });
        id
    }

    fn state_with_player_away() -> GameState {
        let mut state = GameState::new(5);
        state.player.pos = Vec2::new(50.0, 50.0);
        state
    }

    #[test]
    fn test_projectile_hits_only_one_hazard() {
        let mut state = state_with_player_away();
        let spot = Vec2::new(600.0, 400.0);
        hazard_at(&mut state, HazardVariant::Large, spot);
        hazard_at(&mut state, HazardVariant::Large, spot);
        projectile_at(&mut state, spot, 10.0);

        let report = resolve_collisions(&mut state);
        assert_eq!(report.kills, 0);
        assert!(state.player.projectiles.is_empty());
        let damaged = state
            .hazards
            .iter()
            .filter(|h| h.health < h.stats.max_health)
            .count();
        assert_eq!(damaged, 1);
    }

    #[test]
    fn test_kill_awards_score_dust_and_drops() {
        let mut state = state_with_player_away();
        state.progression.level = 3;
        let spot = Vec2::new(600.0, 400.0);
        hazard_at(&mut state, HazardVariant::Medium, spot);
        projectile_at(&mut state, spot, 1000.0);

        let report = resolve_collisions(&mut state);
        assert_eq!(report.kills, 1);
        assert!(state.hazards.is_empty());
        assert_eq!(state.score, 25 * 3);
        assert_eq!(state.dust, 3);
        assert_eq!(state.collectibles.len(), 3);
        assert_eq!(state.progression.enemies_defeated, 1);
    }

    #[test]
    fn test_second_projectile_skips_dead_hazard() {
        let mut state = state_with_player_away();
        let spot = Vec2::new(600.0, 400.0);
        hazard_at(&mut state, HazardVariant::Small, spot);
        projectile_at(&mut state, spot, 1000.0);
        let survivor = projectile_at(&mut state, spot, 1000.0);

        let report = resolve_collisions(&mut state);
        assert_eq!(report.kills, 1);
        assert_eq!(state.player.projectiles.len(), 1);
        assert_eq!(state.player.projectiles[0].id, survivor);
    }

    #[test]
    fn test_adjacent_removals_do_not_skip() {
        let mut state = state_with_player_away();
        let a = Vec2::new(300.0, 300.0);
        let b = Vec2::new(600.0, 300.0);
        hazard_at(&mut state, HazardVariant::Small, a);
        hazard_at(&mut state, HazardVariant::Small, b);
        projectile_at(&mut state, a, 1000.0);
        projectile_at(&mut state, b, 1000.0);

        let report = resolve_collisions(&mut state);
        assert_eq!(report.kills, 2);
        assert!(state.hazards.is_empty());
        assert!(state.player.projectiles.is_empty());
    }

    #[test]
    fn test_shield_absorbs_ram() {
        let mut state = GameState::new(5);
        state.player.pos = Vec2::new(400.0, 300.0);
        state.player.health = 10.0;
        state.player.upgrades.shield = true;
        state.player.upgrades.shield_remaining = 10.0;
        let id = hazard_at(&mut state, HazardVariant::Large, Vec2::new(410.0, 300.0));
        assert_eq!(state.hazards[0].stats.damage, 30.0);

        let report = resolve_collisions(&mut state);
        assert_eq!(report.rams, 1);
        assert!(!report.player_killed);
        assert_eq!(state.player.health, 10.0);
        assert!(!state.player.upgrades.shield);
        assert!(state.hazards.iter().all(|h| h.id != id));
        // Ramming gives nothing
        assert_eq!(state.score, 0);
        assert_eq!(state.dust, 0);
        assert!(state.collectibles.is_empty());
    }

    #[test]
    fn test_ram_kills_unshielded_player() {
        let mut state = GameState::new(5);
        state.player.pos = Vec2::new(400.0, 300.0);
        state.player.health = 10.0;
        hazard_at(&mut state, HazardVariant::Small, Vec2::new(400.0, 300.0));

        let report = resolve_collisions(&mut state);
        assert!(report.player_killed);
        assert_eq!(state.player.health, 0.0);
        assert!(!state.player.is_alive());
    }

    #[test]
    fn test_pickup_uses_double_radius() {
        let mut state = GameState::new(5);
        state.player.pos = Vec2::new(400.0, 300.0);
        // 45 units away: outside hull + dust radius (20 + 10), inside pickup (40 + 10)
        state.collectibles.push(Collectible::new(90, Vec2::new(445.0, 300.0), 1));
        state.collectibles.push(Collectible::new(91, Vec2::new(700.0, 300.0), 1));

        let report = resolve_collisions(&mut state);
        assert_eq!(report.dust_gained, 1);
        assert_eq!(state.dust, 1);
        assert_eq!(state.collectibles.len(), 1);
        assert_eq!(state.collectibles[0].id, 91);
    }

    #[test]
    fn test_twentieth_kill_signals_level_up() {
        let mut state = state_with_player_away();
        state.progression.enemies_defeated = 19;
        let spot = Vec2::new(600.0, 400.0);
        hazard_at(&mut state, HazardVariant::Small, spot);
        projectile_at(&mut state, spot, 1000.0);

        let report = resolve_collisions(&mut state);
        assert!(report.leveled_up);
        assert_eq!(state.progression.level, 2);
        assert_eq!(state.progression.enemies_defeated, 0);
        assert_eq!(state.progression.enemies_required, 30);
        assert!(state.events.contains(&GameEvent::LevelUp { level: 2 }));
    }
}
