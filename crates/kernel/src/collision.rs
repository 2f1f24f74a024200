//! Item pickup and obstacle hits.
//!
//! Stateless: every tick the three boxes are rebuilt from current transforms
//! and tested fresh. The obstacle check does not latch, so a player that stays
//! overlapping is reset (and the obstacle recolored) on every such tick.

use glam::Vec3;
use roamfield_common::Color;

use crate::entity::{Item, Obstacle, Player};

/// What happened during one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionOutcome {
    /// The item went from visible to hidden this tick.
    pub item_collected: bool,
    /// The obstacle was hit; carries its new color.
    pub obstacle_hit: Option<Color>,
}

/// Test the player against the item and the obstacle and apply the effects.
///
/// `next_color` is only called when the obstacle is hit.
pub fn resolve(
    player: &mut Player,
    item: &mut Item,
    obstacle: &mut Obstacle,
    spawn: Vec3,
    next_color: impl FnOnce() -> Color,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    let player_box = player.body.aabb();
    let item_box = item.body.aabb();
    let obstacle_box = obstacle.body.aabb();

    if item.is_visible() && player_box.intersects(&item_box) {
        outcome.item_collected = item.collect();
    }

    if player_box.intersects(&obstacle_box) {
        player.body.transform.position = spawn;
        player.velocity = Vec3::ZERO;
        let color = next_color();
        obstacle.body.color = color;
        outcome.obstacle_hit = Some(color);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimConfig;
    use crate::entity::Body;

    fn scene() -> (Player, Item, Obstacle, Vec3) {
        let c = SimConfig::default();
        (
            Player {
                body: Body::from_config(&c.player),
                velocity: Vec3::ZERO,
            },
            Item::new(Body::from_config(&c.item)),
            Obstacle {
                body: Body::from_config(&c.obstacle),
            },
            c.spawn(),
        )
    }

    #[test]
    fn nothing_happens_at_spawn() {
        let (mut p, mut i, mut o, spawn) = scene();
        let out = resolve(&mut p, &mut i, &mut o, spawn, || unreachable!());
        assert_eq!(out, CollisionOutcome::default());
        assert!(i.is_visible());
    }

    #[test]
    fn touching_item_collects_it_once() {
        let (mut p, mut i, mut o, spawn) = scene();
        p.body.transform.position = Vec3::new(5.0, 0.5, 5.0);

        let first = resolve(&mut p, &mut i, &mut o, spawn, || unreachable!());
        assert!(first.item_collected);
        assert!(!i.is_visible());

        for _ in 0..5 {
            let again = resolve(&mut p, &mut i, &mut o, spawn, || unreachable!());
            assert!(!again.item_collected);
            assert!(!i.is_visible());
        }
    }

    #[test]
    fn partial_item_overlap_counts() {
        let (mut p, mut i, mut o, spawn) = scene();
        p.body.transform.position = Vec3::new(4.25, 0.5, 5.0);
        let out = resolve(&mut p, &mut i, &mut o, spawn, || unreachable!());
        assert!(out.item_collected);
    }

    #[test]
    fn obstacle_hit_resets_player_and_recolors() {
        let (mut p, mut i, mut o, spawn) = scene();
        p.body.transform.position = Vec3::new(-5.3, 0.5, -4.8);
        p.velocity = Vec3::new(-0.17, 0.0, 0.09);

        let out = resolve(&mut p, &mut i, &mut o, spawn, || Color::from_hex(0x123456));
        assert_eq!(out.obstacle_hit, Some(Color::from_hex(0x123456)));
        assert_eq!(p.position(), Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(p.velocity, Vec3::ZERO);
        assert_eq!(o.body.color, Color::from_hex(0x123456));
    }

    #[test]
    fn sustained_overlap_fires_every_tick() {
        let (mut p, mut i, mut o, _) = scene();
        // Spawn inside the obstacle so the reset keeps the overlap.
        let spawn = o.body.position();
        p.body.transform.position = spawn;
        let mut calls = 0u32;
        for k in 0..7u32 {
            let out = resolve(&mut p, &mut i, &mut o, spawn, || {
                calls += 1;
                Color::from_hex(k)
            });
            assert_eq!(out.obstacle_hit, Some(Color::from_hex(k)));
        }
        assert_eq!(calls, 7);
    }

    #[test]
    fn near_miss_does_not_hit() {
        let (mut p, mut i, mut o, spawn) = scene();
        p.body.transform.position = Vec3::new(-3.9, 0.5, -5.0);
        p.velocity = Vec3::new(-0.1, 0.0, 0.0);
        let out = resolve(&mut p, &mut i, &mut o, spawn, || unreachable!());
        assert!(out.obstacle_hit.is_none());
        assert_eq!(p.velocity, Vec3::new(-0.1, 0.0, 0.0));
    }
}
