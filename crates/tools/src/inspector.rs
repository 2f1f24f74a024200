use glam::Vec3;
use roamfield_common::Color;
use roamfield_kernel::World;
use serde::Serialize;

/// Scene inspector for developer tooling.
///
/// Provides read-only queries against the world for the desktop HUD and the
/// CLI.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> SceneSummary {
        let player = world.player();
        let center = world.tiles().center_coord();
        SceneSummary {
            tick: world.tick(),
            seed: world.seed(),
            player_position: player.position(),
            player_speed: player.velocity.length(),
            tile: (center.x, center.z),
            tile_count: world.tiles().len(),
            item_visible: world.item().is_visible(),
            obstacle_color: world.obstacle().body.color,
            obstacle_hits: world.obstacle_hits(),
            pending_events: world.events().len(),
            state_hash: world.state_hash(),
        }
    }
}

/// Summary of the scene for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub tick: u64,
    pub seed: u64,
    pub player_position: Vec3,
    pub player_speed: f32,
    /// Tile coordinate the ground field is centered on.
    pub tile: (i32, i32),
    pub tile_count: usize,
    pub item_visible: bool,
    pub obstacle_color: Color,
    pub obstacle_hits: u64,
    pub pending_events: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.player_position;
        write!(
            f,
            "Scene: tick={} player=({:.2}, {:.2}, {:.2}) speed={:.4} tile=({}, {}) item={} obstacle={} hits={}",
            self.tick,
            p.x,
            p.y,
            p.z,
            self.player_speed,
            self.tile.0,
            self.tile.1,
            if self.item_visible { "visible" } else { "collected" },
            self.obstacle_color,
            self.obstacle_hits,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roamfield_input::{Direction, InputState};
    use roamfield_kernel::SimConfig;

    #[test]
    fn summary_fresh_world() {
        let world = World::new(SimConfig::default()).unwrap();
        let summary = SceneInspector::summary(&world);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.tile, (0, 0));
        assert_eq!(summary.tile_count, 9);
        assert!(summary.item_visible);
        assert_eq!(summary.obstacle_hits, 0);
        assert_eq!(summary.pending_events, 0);
    }

    #[test]
    fn summary_after_movement() {
        let mut world = World::new(SimConfig::default()).unwrap();
        let mut input = InputState::new();
        input.set_held(Direction::Backward, true);
        for _ in 0..3 {
            world.advance(&input);
        }
        let summary = SceneInspector::summary(&world);
        assert_eq!(summary.tick, 3);
        assert!(summary.player_position.z > 0.0);
        assert!(summary.player_speed > 0.0);
        assert_eq!(summary.pending_events, 3);
        assert_eq!(summary.state_hash, world.state_hash());
    }

    #[test]
    fn summary_display() {
        let world = World::new(SimConfig::default()).unwrap();
        let s = SceneInspector::summary(&world).to_string();
        assert!(s.contains("tick=0"));
        assert!(s.contains("item=visible"));
        assert!(s.contains("obstacle=#ff0000"));
    }
}
