use glam::Vec3;
use roamfield_common::Color;
use roamfield_input::InputState;
use roamfield_tiles::TileField;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, CameraRig};
use crate::collision;
use crate::config::{ConfigError, SimConfig};
use crate::entity::{Body, Item, Obstacle, Player};
use crate::kinematics;

/// Notable things that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Simulation advanced one tick with the given seed.
    Stepped { tick: u64, seed: u64 },
    /// The player crossed into another tile and the field followed.
    TilesRecentered { tick: u64, x: i32, z: i32 },
    /// The item was picked up. Happens at most once per world.
    ItemCollected { tick: u64, position: Vec3 },
    /// The player overlapped the obstacle and was sent back to spawn.
    ObstacleHit { tick: u64, color: Color },
}

/// Summary of one [`World::advance`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub recentered: bool,
    pub item_collected: bool,
    pub obstacle_hit: Option<Color>,
}

/// The complete simulation state.
///
/// Every mutable piece of the scene lives here and is advanced only through
/// [`World::advance`]. Renderers and tools read it; they never write it.
#[derive(Debug, Clone)]
pub struct World {
    config: SimConfig,
    tick: u64,
    /// Advanced once per tick; the obstacle recolor is derived from it.
    seed: u64,
    player: Player,
    item: Item,
    obstacle: Obstacle,
    tiles: TileField,
    camera: Camera,
    rig: CameraRig,
    obstacle_hits: u64,
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Build the initial scene. The config is validated first.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let tiles = TileField::new(config.tile_size, config.tiles_per_axis)?;
        let player = Player {
            body: Body::from_config(&config.player),
            velocity: Vec3::ZERO,
        };
        let world = Self {
            tick: 0,
            seed: config.seed,
            item: Item::new(Body::from_config(&config.item)),
            obstacle: Obstacle {
                body: Body::from_config(&config.obstacle),
            },
            camera: Camera::look_at(config.camera_start, player.position()),
            rig: CameraRig::new(config.camera_offset),
            player,
            tiles,
            obstacle_hits: 0,
            event_log: Vec::new(),
            config,
        };
        tracing::debug!(
            tiles = world.tiles.len(),
            seed = world.seed,
            "world created"
        );
        Ok(world)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current simulation tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Current RNG seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn obstacle(&self) -> &Obstacle {
        &self.obstacle
    }

    pub fn tiles(&self) -> &TileField {
        &self.tiles
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Total obstacle hits since creation.
    pub fn obstacle_hits(&self) -> u64 {
        self.obstacle_hits
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Advance the simulation by one tick using a snapshot of the held keys.
    ///
    /// Order is fixed: kinematics, tile recentering, camera follow, collision.
    /// The camera therefore tracks the post-move position, and an obstacle
    /// reset shows up in the camera one tick later.
    pub fn advance(&mut self, input: &InputState) -> TickReport {
        let _span = tracing::trace_span!("world_advance", tick = self.tick + 1).entered();

        self.tick += 1;
        // The recolor for this tick derives from the advanced seed.
        self.seed = splitmix64(self.seed);
        self.event_log.push(WorldEvent::Stepped {
            tick: self.tick,
            seed: self.seed,
        });

        let (velocity, position) = kinematics::step(
            input,
            self.player.velocity,
            self.player.position(),
            self.config.acceleration,
            self.config.damping,
        );
        self.player.velocity = velocity;
        self.player.body.transform.position = position;

        let recentered = self.tiles.recenter(position);
        if recentered {
            let coord = self.tiles.center_coord();
            self.event_log.push(WorldEvent::TilesRecentered {
                tick: self.tick,
                x: coord.x,
                z: coord.z,
            });
        }

        self.rig.follow(&mut self.camera, position);

        let seed = self.seed;
        let outcome = collision::resolve(
            &mut self.player,
            &mut self.item,
            &mut self.obstacle,
            self.config.spawn(),
            || recolor(seed),
        );

        if outcome.item_collected {
            let at = self.item.body.position();
            tracing::info!(tick = self.tick, x = at.x, z = at.z, "item collected");
            self.event_log.push(WorldEvent::ItemCollected {
                tick: self.tick,
                position: at,
            });
        }
        if let Some(color) = outcome.obstacle_hit {
            self.obstacle_hits += 1;
            tracing::info!(tick = self.tick, %color, hits = self.obstacle_hits, "hit an obstacle");
            self.event_log.push(WorldEvent::ObstacleHit {
                tick: self.tick,
                color,
            });
        }

        tracing::trace!(
            x = self.player.position().x,
            z = self.player.position().z,
            speed = self.player.velocity.length(),
            "tick complete"
        );

        TickReport {
            tick: self.tick,
            recentered,
            item_collected: outcome.item_collected,
            obstacle_hit: outcome.obstacle_hit,
        }
    }

    /// Deterministic hash of the simulation state for comparing runs.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_vec = |h: &mut u64, v: Vec3| {
            for c in v.to_array() {
                mix(h, &c.to_le_bytes());
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.seed.to_le_bytes());
        mix_vec(&mut h, self.player.position());
        mix_vec(&mut h, self.player.velocity);
        mix(&mut h, &[self.item.is_visible() as u8]);
        mix(&mut h, &self.obstacle.body.color.hex().to_le_bytes());
        mix(&mut h, &self.obstacle_hits.to_le_bytes());
        for tile in self.tiles.tiles() {
            mix_vec(&mut h, tile.position);
        }
        mix_vec(&mut h, self.camera.eye);
        mix_vec(&mut h, self.camera.target);
        h
    }

    #[cfg(test)]
    pub(crate) fn place_player(&mut self, position: Vec3, velocity: Vec3) {
        self.player.body.transform.position = position;
        self.player.velocity = velocity;
    }
}

/// 24-bit color drawn from the tick's seed.
fn recolor(seed: u64) -> Color {
    Color::from_hex((splitmix64(seed ^ 0x00c0_1055) >> 40) as u32)
}

/// One step of the obstacle recolor stream. Each tick feeds the previous
/// seed back in, so equal starting seeds give equal color sequences.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
