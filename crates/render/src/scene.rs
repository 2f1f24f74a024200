use glam::{Quat, Vec3};
use roamfield_common::{Color, Shape, Transform};
use roamfield_kernel::World;

/// How a primitive is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Unlit solid color.
    Flat,
    /// Unlit edges only.
    Wireframe,
}

/// Which scene object a draw item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Tile,
    Player,
    Item,
    Obstacle,
}

/// One positioned primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub role: Role,
    pub shape: Shape,
    pub transform: Transform,
    pub color: Color,
    pub material: MaterialKind,
}

/// Everything a backend needs to draw one frame, in draw order: ground tiles
/// first, then the player, the item (while visible), and the obstacle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub tick: u64,
    items: Vec<DrawItem>,
}

impl DrawList {
    pub fn from_world(world: &World) -> Self {
        let config = world.config();
        let tiles = world.tiles();
        let mut items = Vec::with_capacity(tiles.len() + 3);

        let flat = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
        let tile_shape = Shape::Plane {
            width: tiles.tile_size(),
            height: tiles.tile_size(),
        };
        for tile in tiles.tiles() {
            items.push(DrawItem {
                role: Role::Tile,
                shape: tile_shape,
                transform: Transform::from_position(tile.center()).with_rotation(flat),
                color: config.tile_color,
                material: MaterialKind::Wireframe,
            });
        }

        let player = world.player();
        items.push(DrawItem {
            role: Role::Player,
            shape: player.body.shape,
            transform: player.body.transform,
            color: player.body.color,
            material: MaterialKind::Flat,
        });

        let item = world.item();
        if item.is_visible() {
            items.push(DrawItem {
                role: Role::Item,
                shape: item.body.shape,
                transform: item.body.transform,
                color: item.body.color,
                material: MaterialKind::Flat,
            });
        }

        let obstacle = world.obstacle();
        items.push(DrawItem {
            role: Role::Obstacle,
            shape: obstacle.body.shape,
            transform: obstacle.body.transform,
            color: obstacle.body.color,
            material: MaterialKind::Flat,
        });

        tracing::trace!(items = items.len(), "draw list built");
        Self {
            tick: world.tick(),
            items,
        }
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &DrawItem> {
        self.items.iter().filter(move |i| i.role == role)
    }

    /// Position of the first item with `role`, if drawn.
    pub fn position_of(&self, role: Role) -> Option<Vec3> {
        self.with_role(role).next().map(|i| i.transform.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roamfield_input::InputState;
    use roamfield_kernel::SimConfig;

    #[test]
    fn initial_scene_contents() {
        let world = World::new(SimConfig::default()).unwrap();
        let list = DrawList::from_world(&world);
        assert_eq!(list.len(), 12);
        assert_eq!(list.with_role(Role::Tile).count(), 9);
        assert!(
            list.with_role(Role::Tile)
                .all(|t| t.material == MaterialKind::Wireframe)
        );
        assert_eq!(
            list.position_of(Role::Player),
            Some(Vec3::new(0.0, 0.5, 0.0))
        );
        assert_eq!(
            list.position_of(Role::Item),
            Some(Vec3::new(5.0, 0.3, 5.0))
        );
        let obstacle = list.with_role(Role::Obstacle).next().unwrap();
        assert_eq!(obstacle.color, Color::from_hex(0xff0000));
    }

    #[test]
    fn tiles_are_centered_on_their_cells() {
        let world = World::new(SimConfig::default()).unwrap();
        let list = DrawList::from_world(&world);
        let centers: Vec<Vec3> = list
            .with_role(Role::Tile)
            .map(|t| t.transform.position)
            .collect();
        assert!(centers.contains(&Vec3::new(10.0, 0.0, 10.0)));
        assert!(centers.contains(&Vec3::new(-10.0, 0.0, -10.0)));
    }

    #[test]
    fn hidden_item_is_omitted() {
        let config = SimConfig {
            // Put the item right on the spawn point so the first tick collects it.
            item: roamfield_kernel::BodyConfig {
                position: Vec3::new(0.0, 0.3, 0.0),
                ..SimConfig::default().item
            },
            ..SimConfig::default()
        };
        let mut world = World::new(config).unwrap();
        world.advance(&InputState::new());
        let list = DrawList::from_world(&world);
        assert_eq!(list.tick, 1);
        assert!(list.position_of(Role::Item).is_none());
        assert_eq!(list.len(), 11);
    }

    #[test]
    fn recolored_obstacle_is_drawn_with_new_color() {
        let config = SimConfig {
            player: roamfield_kernel::BodyConfig {
                position: Vec3::new(-5.0, 0.5, -5.0),
                ..SimConfig::default().player
            },
            ..SimConfig::default()
        };
        let mut world = World::new(config).unwrap();
        let report = world.advance(&InputState::new());
        let list = DrawList::from_world(&world);
        let obstacle = list.with_role(Role::Obstacle).next().unwrap();
        assert_eq!(Some(obstacle.color), report.obstacle_hit);
    }
}
