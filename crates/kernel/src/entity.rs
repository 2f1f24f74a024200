use glam::Vec3;
use roamfield_common::{Aabb, Color, Shape, Transform};

use crate::config::BodyConfig;

/// A shaped, colored object placed in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub shape: Shape,
    pub transform: Transform,
    pub color: Color,
}

impl Body {
    pub fn from_config(config: &BodyConfig) -> Self {
        Self {
            shape: config.shape,
            transform: Transform::from_position(config.position),
            color: config.color,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// World-space bounding box from the current transform and shape.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_shape(&self.shape, &self.transform)
    }
}

/// The player cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub body: Body,
    pub velocity: Vec3,
}

impl Player {
    pub fn position(&self) -> Vec3 {
        self.body.transform.position
    }
}

/// The collectible. Once hidden it stays hidden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub body: Body,
    visible: bool,
}

impl Item {
    pub fn new(body: Body) -> Self {
        Self {
            body,
            visible: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hide the item. Returns `true` only on the call that actually hid it.
    pub fn collect(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }
}

/// The stationary obstacle. Its color changes on every hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub body: Body,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimConfig;

    #[test]
    fn bodies_from_default_config() {
        let c = SimConfig::default();
        let player = Body::from_config(&c.player);
        assert_eq!(player.position(), Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(player.aabb().min, Vec3::new(-0.5, 0.0, -0.5));
        let obstacle = Body::from_config(&c.obstacle);
        assert_eq!(obstacle.aabb().max, Vec3::new(-4.5, 1.0, -4.5));
    }

    #[test]
    fn item_collect_is_one_shot() {
        let mut item = Item::new(Body::from_config(&SimConfig::default().item));
        assert!(item.is_visible());
        assert!(item.collect());
        assert!(!item.is_visible());
        assert!(!item.collect());
        assert!(!item.is_visible());
    }
}
