//! Held keys → velocity → position, once per tick.
//!
//! Forward is −Z and right is +X. Integration is explicit Euler with an
//! implicit unit time step, followed by multiplicative damping. There is no
//! rest threshold: an idle player keeps drifting by ever smaller amounts.

use glam::Vec3;
use roamfield_input::{Direction, InputState};

/// Velocity change contributed by the held keys this tick.
/// Opposite keys held together cancel out.
pub fn impulse(input: &InputState, accel: f32) -> Vec3 {
    let mut dv = Vec3::ZERO;
    if input.is_held(Direction::Forward) {
        dv.z -= accel;
    }
    if input.is_held(Direction::Backward) {
        dv.z += accel;
    }
    if input.is_held(Direction::Left) {
        dv.x -= accel;
    }
    if input.is_held(Direction::Right) {
        dv.x += accel;
    }
    dv
}

/// Advance one tick. Returns `(velocity, position)`.
///
/// Order: accumulate impulse, move by the new velocity, then damp.
pub fn step(
    input: &InputState,
    velocity: Vec3,
    position: Vec3,
    accel: f32,
    damping: f32,
) -> (Vec3, Vec3) {
    let velocity = velocity + impulse(input, accel);
    let position = position + velocity;
    (velocity * damping, position)
}
