//! Click-to-move movement
//!
//! An actor walks toward its move target and snaps to a stop within a small
//! distance of it. Stuns freeze the movement decision entirely; whatever
//! velocity a knockback or dash set stays untouched until the stun clears.

use bevy::prelude::*;

/// At this distance from the move target, the actor stops moving.
pub const MOVE_SNAP_DISTANCE: f32 = 0.03;

/// Base movement speed in world units per second, before the status
/// multiplier is applied.
#[derive(Component, Clone)]
pub struct Movement {
    pub base_speed: f32,
}

/// Where the actor is walking to. Reset to the actor's own position when a
/// stun or knockback expires.
#[derive(Component, Clone, Copy)]
pub struct MoveTarget(pub Vec2);

/// Velocity decided by the simulation and integrated each tick.
/// The physics solver itself is out of scope; integration here is a plain
/// Euler step with linear drag.
#[derive(Component, Clone, Copy, Default)]
pub struct Velocity(pub Vec2);

/// Pure movement decision: the velocity an unstunned actor should have given
/// its position, target, base speed, and speed multiplier.
pub fn desired_velocity(position: Vec2, target: Vec2, base_speed: f32, multiplier: f32) -> Vec2 {
    if position.distance(target) < MOVE_SNAP_DISTANCE {
        return Vec2::ZERO;
    }
    base_speed * multiplier * (target - position).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_within_snap_distance() {
        let velocity = desired_velocity(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.02), 2.5, 1.0);
        assert_eq!(velocity, Vec2::ZERO);
    }

    #[test]
    fn moves_toward_target_at_scaled_speed() {
        let velocity = desired_velocity(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.5, 0.8);
        assert!((velocity.x - 2.0).abs() < 1e-5);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn negative_multiplier_reverses_direction() {
        // The multiplier is unclamped; heavy slows walk the actor backwards
        let velocity = desired_velocity(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.5, -0.5);
        assert!(velocity.x < 0.0);
    }
}
