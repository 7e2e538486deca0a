//! Rift entities
//!
//! A rift is an oriented line segment the Hive places in the arena. Its two
//! endpoints anchor the dash ability and its center is the origin of the
//! detonation explosion. Rifts hold a non-owning back-reference to their
//! owner for damage attribution; the owning Hive tracks them in its active
//! list.

use bevy::prelude::*;
use smallvec::SmallVec;

/// A rift placed in the arena by a Hive.
#[derive(Component)]
pub struct Rift {
    /// The Hive that spawned this rift. Back-reference only, not ownership.
    pub owner: Entity,
    /// Length along the facing axis
    pub length: f32,
    /// Half-width of each endpoint, used for dash range checks
    pub endpoint_half_width: f32,
    /// Set when ability 3's fuse expires; the rift is inert afterwards
    pub exploded: bool,
    /// Actors already hit during this rift's explosion window, so each rift
    /// damages an actor at most once
    pub hit_actors: SmallVec<[Entity; 4]>,
}

impl Rift {
    pub fn new(owner: Entity, length: f32, width: f32) -> Self {
        Self {
            owner,
            length,
            endpoint_half_width: width / 2.0,
            exploded: false,
            hit_actors: SmallVec::new(),
        }
    }

    /// The rift's two endpoint positions, derived from its transform.
    /// The rift's local +Y axis is its facing direction.
    pub fn endpoints(&self, transform: &Transform) -> [Vec2; 2] {
        let center = transform.translation.truncate();
        let facing = (transform.rotation * Vec3::Y).truncate();
        let half = facing * (self.length / 2.0);
        [center + half, center - half]
    }
}

/// Build the transform for a rift spawned from `origin` toward `direction`:
/// offset by half its length along the direction and rotated to face it.
pub fn rift_transform(origin: Vec2, direction: Vec2, length: f32) -> Transform {
    let position = origin + direction * (length / 2.0);
    Transform::from_translation(position.extend(0.0))
        .with_rotation(Quat::from_rotation_arc_2d(Vec2::Y, direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_straddle_the_center() {
        let rift = Rift::new(Entity::from_raw(1), 2.0, 0.5);
        let transform = rift_transform(Vec2::ZERO, Vec2::X, 2.0);

        // Center is one half-length along +X from the origin
        assert!(transform.translation.truncate().distance(Vec2::new(1.0, 0.0)) < 1e-5);

        let [a, b] = rift.endpoints(&transform);
        assert!(a.distance(Vec2::new(2.0, 0.0)) < 1e-5);
        assert!(b.distance(Vec2::ZERO) < 1e-5);
    }

    #[test]
    fn endpoints_follow_orientation() {
        let rift = Rift::new(Entity::from_raw(1), 4.0, 0.5);
        let direction = Vec2::new(0.0, 1.0);
        let transform = rift_transform(Vec2::new(1.0, 1.0), direction, 4.0);

        let [a, b] = rift.endpoints(&transform);
        assert!(a.distance(Vec2::new(1.0, 5.0)) < 1e-5);
        assert!(b.distance(Vec2::new(1.0, 1.0)) < 1e-5);
    }
}
