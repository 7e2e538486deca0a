//! Combat events
//!
//! Defines the events that occur during combat for logging and processing.
//! Health and knockback changes flow through events so that the systems
//! producing them (rift explosions) never need mutable access to the
//! victim's components while iterating.

use bevy::prelude::*;

/// Event fired when an actor's health should change.
///
/// A negative amount is damage, a positive amount is healing. Damage is
/// suppressed while the target is immune; healing is not gated.
#[derive(Event)]
pub struct HealthChangeEvent {
    /// Entity causing the change
    pub source: Entity,
    /// Entity receiving the change
    pub target: Entity,
    /// Signed amount (negative = damage, positive = healing)
    pub amount: f32,
    /// Name of the ability that caused the change (for logging)
    pub ability_name: String,
}

/// Event fired when an actor should be knocked back.
///
/// The impulse replaces the target's current velocity and the target is
/// stunned for the duration with a drag coefficient applied. Ignored if the
/// target is immune.
#[derive(Event)]
pub struct KnockbackEvent {
    /// Entity receiving the knockback
    pub target: Entity,
    /// How long the knockback stun lasts (in seconds)
    pub duration: f32,
    /// Instantaneous impulse to apply (unit mass assumed)
    pub impulse: Vec2,
}
