//! Health tracking
//!
//! Damage and healing share one entry point gated only on sign and the
//! caller-supplied immunity flag. Death is signalled exactly once.

use bevy::prelude::*;

/// Result of applying a health change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthChange {
    /// The change was applied. `died` is true only for the change that
    /// brought health to zero.
    Applied { died: bool },
    /// A damaging change was suppressed because the actor is immune.
    SuppressedByImmunity,
}

/// Current and maximum health for one actor.
#[derive(Component, Clone)]
pub struct Health {
    current: f32,
    max: f32,
    /// Whether the health indicator should be shown (hidden while immune or
    /// dead). Display-only; nothing in the simulation reads it back.
    indicator_visible: bool,
    death_signalled: bool,
}

impl Health {
    pub fn new(max: f32) -> Self {
        debug_assert!(max > 0.0, "max health must be positive, got {}", max);
        Self {
            current: max,
            max,
            indicator_visible: true,
            death_signalled: false,
        }
    }

    /// Apply a signed health change. Negative amounts are damage and are
    /// suppressed while `immune` is set; positive amounts heal regardless.
    pub fn change(&mut self, amount: f32, immune: bool) -> HealthChange {
        if amount < 0.0 && immune {
            return HealthChange::SuppressedByImmunity;
        }

        self.current = (self.current + amount).clamp(0.0, self.max);

        if self.current == 0.0 && !self.death_signalled {
            self.death_signalled = true;
            self.indicator_visible = false;
            return HealthChange::Applied { died: true };
        }

        HealthChange::Applied { died: false }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Health fraction in [0, 1] for external display.
    pub fn fraction(&self) -> f32 {
        self.current / self.max
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn indicator_visible(&self) -> bool {
        self.indicator_visible
    }

    pub fn set_indicator_visible(&mut self, visible: bool) {
        self.indicator_visible = visible;
    }

    /// Validate that health invariants hold.
    ///
    /// In debug builds, this panics on invariant violations.
    /// In release builds, this is a no-op.
    #[inline]
    pub fn debug_validate(&self) {
        debug_assert!(
            self.current >= 0.0,
            "health cannot be negative: {}",
            self.current
        );
        debug_assert!(
            self.current <= self.max,
            "health ({}) cannot exceed max ({})",
            self.current,
            self.max
        );
    }
}
