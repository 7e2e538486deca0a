//! Status effects
//!
//! Tracks stun, knockback, immunity, and the move-speed multiplier for one
//! actor. Each effect has at most one live timer; re-applying an effect
//! replaces the running instance (last-writer-wins, durations never stack).
//! Immunity and stun are independent state machines that interact only
//! through the apply-gate.

use bevy::prelude::*;

use super::health::Health;

/// Drag coefficient applied while a knockback is in flight.
pub const KNOCKBACK_DRAG: f32 = 10.0;

/// Which effects expired during an [`StatusEffects::advance`] call.
/// The status tick system applies the cross-component consequences
/// (halting movement, restoring the health indicator).
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusExpirations {
    pub stun: bool,
    pub knockback: bool,
    pub immunity: bool,
}

/// Stun/knockback/immunity/move-speed state for one actor.
#[derive(Component, Clone)]
pub struct StatusEffects {
    stunned: bool,
    immune: bool,
    /// Multiplier applied to base movement speed. Deliberately unclamped:
    /// repeated penalties can drive it negative (see DESIGN.md).
    move_speed_multiplier: f32,
    /// Linear drag coefficient, nonzero only during knockback.
    drag: f32,
    stun_timer: Option<f32>,
    knockback_timer: Option<f32>,
    immunity_timer: Option<f32>,
}

impl Default for StatusEffects {
    fn default() -> Self {
        Self {
            stunned: false,
            immune: false,
            move_speed_multiplier: 1.0,
            drag: 0.0,
            stun_timer: None,
            knockback_timer: None,
            immunity_timer: None,
        }
    }
}

impl StatusEffects {
    pub fn is_stunned(&self) -> bool {
        self.stunned
    }

    pub fn is_immune(&self) -> bool {
        self.immune
    }

    pub fn move_speed_multiplier(&self) -> f32 {
        self.move_speed_multiplier
    }

    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Stun the actor for `duration` seconds. Returns false (no-op) when the
    /// actor is immune and the stun does not bypass immunity. The caller is
    /// responsible for zeroing the actor's velocity when this returns true.
    pub fn apply_stun(&mut self, duration: f32, bypass_immunity: bool) -> bool {
        if self.immune && !bypass_immunity {
            return false;
        }
        self.stunned = true;
        self.stun_timer = Some(duration);
        true
    }

    /// Knock the actor back: stunned for `duration` with drag applied.
    /// Always gated by immunity (there is no self-inflicted knockback).
    /// The caller applies the impulse to the actor's velocity when this
    /// returns true.
    pub fn apply_knockback(&mut self, duration: f32) -> bool {
        if self.immune {
            return false;
        }
        self.stunned = true;
        self.drag = KNOCKBACK_DRAG;
        self.knockback_timer = Some(duration);
        true
    }

    /// Adjust the move-speed multiplier, or reset it to 1 when `reset` is
    /// set. No-op while immune unless bypassing.
    pub fn change_move_speed(&mut self, delta: f32, reset: bool, bypass_immunity: bool) {
        if self.immune && !bypass_immunity {
            return;
        }
        if reset {
            self.move_speed_multiplier = 1.0;
        } else {
            self.move_speed_multiplier += delta;
        }
    }

    fn immunity_active(&self) -> bool {
        self.immune
    }

    /// Advance all effect timers by `dt`, returning which effects expired
    /// this tick. Stun and knockback expiry each clear the stunned flag;
    /// knockback expiry also restores drag to zero; immunity expiry clears
    /// the immune flag. Cross-component consequences (velocity, move target,
    /// health indicator) are applied by the caller.
    pub fn advance(&mut self, dt: f32) -> StatusExpirations {
        let mut expired = StatusExpirations::default();

        if tick_timer(&mut self.stun_timer, dt) {
            self.stunned = false;
            expired.stun = true;
        }
        if tick_timer(&mut self.knockback_timer, dt) {
            self.stunned = false;
            self.drag = 0.0;
            expired.knockback = true;
        }
        if tick_timer(&mut self.immunity_timer, dt) {
            self.immune = false;
            expired.immunity = true;
        }

        expired
    }
}

fn tick_timer(timer: &mut Option<f32>, dt: f32) -> bool {
    if let Some(remaining) = timer {
        *remaining -= dt;
        if *remaining <= 0.0 {
            *timer = None;
            return true;
        }
    }
    false
}

/// Grant immunity for `duration` seconds, hiding the health indicator for
/// the duration. Re-applying replaces any running immunity timer.
pub fn grant_immunity(status: &mut StatusEffects, health: &mut Health, duration: f32) {
    status.immune = true;
    status.immunity_timer = Some(duration);
    health.set_indicator_visible(false);
}

/// End immunity immediately, running the same expiry path a natural timeout
/// would (the health indicator resumes for living actors). A no-op when no
/// immunity is active. Returns whether anything changed.
pub fn end_immunity(status: &mut StatusEffects, health: &mut Health) -> bool {
    if !status.immunity_active() {
        return false;
    }
    status.immune = false;
    status.immunity_timer = None;
    if health.is_alive() {
        health.set_indicator_visible(true);
    }
    true
}
