//! Ability charge scheduling
//!
//! Each actor has four ability slots with independent charge counts and
//! cooldowns. Multi-charge slots regenerate one charge at a time,
//! sequentially; the cooldown duration is recorded at each use so abilities
//! with variable cooldowns work correctly.

use bevy::prelude::*;

/// Number of ability slots per actor (primary/secondary/tertiary/ultimate).
pub const SLOT_COUNT: usize = 4;

#[derive(Clone, Debug)]
struct AbilitySlot {
    max_charges: u32,
    current_charges: u32,
    /// Cooldown duration recorded at the most recent use. Re-read on every
    /// regeneration restart, never assumed constant.
    cooldown_duration: f32,
    /// Greater than zero while a charge is regenerating.
    remaining_cooldown: f32,
}

/// Per-actor ability charge scheduler.
#[derive(Component, Clone)]
pub struct AbilityCharges {
    slots: [AbilitySlot; SLOT_COUNT],
}

impl AbilityCharges {
    /// Create a scheduler with the given per-slot maximum charge counts.
    /// All slots start full.
    pub fn new(max_charges: [u32; SLOT_COUNT]) -> Self {
        Self {
            slots: max_charges.map(|max| AbilitySlot {
                max_charges: max,
                current_charges: max,
                cooldown_duration: 0.0,
                remaining_cooldown: 0.0,
            }),
        }
    }

    /// Whether the slot has a charge available.
    pub fn is_ready(&self, slot: usize) -> bool {
        if !self.check_slot(slot) {
            return false;
        }
        self.slots[slot].current_charges > 0
    }

    /// Consume a charge from the slot, recording `cooldown_duration` for
    /// this use and starting the regeneration timer if none is running.
    ///
    /// Consuming a slot with no charges is a programmer error: the call is
    /// rejected and logged (fatal in debug builds) rather than corrupting
    /// the charge count. Gate on [`Self::is_ready`] first.
    pub fn try_consume(&mut self, slot: usize, cooldown_duration: f32) -> bool {
        if !self.check_slot(slot) {
            return false;
        }

        let s = &mut self.slots[slot];
        if s.current_charges == 0 {
            debug_assert!(false, "ability slot {} consumed without a charge", slot);
            error!("ability slot {} consumed without a charge", slot);
            return false;
        }

        s.current_charges -= 1;
        s.cooldown_duration = cooldown_duration;
        if s.remaining_cooldown <= 0.0 {
            s.remaining_cooldown = cooldown_duration;
        }
        true
    }

    /// Advance all regeneration timers by `dt` seconds.
    ///
    /// Leftover time carries into the next regeneration, so a single large
    /// `advance` restores as many charges as the elapsed time covers, one
    /// cooldown at a time.
    pub fn advance(&mut self, dt: f32) {
        for slot in &mut self.slots {
            if slot.current_charges >= slot.max_charges || slot.remaining_cooldown <= 0.0 {
                continue;
            }

            let mut budget = dt;
            while budget > 0.0 && slot.current_charges < slot.max_charges {
                if slot.remaining_cooldown > budget {
                    slot.remaining_cooldown -= budget;
                    budget = 0.0;
                } else {
                    budget -= slot.remaining_cooldown;
                    slot.current_charges += 1;
                    slot.remaining_cooldown = if slot.current_charges < slot.max_charges {
                        slot.cooldown_duration
                    } else {
                        0.0
                    };
                }
            }
        }
    }

    /// Normalized cooldown progress in [0, 1] for external display.
    /// 0 means the slot's charge is idle (nothing regenerating).
    pub fn cooldown_fraction(&self, slot: usize) -> f32 {
        if !self.check_slot(slot) {
            return 0.0;
        }
        let s = &self.slots[slot];
        if s.remaining_cooldown <= 0.0 || s.cooldown_duration <= 0.0 {
            return 0.0;
        }
        (s.remaining_cooldown / s.cooldown_duration).clamp(0.0, 1.0)
    }

    /// Remaining charge count for external display.
    pub fn charges(&self, slot: usize) -> u32 {
        if !self.check_slot(slot) {
            return 0;
        }
        self.slots[slot].current_charges
    }

    pub fn max_charges(&self, slot: usize) -> u32 {
        if !self.check_slot(slot) {
            return 0;
        }
        self.slots[slot].max_charges
    }

    /// An out-of-range slot index is a programmer error: fatal in debug
    /// builds, logged and ignored in release.
    fn check_slot(&self, slot: usize) -> bool {
        if slot >= SLOT_COUNT {
            debug_assert!(false, "invalid ability slot index {}", slot);
            error!("invalid ability slot index {}", slot);
            return false;
        }
        true
    }

    #[inline]
    pub fn debug_validate(&self) {
        for (i, slot) in self.slots.iter().enumerate() {
            debug_assert!(
                slot.current_charges <= slot.max_charges,
                "slot {} charges ({}) exceed max ({})",
                i,
                slot.current_charges,
                slot.max_charges
            );
        }
    }
}

impl Default for AbilityCharges {
    /// One charge per slot; characters override this when abilities have
    /// extra charges.
    fn default() -> Self {
        Self::new([1; SLOT_COUNT])
    }
}
