//! One-shot countdown timers for deferred game actions
//!
//! A slot with `remaining_ticks == 0` is idle. Scheduling into a busy slot
//! replaces whatever was pending there.

use serde::{Deserialize, Serialize};

/// Named timer slots, fired in declaration order within a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerSlot {
    ReturnShot = 0,
    ClearExplosions = 1,
    RestorePlayer = 2,
}

pub const N_TIMERS: usize = 3;

/// Deferred actions, dispatched by the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Enemy nearest the player fires back
    ReturnShot,
    /// Disable every enemy still showing the explosion frame
    ClearExplosions,
    /// Rebuild the player sprite at its spawn point
    RestorePlayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timer {
    pub remaining_ticks: u32,
    pub action: Option<TimerAction>,
}

impl Timer {
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.remaining_ticks == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timers {
    slots: [Timer; N_TIMERS],
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `slot` to fire `action` after `delay_ticks` calls to [`Timers::tick`]
    pub fn schedule(&mut self, slot: TimerSlot, delay_ticks: u32, action: TimerAction) {
        self.slots[slot as usize] = Timer {
            remaining_ticks: delay_ticks,
            action: Some(action),
        };
    }

    pub fn get(&self, slot: TimerSlot) -> &Timer {
        &self.slots[slot as usize]
    }

    /// Count every busy slot down by one. Returns the actions that reached
    /// zero this tick, in slot order.
    pub fn tick(&mut self) -> [Option<TimerAction>; N_TIMERS] {
        let mut fired = [None; N_TIMERS];
        for (timer, out) in self.slots.iter_mut().zip(fired.iter_mut()) {
            if timer.remaining_ticks > 0 {
                timer.remaining_ticks -= 1;
                if timer.remaining_ticks == 0 {
                    *out = timer.action;
                }
            }
        }
        fired
    }
}
