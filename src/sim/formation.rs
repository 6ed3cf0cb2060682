//! Enemy formation movement
//!
//! The formation moves as one rigid block, once every `alive_count` ticks.
//! Killing enemies shrinks the divisor, so the block speeds up on its own.

use serde::{Deserialize, Serialize};

use super::state::EntityPool;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Signed strafe per step
    #[inline]
    pub fn dx(self) -> i8 {
        match self {
            Direction::Left => -FORMATION_STEP,
            Direction::Right => FORMATION_STEP,
        }
    }
}

/// What a formation step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationMove {
    Strafe(Direction),
    /// Hit a boundary: descended one row and reversed
    Advance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    /// Enemies not yet destroyed; only ever decreases
    pub alive_count: u32,
    pub direction: Direction,
}

impl Default for Formation {
    fn default() -> Self {
        Self::new()
    }
}

impl Formation {
    pub fn new() -> Self {
        Self {
            alive_count: N_ENEMIES as u32,
            direction: Direction::Right,
        }
    }

    /// No enemies left; the formation never moves again
    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.alive_count == 0
    }

    /// Whether the formation moves on this tick
    pub fn is_due(&self, tick: u64) -> bool {
        match self.alive_count {
            0 => false,
            n => tick % u64::from(n) == 0,
        }
    }

    /// Record one destroyed enemy
    pub fn enemy_destroyed(&mut self) {
        self.alive_count = self.alive_count.saturating_sub(1);
    }

    /// Move the whole formation one step
    pub fn step(&mut self, pool: &mut EntityPool) -> FormationMove {
        let bounds = pool
            .enabled_enemies()
            .fold(None, |acc: Option<(u8, u8)>, (_, s)| match acc {
                None => Some((s.x, s.x)),
                Some((lo, hi)) => Some((lo.min(s.x), hi.max(s.x))),
            });

        let mut advance = false;
        if let Some((min_x, max_x)) = bounds {
            let right_edge = (SCREEN_W - 2 * SPRITE_DIM as usize) as u8;
            if self.direction == Direction::Right && max_x > right_edge {
                self.direction = Direction::Left;
                advance = true;
            } else if self.direction == Direction::Left && min_x < SPRITE_DIM {
                self.direction = Direction::Right;
                advance = true;
            }
        }

        let dx = self.direction.dx();
        // Disabled slots move and animate too; they are never drawn
        for enemy in pool.enemies_mut() {
            if enemy.frame.is_alien() {
                enemy.frame = enemy.frame.toggled();
            }
            if advance {
                enemy.y = enemy.y.saturating_add(SPRITE_DIM);
            } else {
                enemy.x = enemy.x.wrapping_add_signed(dx);
            }
        }

        if advance {
            log::debug!("formation advanced, now heading {:?}", self.direction);
            FormationMove::Advance
        } else {
            FormationMove::Strafe(self.direction)
        }
    }
}
