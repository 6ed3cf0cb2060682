//! Game state and core simulation types
//!
//! The entity pool is a single contiguous array of sprites. Each index has a
//! fixed role for the lifetime of the game; only the per-sprite fields change.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::formation::Formation;
use super::timers::Timers;
use crate::consts::*;

/// Bitmap shown by a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Frame {
    #[default]
    AlienA = 0,
    AlienB = 1,
    Player = 2,
    PlayerShot = 3,
    EnemyShot = 4,
    Explosion = 5,
}

impl Frame {
    /// Index into the sprite bitmap table
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this is one of the two enemy animation frames
    #[inline]
    pub fn is_alien(self) -> bool {
        matches!(self, Frame::AlienA | Frame::AlienB)
    }

    /// Next enemy animation frame (non-alien frames are returned unchanged)
    pub fn toggled(self) -> Self {
        match self {
            Frame::AlienA => Frame::AlienB,
            Frame::AlienB => Frame::AlienA,
            other => other,
        }
    }
}

/// A single sprite record
///
/// Position, frame and color go stale when a sprite is disabled; readers must
/// check `enabled` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sprite {
    pub enabled: bool,
    pub x: u8,
    pub y: u8,
    pub frame: Frame,
    /// Palette index (0..64)
    pub color: u8,
}

/// Typed index into the entity pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(u8);

impl SpriteId {
    pub const ENEMY_SHOT: SpriteId = SpriteId(61);
    pub const PLAYER_SHOT: SpriteId = SpriteId(62);
    pub const PLAYER: SpriteId = SpriteId(63);

    /// Enemy at the given formation cell (row-major)
    pub const fn enemy(row: usize, col: usize) -> Self {
        assert!(row < ENEMY_ROWS && col < ENEMY_COLS);
        SpriteId((row * ENEMY_COLS + col) as u8)
    }

    /// Enemy by flat formation index
    pub const fn enemy_at(index: usize) -> Self {
        assert!(index < N_ENEMIES);
        SpriteId(index as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_enemy(self) -> bool {
        self.index() < N_ENEMIES
    }
}

/// Index range reserved for the enemy formation
pub const ENEMY_RANGE: Range<usize> = 0..N_ENEMIES;

/// Fixed-capacity sprite array with role-reserved index ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Sprite>", into = "Vec<Sprite>")]
pub struct EntityPool {
    sprites: [Sprite; N_SPRITES],
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityPool {
    /// All slots disabled
    pub fn new() -> Self {
        Self {
            sprites: [Sprite::default(); N_SPRITES],
        }
    }

    #[inline]
    pub fn get(&self, id: SpriteId) -> &Sprite {
        &self.sprites[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: SpriteId) -> &mut Sprite {
        &mut self.sprites[id.index()]
    }

    /// Enable a slot with the given fields
    pub fn spawn(&mut self, id: SpriteId, x: u8, y: u8, frame: Frame, color: u8) {
        self.sprites[id.index()] = Sprite {
            enabled: true,
            x,
            y,
            frame,
            color,
        };
    }

    /// Disable a slot, leaving its other fields untouched
    pub fn disable(&mut self, id: SpriteId) {
        self.sprites[id.index()].enabled = false;
    }

    /// Enabled sprites within an index range, in index order
    pub fn enabled_in(&self, range: Range<usize>) -> impl Iterator<Item = (SpriteId, &Sprite)> {
        let start = range.start;
        self.sprites[range]
            .iter()
            .enumerate()
            .filter(|(_, s)| s.enabled)
            .map(move |(i, s)| (SpriteId((start + i) as u8), s))
    }

    /// Enabled enemies in formation order
    pub fn enabled_enemies(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> {
        self.enabled_in(ENEMY_RANGE)
    }

    /// Every enemy slot, enabled or not
    pub fn enemies(&self) -> &[Sprite] {
        &self.sprites[ENEMY_RANGE]
    }

    pub fn enemies_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites[ENEMY_RANGE]
    }

    /// Whole pool in draw order
    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    #[inline]
    pub fn player(&self) -> &Sprite {
        self.get(SpriteId::PLAYER)
    }

    #[inline]
    pub fn player_shot(&self) -> &Sprite {
        self.get(SpriteId::PLAYER_SHOT)
    }

    #[inline]
    pub fn enemy_shot(&self) -> &Sprite {
        self.get(SpriteId::ENEMY_SHOT)
    }

    /// Whether the player is currently showing the explosion frame
    pub fn player_exploding(&self) -> bool {
        self.player().frame == Frame::Explosion
    }

    /// Lay out the full enemy formation
    pub fn spawn_formation(&mut self) {
        for row in 0..ENEMY_ROWS {
            for col in 0..ENEMY_COLS {
                self.spawn(
                    SpriteId::enemy(row, col),
                    16 + (col as u8) * 16,
                    64 + (row as u8) * 16,
                    Frame::AlienA,
                    21 + (row as u8) * 8,
                );
            }
        }
    }

    /// Put the player back at its spawn point
    pub fn spawn_player(&mut self) {
        self.spawn(
            SpriteId::PLAYER,
            PLAYER_START_X,
            PLAYER_START_Y,
            Frame::Player,
            PLAYER_COLOR,
        );
    }
}

impl TryFrom<Vec<Sprite>> for EntityPool {
    type Error = String;

    fn try_from(sprites: Vec<Sprite>) -> Result<Self, Self::Error> {
        let len = sprites.len();
        let sprites: [Sprite; N_SPRITES] = sprites
            .try_into()
            .map_err(|_| format!("entity pool needs {N_SPRITES} sprites, got {len}"))?;
        Ok(Self { sprites })
    }
}

impl From<EntityPool> for Vec<Sprite> {
    fn from(pool: EntityPool) -> Self {
        pool.sprites.to_vec()
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every enemy destroyed; formation halted
    WaveCleared,
    /// Out of lives, or the formation reached the player's row
    GameOver,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub pool: EntityPool,
    pub formation: Formation,
    pub timers: Timers,
    pub lives: u8,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh game: full formation, player at spawn, no shots in flight
    pub fn new() -> Self {
        let mut pool = EntityPool::new();
        pool.spawn_formation();
        pool.spawn_player();

        Self {
            pool,
            formation: Formation::new(),
            timers: Timers::new(),
            lives: START_LIVES,
            time_ticks: 0,
            phase: GamePhase::Playing,
        }
    }

    /// Advance one tick; see [`super::tick::tick`]
    pub fn step<S: crate::audio::SoundSink + ?Sized>(
        &mut self,
        input: super::tick::TickInput,
        sink: &mut S,
    ) {
        super::tick::tick(self, input, sink);
    }
}
