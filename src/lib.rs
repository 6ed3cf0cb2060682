//! Pixel Invaders - deterministic core of a fixed-resolution arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity pool, formation, shots, timers)
//! - `audio`: Envelope-driven effect synthesizer, driven from the audio thread
//! - `renderer`: Palette, sprite bitmaps and the software frame buffer
//! - `settings`: Runtime configuration

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{Patch, SoundEffect, SoundSink, Synth, SynthHandle, Waveform};
pub use renderer::{FrameBuffer, Palette};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Screen width in pixels
    pub const SCREEN_W: usize = 224;
    /// Screen height in pixels
    pub const SCREEN_H: usize = 256;

    /// Sprites are 8x8 one-bit bitmaps
    pub const SPRITE_DIM: u8 = 8;
    /// Total sprite slots in the entity pool
    pub const N_SPRITES: usize = 64;

    /// Formation layout
    pub const ENEMY_ROWS: usize = 5;
    pub const ENEMY_COLS: usize = 11;
    pub const N_ENEMIES: usize = ENEMY_ROWS * ENEMY_COLS;

    /// Horizontal strafe per formation step (pixels)
    pub const FORMATION_STEP: i8 = 2;

    /// Pixels per tick for both shots
    pub const SHOT_SPEED: u8 = 4;
    /// Row the player shot launches from
    pub const PLAYER_SHOT_LAUNCH_Y: u8 = 240;

    /// Player spawn (centre bottom)
    pub const PLAYER_START_X: u8 = (SCREEN_W / 2) as u8;
    pub const PLAYER_START_Y: u8 = (SCREEN_H - SPRITE_DIM as usize) as u8;
    pub const PLAYER_COLOR: u8 = 18;
    pub const START_LIVES: u8 = 3;

    /// Horizontal hit tolerances used by both shots
    pub const SHOT_RIGHT_INSET: i16 = 3;
    pub const SHOT_LEFT_INSET: i16 = 5;

    /// Deferred action delays (ticks)
    pub const RETURN_SHOT_DELAY: u32 = 20;
    pub const EXPLOSION_TICKS: u32 = 20;
    pub const RESPAWN_TICKS: u32 = 20;

    /// Audio output rate (mono f32)
    pub const SAMPLE_RATE: u32 = 48_000;
}
