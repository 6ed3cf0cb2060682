//! 8x8 one-bit sprite bitmaps, most significant bit leftmost

use crate::sim::Frame;

pub type Bitmap = [u8; 8];

const ALIEN_A: Bitmap = [
    0b00100100, 0b00011000, 0b00111100, 0b01011010, 0b11111111, 0b10111101, 0b10100101,
    0b00100100,
];

const ALIEN_B: Bitmap = [
    0b00100100, 0b10011001, 0b10111101, 0b11011011, 0b01111110, 0b00111100, 0b01000010,
    0b10000001,
];

const PLAYER: Bitmap = [
    0b00011000, 0b00011000, 0b00111100, 0b00111100, 0b01111110, 0b01111110, 0b11111111,
    0b11111111,
];

const PLAYER_SHOT: Bitmap = [0b00011000; 8];

const ENEMY_SHOT: Bitmap = [
    0b00010000, 0b00001000, 0b00010000, 0b00001000, 0b00010000, 0b00001000, 0b00010000,
    0b00001000,
];

const EXPLOSION: Bitmap = [
    0b01000010, 0b00100100, 0b10000001, 0b01000010, 0b01000010, 0b10000001, 0b00100100,
    0b01000010,
];

/// Indexed by [`Frame::index`]
pub const SPRITE_DATA: [Bitmap; 6] = [ALIEN_A, ALIEN_B, PLAYER, PLAYER_SHOT, ENEMY_SHOT, EXPLOSION];

#[inline]
pub fn bitmap(frame: Frame) -> &'static Bitmap {
    &SPRITE_DATA[frame.index()]
}

/// Set pixels of a bitmap as (dx, dy) offsets
pub fn set_pixels(bitmap: &Bitmap) -> impl Iterator<Item = (usize, usize)> + '_ {
    bitmap.iter().enumerate().flat_map(|(dy, &row)| {
        (0..8usize)
            .filter(move |&dx| row & (0x80u8 >> dx) != 0)
            .map(move |dx| (dx, dy))
    })
}
