//! CPU frame buffer the sprite pass draws into

use super::palette::Palette;
use super::sprites::{bitmap, set_pixels};
use crate::consts::{SCREEN_H, SCREEN_W};
use crate::sim::EntityPool;

/// One ARGB8888 word per screen pixel, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<u32>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const WIDTH: usize = SCREEN_W;
    pub const HEIGHT: usize = SCREEN_H;

    pub fn new() -> Self {
        Self {
            pixels: vec![0; Self::WIDTH * Self::HEIGHT],
        }
    }

    /// Reset every pixel to transparent black
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Paint every enabled sprite in pool order; later sprites win on overlap.
    /// Pixels falling outside the screen are dropped.
    pub fn draw(&mut self, pool: &EntityPool, palette: &Palette) {
        for sprite in pool.iter().filter(|s| s.enabled) {
            let color = palette.argb(sprite.color);
            for (dx, dy) in set_pixels(bitmap(sprite.frame)) {
                let x = usize::from(sprite.x) + dx;
                let y = usize::from(sprite.y) + dy;
                if x < Self::WIDTH && y < Self::HEIGHT {
                    self.pixels[y * Self::WIDTH + x] = color;
                }
            }
        }
    }

    /// Clear and draw in one go
    pub fn render(&mut self, pool: &EntityPool, palette: &Palette) {
        self.clear();
        self.draw(pool, palette);
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < Self::WIDTH && y < Self::HEIGHT).then(|| self.pixels[y * Self::WIDTH + x])
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw bytes for texture upload (native endianness, pitch = WIDTH * 4)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Count of non-black pixels
    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_COLOR;
    use crate::sim::{Frame, GameState, SpriteId};

    #[test]
    fn test_draw_player_sprite() {
        let mut pool = EntityPool::new();
        pool.spawn_player();
        let palette = Palette::new();
        let mut fb = FrameBuffer::new();
        fb.render(&pool, &palette);

        let color = palette.argb(PLAYER_COLOR);
        // Top row of the player bitmap is 0b00011000
        assert_eq!(fb.pixel(112 + 3, 248), Some(color));
        assert_eq!(fb.pixel(112 + 4, 248), Some(color));
        assert_eq!(fb.pixel(112 + 2, 248), Some(0));
        // Bottom row is solid
        assert!((0..8).all(|dx| fb.pixel(112 + dx, 255) == Some(color)));
        assert_eq!(fb.lit_pixels(), 40);
    }

    #[test]
    fn test_disabled_sprites_not_drawn() {
        let mut state = GameState::new();
        let palette = Palette::new();
        let mut fb = FrameBuffer::new();
        fb.render(&state.pool, &palette);
        let full = fb.lit_pixels();

        state.pool.disable(SpriteId::PLAYER);
        fb.render(&state.pool, &palette);
        assert_eq!(fb.lit_pixels(), full - 40);
    }

    #[test]
    fn test_offscreen_pixels_clipped() {
        let mut pool = EntityPool::new();
        // Right edge: only the first columns are on screen
        pool.spawn(SpriteId::PLAYER, 220, 100, Frame::PlayerShot, PLAYER_COLOR);
        let mut fb = FrameBuffer::new();
        fb.render(&pool, &Palette::new());
        // Shot columns 3 and 4 land on x = 223 and 224; only 223 is kept
        assert_eq!(fb.lit_pixels(), 8);
        assert_ne!(fb.pixel(223, 100), Some(0));
        // Nothing wrapped onto the next row
        assert_eq!(fb.pixel(0, 101), Some(0));
    }

    #[test]
    fn test_clear_resets() {
        let palette = Palette::new();
        let mut fb = FrameBuffer::new();
        fb.draw(&GameState::new().pool, &palette);
        assert!(fb.lit_pixels() > 0);
        fb.clear();
        assert_eq!(fb.lit_pixels(), 0);
        assert_eq!(fb.as_bytes().len(), SCREEN_W * SCREEN_H * 4);
    }
}
