//! Software rendering
//!
//! Sprites are composited into a fixed-size ARGB frame buffer; presenting it
//! (texture upload, window) is left to the host.

pub mod framebuffer;
pub mod palette;
pub mod sprites;

pub use framebuffer::FrameBuffer;
pub use palette::Palette;
