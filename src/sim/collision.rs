//! Sprite overlap tests
//!
//! Boxes are the nominal 8x8 sprite extent. Horizontally the test is
//! asymmetric: `a`'s right edge is pulled in to `a.x + right_inset` and its
//! left edge is pushed to `a.x + left_inset`, so a thin shot sprite only hits
//! when its visible pixels are close to the target. Vertically both boxes use
//! the full extent.

use super::state::{EntityPool, Sprite, SpriteId};
use crate::consts::SPRITE_DIM;

/// Overlap test between two pool entries. False if either is disabled.
pub fn overlaps(
    pool: &EntityPool,
    a: SpriteId,
    b: SpriteId,
    right_inset: i16,
    left_inset: i16,
) -> bool {
    sprites_overlap(pool.get(a), pool.get(b), right_inset, left_inset)
}

/// Same as [`overlaps`] on sprite records directly
pub fn sprites_overlap(a: &Sprite, b: &Sprite, right_inset: i16, left_inset: i16) -> bool {
    if !(a.enabled && b.enabled) {
        return false;
    }
    let dim = SPRITE_DIM as i16;
    let (ax, ay) = (a.x as i16, a.y as i16);
    let (bx, by) = (b.x as i16, b.y as i16);

    ax + right_inset >= bx && bx + dim >= ax + left_inset && ay + dim >= by && by + dim >= ay
}
