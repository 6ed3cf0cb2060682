//! Fixed 64-color palette
//!
//! Two bits per channel mapped through a luminosity table, packed as opaque
//! ARGB8888.

/// Channel level for each 2-bit value
pub const LUMINOSITY: [u8; 4] = [0, 85, 170, 255];

pub const PALETTE_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [u32; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    /// Index layout is green-major, then red, then blue
    pub fn new() -> Self {
        let mut colors = [0u32; PALETTE_SIZE];
        let mut i = 0;
        for g in LUMINOSITY {
            for r in LUMINOSITY {
                for b in LUMINOSITY {
                    colors[i] = 0xff00_0000
                        | u32::from(r) << 16
                        | u32::from(g) << 8
                        | u32::from(b);
                    i += 1;
                }
            }
        }
        Self { colors }
    }

    /// ARGB for a palette index; out-of-range indices wrap
    #[inline]
    pub fn argb(&self, index: u8) -> u32 {
        self.colors[usize::from(index) % PALETTE_SIZE]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.colors
    }
}
