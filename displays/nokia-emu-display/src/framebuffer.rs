//! Paged 1-bit framebuffer
//!
//! The Nokia 5110 controller stores its image in pages of 8 pixel rows:
//! one byte covers one column of a page, with bit 0 at the top. Existing
//! Nokia 5110 image data is laid out this way, so the buffer keeps exactly
//! the same layout:
//!
//! ```text
//! byte index = (y / 8) * SCREEN_WIDTH + x
//! bit        = y % 8
//! ```

/// Emulated screen width in pixels
pub const SCREEN_WIDTH: u16 = 84;

/// Emulated screen height in pixels
pub const SCREEN_HEIGHT: u16 = 48;

/// Framebuffer size in bytes (one bit per pixel)
pub const FRAMEBUFFER_SIZE: usize = (SCREEN_WIDTH as usize) * (SCREEN_HEIGHT as usize) / 8;

/// Locate a pixel in a paged buffer of the given width
///
/// Returns the byte index and the bit mask for `(x, y)`.
#[inline]
pub fn paged_index(width: usize, x: usize, y: usize) -> (usize, u8) {
    ((y / 8) * width + x, 1 << (y % 8))
}

/// Number of bytes a paged buffer of `width` x `height` pixels occupies
#[inline]
pub fn paged_len(width: usize, height: usize) -> usize {
    height.div_ceil(8) * width
}

/// Read one pixel from a paged buffer
///
/// Pixels outside `buffer` read as off.
#[inline]
pub fn paged_bit(buffer: &[u8], width: usize, x: usize, y: usize) -> bool {
    let (index, mask) = paged_index(width, x, y);
    buffer.get(index).is_some_and(|byte| byte & mask != 0)
}

/// Off-panel image of the full emulated screen
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    bytes: [u8; FRAMEBUFFER_SIZE],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// Create a blank framebuffer
    pub const fn new() -> Self {
        Self {
            bytes: [0; FRAMEBUFFER_SIZE],
        }
    }

    /// Create a framebuffer from existing Nokia 5110 image data
    pub const fn from_bytes(bytes: [u8; FRAMEBUFFER_SIZE]) -> Self {
        Self { bytes }
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Set or clear one pixel
    ///
    /// Coordinates outside the screen are ignored.
    pub fn set_pixel(&mut self, x: u16, y: u16, on: bool) {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return;
        }
        let (index, mask) = paged_index(SCREEN_WIDTH as usize, x as usize, y as usize);
        if on {
            self.bytes[index] |= mask;
        } else {
            self.bytes[index] &= !mask;
        }
    }

    /// Read one pixel
    ///
    /// Coordinates outside the screen read as off.
    pub fn get_pixel(&self, x: u16, y: u16) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        paged_bit(&self.bytes, SCREEN_WIDTH as usize, x as usize, y as usize)
    }

    /// Raw page-layout bytes
    pub fn as_bytes(&self) -> &[u8; FRAMEBUFFER_SIZE] {
        &self.bytes
    }

    /// Mutable raw page-layout bytes
    pub fn as_bytes_mut(&mut self) -> &mut [u8; FRAMEBUFFER_SIZE] {
        &mut self.bytes
    }

    /// Number of pixels currently on
    pub fn count_on(&self) -> u32 {
        self.bytes.iter().map(|b| b.count_ones()).sum()
    }
}

impl core::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("pixels_on", &self.count_on())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Framebuffer {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Framebuffer[{} on]", self.count_on());
    }
}
