//! 4-bit BMP sprites
//!
//! Sprites are 16-colour Windows bitmaps, header included, as exported by
//! most image editors. Pixel data is stored bottom row first, two pixels
//! per byte with the left pixel in the high nibble, and each row is padded
//! to a multiple of 4 bytes. Colour indices are treated as grey levels and
//! compared against a threshold to decide which pixels are lit.

use crate::framebuffer::{Framebuffer, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Highest useful threshold: only index 15 lights a pixel
pub const MAX_THRESHOLD: u8 = 14;

/// Offset of the pixel data offset field
const DATA_OFFSET_AT: usize = 10;
/// Offset of the width field
const WIDTH_AT: usize = 18;
/// Offset of the height field
const HEIGHT_AT: usize = 22;

/// Why a sprite was not drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlitReject {
    /// Image is too short to hold the header fields
    HeaderTruncated,
    /// Height is zero or negative (top-down bitmaps are not supported)
    NonPositiveHeight,
    /// Width is zero, negative or odd
    InvalidWidth,
    /// Right side would be cut off
    RightEdge,
    /// Top would be cut off
    TopEdge,
    /// Bottom row is below the screen
    BottomEdge,
    /// Pixel data is shorter than the header claims
    DataTruncated,
}

/// Result of a blit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlitOutcome {
    /// Every sprite pixel was written
    Drawn,
    /// Nothing was written
    Rejected(BlitReject),
}

impl BlitOutcome {
    pub fn is_drawn(&self) -> bool {
        matches!(self, BlitOutcome::Drawn)
    }
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let field = bytes.get(at..at + 4)?;
    <[u8; 4]>::try_from(field).ok().map(u32::from_le_bytes)
}

fn read_i32(bytes: &[u8], at: usize) -> Option<i32> {
    let field = bytes.get(at..at + 4)?;
    <[u8; 4]>::try_from(field).ok().map(i32::from_le_bytes)
}

/// A parsed 4-bit bitmap
#[derive(Debug, Clone, Copy)]
pub struct BmpImage<'a> {
    bytes: &'a [u8],
    data_offset: usize,
    width: u16,
    height: u16,
}

impl<'a> BmpImage<'a> {
    /// Parse the header and check that the pixel data is all there
    pub fn parse(bytes: &'a [u8]) -> Result<Self, BlitReject> {
        let data_offset = read_u32(bytes, DATA_OFFSET_AT).ok_or(BlitReject::HeaderTruncated)?;
        let width = read_i32(bytes, WIDTH_AT).ok_or(BlitReject::HeaderTruncated)?;
        let height = read_i32(bytes, HEIGHT_AT).ok_or(BlitReject::HeaderTruncated)?;

        if height <= 0 {
            return Err(BlitReject::NonPositiveHeight);
        }
        if width <= 0 || width % 2 != 0 {
            return Err(BlitReject::InvalidWidth);
        }

        // Anything wider or taller than u16 cannot fit on screen anyway
        let width = u16::try_from(width).map_err(|_| BlitReject::RightEdge)?;
        let height = u16::try_from(height).map_err(|_| BlitReject::TopEdge)?;

        let image = Self {
            bytes,
            data_offset: data_offset as usize,
            width,
            height,
        };

        let needed = image
            .data_offset
            .checked_add(image.row_stride() * usize::from(height))
            .ok_or(BlitReject::DataTruncated)?;
        if bytes.len() < needed {
            return Err(BlitReject::DataTruncated);
        }

        Ok(image)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per stored row, including padding
    pub fn row_stride(&self) -> usize {
        (usize::from(self.width) / 2 + 3) & !3
    }

    /// Packed pixels of stored row `r` (0 is the bottom row), without padding
    fn row(&self, r: u16) -> &'a [u8] {
        let start = self.data_offset + usize::from(r) * self.row_stride();
        let len = usize::from(self.width) / 2;
        self.bytes.get(start..start + len).unwrap_or(&[])
    }
}

/// Draw a sprite into the framebuffer
///
/// `(xpos, ypos)` is the bottom-left corner of the sprite on the emulated
/// screen. A colour index above `threshold` lights its pixel, anything else
/// clears it; thresholds above [`MAX_THRESHOLD`] are clamped.
///
/// The sprite must fit entirely on screen: if any part would be clipped
/// the framebuffer is left untouched.
pub fn blit_bmp(
    framebuffer: &mut Framebuffer,
    xpos: u8,
    ypos: u8,
    image: &[u8],
    threshold: u8,
) -> BlitOutcome {
    let image = match BmpImage::parse(image) {
        Ok(image) => image,
        Err(reason) => return BlitOutcome::Rejected(reason),
    };
    let (xpos, ypos) = (u16::from(xpos), u16::from(ypos));

    if xpos + image.width() > SCREEN_WIDTH {
        return BlitOutcome::Rejected(BlitReject::RightEdge);
    }
    if ypos + 1 < image.height() {
        return BlitOutcome::Rejected(BlitReject::TopEdge);
    }
    if ypos >= SCREEN_HEIGHT {
        return BlitOutcome::Rejected(BlitReject::BottomEdge);
    }

    let threshold = threshold.min(MAX_THRESHOLD);

    for r in 0..image.height() {
        let y = ypos - r;
        for (i, byte) in image.row(r).iter().enumerate() {
            let x = xpos + 2 * i as u16;
            framebuffer.set_pixel(x, y, byte >> 4 > threshold);
            framebuffer.set_pixel(x + 1, y, byte & 0x0F > threshold);
        }
    }

    BlitOutcome::Drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FRAMEBUFFER_SIZE;
    use std::vec;
    use std::vec::Vec;

    /// Build a 4-bit BMP; `index(x, y)` gives the colour with y = 0 at the top
    fn bmp(width: i32, height: i32, index: impl Fn(usize, usize) -> u8) -> Vec<u8> {
        let offset = 14 + 40 + 16 * 4;
        let stride = ((width as usize) / 2 + 3) & !3;
        let rows = height.unsigned_abs() as usize;

        let mut out = vec![0u8; offset];
        out[0] = b'B';
        out[1] = b'M';
        out[10..14].copy_from_slice(&(offset as u32).to_le_bytes());
        out[14..18].copy_from_slice(&40u32.to_le_bytes());
        out[18..22].copy_from_slice(&width.to_le_bytes());
        out[22..26].copy_from_slice(&height.to_le_bytes());
        out[26..28].copy_from_slice(&1u16.to_le_bytes());
        out[28..30].copy_from_slice(&4u16.to_le_bytes());

        for stored in 0..rows {
            let y = rows - 1 - stored;
            let mut row = vec![0u8; stride];
            for x in (0..width as usize).step_by(2) {
                row[x / 2] = (index(x, y) << 4) | index(x + 1, y);
            }
            out.extend_from_slice(&row);
        }

        let size = out.len() as u32;
        out[2..6].copy_from_slice(&size.to_le_bytes());
        out
    }

    #[test]
    fn test_solid_block_lands_above_ypos() {
        let mut fb = Framebuffer::new();
        let sprite = bmp(4, 4, |_, _| 15);

        assert_eq!(blit_bmp(&mut fb, 0, 10, &sprite, 0), BlitOutcome::Drawn);

        for y in 0..48 {
            for x in 0..84 {
                let inside = (0..=3).contains(&x) && (7..=10).contains(&y);
                assert_eq!(fb.get_pixel(x, y), inside, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_rows_are_stored_bottom_up() {
        let mut fb = Framebuffer::new();
        // Only the top row of the image is lit
        let sprite = bmp(2, 3, |_, y| if y == 0 { 15 } else { 0 });

        assert!(blit_bmp(&mut fb, 5, 20, &sprite, 0).is_drawn());

        assert!(fb.get_pixel(5, 18));
        assert!(fb.get_pixel(6, 18));
        assert!(!fb.get_pixel(5, 19));
        assert!(!fb.get_pixel(5, 20));
    }

    #[test]
    fn test_left_pixel_is_high_nibble() {
        let mut fb = Framebuffer::new();
        let sprite = bmp(2, 1, |x, _| if x == 0 { 9 } else { 2 });

        blit_bmp(&mut fb, 0, 0, &sprite, 5);

        assert!(fb.get_pixel(0, 0));
        assert!(!fb.get_pixel(1, 0));
    }

    #[test]
    fn test_padding_is_skipped() {
        let mut fb = Framebuffer::new();
        // 10 pixels = 5 bytes per row, padded to 8
        let sprite = bmp(10, 2, |x, y| if x == 9 && y == 1 { 15 } else { 0 });

        blit_bmp(&mut fb, 0, 30, &sprite, 0);

        assert!(fb.get_pixel(9, 30));
        assert_eq!(fb.count_on(), 1);
    }

    #[test]
    fn test_off_pixels_clear_existing_bits() {
        let mut fb = Framebuffer::from_bytes([0xFF; FRAMEBUFFER_SIZE]);
        let sprite = bmp(2, 1, |_, _| 0);

        blit_bmp(&mut fb, 40, 40, &sprite, 0);

        assert!(!fb.get_pixel(40, 40));
        assert!(!fb.get_pixel(41, 40));
        assert_eq!(fb.count_on(), 84 * 48 - 2);
    }

    #[test]
    fn test_threshold_is_clamped() {
        let mut fb = Framebuffer::new();
        let sprite = bmp(2, 1, |x, _| if x == 0 { 15 } else { 14 });

        blit_bmp(&mut fb, 0, 0, &sprite, 200);

        assert!(fb.get_pixel(0, 0));
        assert!(!fb.get_pixel(1, 0));
    }

    #[test]
    fn test_clipped_sprites_leave_buffer_untouched() {
        let sprite = bmp(4, 4, |_, _| 15);
        let cases = [
            (0, 200, BlitReject::BottomEdge),
            (0, 48, BlitReject::BottomEdge),
            (0, 2, BlitReject::TopEdge),
            (81, 10, BlitReject::RightEdge),
        ];

        for (x, y, reason) in cases {
            let mut fb = Framebuffer::new();
            assert_eq!(
                blit_bmp(&mut fb, x, y, &sprite, 0),
                BlitOutcome::Rejected(reason)
            );
            assert_eq!(fb.count_on(), 0);
        }
    }

    #[test]
    fn test_sprite_touching_edges_is_drawn() {
        let mut fb = Framebuffer::new();
        let sprite = bmp(4, 4, |_, _| 15);

        assert!(blit_bmp(&mut fb, 80, 47, &sprite, 0).is_drawn());
        assert!(blit_bmp(&mut fb, 0, 3, &sprite, 0).is_drawn());
        assert!(fb.get_pixel(83, 47));
        assert!(fb.get_pixel(0, 0));
    }

    #[test]
    fn test_malformed_headers_are_rejected() {
        let mut fb = Framebuffer::new();

        assert_eq!(
            blit_bmp(&mut fb, 0, 10, &[0u8; 20], 0),
            BlitOutcome::Rejected(BlitReject::HeaderTruncated)
        );
        assert_eq!(
            blit_bmp(&mut fb, 0, 10, &bmp(4, -4, |_, _| 15), 0),
            BlitOutcome::Rejected(BlitReject::NonPositiveHeight)
        );
        assert_eq!(
            blit_bmp(&mut fb, 0, 10, &bmp(3, 4, |_, _| 15), 0),
            BlitOutcome::Rejected(BlitReject::InvalidWidth)
        );

        let mut short = bmp(4, 4, |_, _| 15);
        short.truncate(short.len() - 1);
        assert_eq!(
            blit_bmp(&mut fb, 0, 10, &short, 0),
            BlitOutcome::Rejected(BlitReject::DataTruncated)
        );
        assert_eq!(fb.count_on(), 0);
    }
}
