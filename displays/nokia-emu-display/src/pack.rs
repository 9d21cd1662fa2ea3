//! 1-bit to 12-bit pixel packing
//!
//! In COLMOD 0x03 mode the ST7735S takes two 12-bit pixels in three bytes:
//!
//! ```text
//! byte 0: R1 R1 R1 R1 G1 G1 G1 G1   (p1 >> 4)
//! byte 1: B1 B1 B1 B1 R2 R2 R2 R2   (p1 & 0xF) << 4 | p2 >> 8
//! byte 2: G2 G2 G2 G2 B2 B2 B2 B2   (p2 & 0xFF)
//! ```

use nokia_emu_hal::DisplayTransport;

use crate::error::EmulatorError;
use crate::framebuffer::{paged_bit, paged_len};
use crate::window::Window;

/// Colour of a lit Nokia pixel (black)
pub const PIXEL_ON: u16 = 0x000;

/// Colour of an unlit Nokia pixel (white)
pub const PIXEL_OFF: u16 = 0xFFF;

/// Map a 1-bit sample to its 12-bit colour
#[inline]
pub const fn pixel_colour(on: bool) -> u16 {
    if on {
        PIXEL_ON
    } else {
        PIXEL_OFF
    }
}

/// Pack two 12-bit pixels into three bytes, first pixel first
#[inline]
pub const fn pack_pair(first: u16, second: u16) -> [u8; 3] {
    [
        ((first >> 4) & 0xFF) as u8,
        (((first & 0x0F) << 4) | ((second >> 8) & 0x0F)) as u8,
        (second & 0xFF) as u8,
    ]
}

/// Split three packed bytes back into two 12-bit pixels
#[inline]
pub const fn unpack_pair(bytes: [u8; 3]) -> (u16, u16) {
    let first = ((bytes[0] as u16) << 4) | ((bytes[1] as u16) >> 4);
    let second = (((bytes[1] as u16) & 0x0F) << 8) | bytes[2] as u16;
    (first, second)
}

/// Stream one full window of pixels as a single data burst
///
/// `buffer` is a paged 1-bit image exactly as wide as the window. With
/// `None` every pixel is sent as off, which clears the window.
///
/// The window must already be addressed (see
/// [`WindowManager::resize_window`](crate::window::WindowManager::resize_window)).
pub fn send_window<T: DisplayTransport>(
    transport: &mut T,
    window: &Window,
    buffer: Option<&[u8]>,
) -> Result<(), EmulatorError<T::Error>> {
    let width = usize::from(window.width);
    let height = usize::from(window.height);

    if width % 2 != 0 {
        return Err(EmulatorError::OddWindowWidth(window.width));
    }
    if let Some(buffer) = buffer {
        if buffer.len() < paged_len(width, height) {
            return Err(EmulatorError::BufferTooSmall);
        }
    }

    let sample = |x: usize, y: usize| buffer.is_some_and(|b| paged_bit(b, width, x, y));

    transport.begin_data().map_err(EmulatorError::Transport)?;
    for y in 0..height {
        for x in (0..width).step_by(2) {
            let bytes = pack_pair(pixel_colour(sample(x, y)), pixel_colour(sample(x + 1, y)));
            transport
                .send_bytes(&bytes)
                .map_err(EmulatorError::Transport)?;
        }
    }
    transport.end().map_err(EmulatorError::Transport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPanel;

    #[test]
    fn test_pack_layout() {
        assert_eq!(pack_pair(0xABC, 0xDEF), [0xAB, 0xCD, 0xEF]);
        assert_eq!(pack_pair(PIXEL_ON, PIXEL_OFF), [0x00, 0x0F, 0xFF]);
        assert_eq!(pack_pair(PIXEL_OFF, PIXEL_ON), [0xFF, 0xF0, 0x00]);
    }

    #[test]
    fn test_pack_round_trip_all_combinations() {
        for first in [false, true] {
            for second in [false, true] {
                let (a, b) = (pixel_colour(first), pixel_colour(second));
                assert_eq!(unpack_pair(pack_pair(a, b)), (a, b));
            }
        }
    }

    #[test]
    fn test_send_window_is_one_burst_of_packed_pixels() {
        let mut panel = MockPanel::new();
        let window = Window {
            origin_x: 0,
            origin_y: 0,
            width: 6,
            height: 8,
        };
        // Column 0 fully lit, everything else off
        let image = [0xFF, 0, 0, 0, 0, 0];

        send_window(&mut panel, &window, Some(&image)).unwrap();

        assert_eq!(panel.data_bursts(), 1);
        assert_eq!(panel.bytes_sent(), 6 * 8 / 2 * 3);
        let first_row = &panel.raw_data()[..9];
        assert_eq!(
            first_row,
            &[0x00, 0x0F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_send_window_without_buffer_fills_off() {
        let mut panel = MockPanel::new();
        let window = Window {
            origin_x: 0,
            origin_y: 0,
            width: 4,
            height: 2,
        };

        send_window(&mut panel, &window, None).unwrap();

        assert_eq!(panel.raw_data(), &[0xFF; 12]);
    }

    #[test]
    fn test_short_buffer_is_rejected_before_sending() {
        let mut panel = MockPanel::new();
        let window = Window {
            origin_x: 0,
            origin_y: 0,
            width: 84,
            height: 48,
        };

        assert_eq!(
            send_window(&mut panel, &window, Some(&[0u8; 100])),
            Err(EmulatorError::BufferTooSmall)
        );
        assert_eq!(panel.bytes_sent(), 0);
    }
}
