//! Property tests for the emulator's cursor, packing and sprite rules

use core::convert::Infallible;

use nokia_emu_display::framebuffer::Framebuffer;
use nokia_emu_display::pack::{pack_pair, unpack_pair};
use nokia_emu_display::sprite::{blit_bmp, BlitOutcome};
use nokia_emu_display::{DisplayTransport, Emulator, SCREEN_HEIGHT, SCREEN_WIDTH};
use proptest::prelude::*;

/// Transport that accepts and discards everything
struct NullBus;

impl DisplayTransport for NullBus {
    type Error = Infallible;

    fn begin_command(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn begin_data(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn send_byte(&mut self, _byte: u8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum TextOp {
    Char(u8),
    Cursor(u8, u8),
}

fn text_op() -> impl Strategy<Value = TextOp> {
    prop_oneof![
        4 => any::<u8>().prop_map(TextOp::Char),
        1 => (any::<u8>(), any::<u8>()).prop_map(|(col, row)| TextOp::Cursor(col, row)),
    ]
}

/// 4-bit BMP with every pixel at `index`
fn solid_bmp(width: i32, height: i32, index: u8) -> Vec<u8> {
    let offset = 118usize;
    let stride = ((width as usize) / 2 + 3) & !3;
    let mut bytes = vec![0u8; offset];
    bytes[0] = b'B';
    bytes[1] = b'M';
    bytes[10..14].copy_from_slice(&(offset as u32).to_le_bytes());
    bytes[18..22].copy_from_slice(&width.to_le_bytes());
    bytes[22..26].copy_from_slice(&height.to_le_bytes());
    for _ in 0..height {
        let mut row = vec![0u8; stride];
        row[..width as usize / 2].fill((index << 4) | index);
        bytes.extend_from_slice(&row);
    }
    bytes
}

proptest! {
    /// The cursor always sits on a whole character cell of the screen
    #[test]
    fn cursor_stays_on_screen(ops in prop::collection::vec(text_op(), 0..200)) {
        let mut emu = Emulator::new(NullBus);
        for op in ops {
            match op {
                TextOp::Char(code) => emu.out_char(code).unwrap(),
                TextOp::Cursor(col, row) => emu.set_cursor(col, row),
            }
            let cursor = emu.cursor();
            prop_assert!(cursor.x + 6 <= SCREEN_WIDTH, "{:?}", cursor);
            prop_assert!(cursor.y + 8 <= SCREEN_HEIGHT, "{:?}", cursor);
            prop_assert_eq!(cursor.x % 6, 0);
            prop_assert_eq!(cursor.y % 8, 0);
        }
    }

    /// Any two 12-bit colours survive packing
    #[test]
    fn pack_round_trip(first in 0u16..0x1000, second in 0u16..0x1000) {
        prop_assert_eq!(unpack_pair(pack_pair(first, second)), (first, second));
    }

    /// A sprite is drawn exactly when it fits, and never writes outside itself
    #[test]
    fn blit_stays_in_bounds(
        xpos in any::<u8>(),
        ypos in any::<u8>(),
        half_width in 1i32..=12,
        height in 1i32..=20,
    ) {
        let width = half_width * 2;
        let sprite = solid_bmp(width, height, 15);
        let mut fb = Framebuffer::new();

        let outcome = blit_bmp(&mut fb, xpos, ypos, &sprite, 0);

        let (x, y) = (i32::from(xpos), i32::from(ypos));
        let fits = x + width <= 84 && y + 1 >= height && y < 48;
        prop_assert_eq!(outcome == BlitOutcome::Drawn, fits);

        if fits {
            prop_assert_eq!(fb.count_on(), (width * height) as u32);
            for py in 0..SCREEN_HEIGHT {
                for px in 0..SCREEN_WIDTH {
                    let (px_i, py_i) = (i32::from(px), i32::from(py));
                    let inside = px_i >= x && px_i < x + width && py_i <= y && py_i > y - height;
                    prop_assert_eq!(fb.get_pixel(px, py), inside);
                }
            }
        } else {
            prop_assert_eq!(fb.count_on(), 0);
        }
    }

    /// Setting a pixel changes exactly that pixel
    #[test]
    fn set_pixel_touches_one_bit(x in 0u16..100, y in 0u16..60, on in any::<bool>()) {
        let mut fb = Framebuffer::from_bytes([if on { 0 } else { 0xFF }; 504]);
        let before = fb.count_on();

        fb.set_pixel(x, y, on);

        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            prop_assert_eq!(fb.get_pixel(x, y), on);
            let changed = before.abs_diff(fb.count_on());
            prop_assert_eq!(changed, 1);
        } else {
            prop_assert!(!fb.get_pixel(x, y));
            prop_assert_eq!(fb.count_on(), before);
        }
    }
}
