//! Text rendering
//!
//! Characters are drawn straight to the panel, one 6x8 cell at a time,
//! without touching the framebuffer.

use nokia_emu_hal::DisplayTransport;

use crate::error::EmulatorError;
use crate::font::glyph;
use crate::framebuffer::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::pack::send_window;
use crate::window::WindowManager;

/// Character cell width in pixels, including the spacing column
pub const CHAR_WIDTH: u16 = 6;

/// Character cell height in pixels
pub const CHAR_HEIGHT: u16 = 8;

/// Text columns on the emulated screen
pub const TEXT_COLS: u16 = SCREEN_WIDTH / CHAR_WIDTH;

/// Text rows on the emulated screen
pub const TEXT_ROWS: u16 = SCREEN_HEIGHT / CHAR_HEIGHT;

/// Glyph code for a `char`
///
/// Anything outside ASCII maps to a space.
pub fn char_code(ch: char) -> u8 {
    if ch.is_ascii() {
        ch as u8
    } else {
        b' '
    }
}

/// Draw one character at the cursor and advance it
///
/// The active window size is restored after the glyph cell is drawn, even
/// when drawing fails, so the cursor keeps wrapping inside the caller's
/// window.
pub fn draw_char<T: DisplayTransport>(
    windows: &mut WindowManager,
    transport: &mut T,
    code: u8,
) -> Result<(), EmulatorError<T::Error>> {
    let (width, height) = windows.size();
    let drawn = windows
        .resize_window(transport, CHAR_WIDTH, CHAR_HEIGHT)
        .and_then(|()| send_window(transport, windows.window(), Some(glyph(code).as_slice())));
    windows.restore_size(width, height);
    drawn?;

    windows.advance_cursor(CHAR_WIDTH, CHAR_HEIGHT);
    Ok(())
}

/// Draw a string, wrapping at the window edge
///
/// There is no control-character handling: `'\n'` draws a space like any
/// other unprintable character.
pub fn draw_str<T: DisplayTransport>(
    windows: &mut WindowManager,
    transport: &mut T,
    text: &str,
) -> Result<(), EmulatorError<T::Error>> {
    for ch in text.chars() {
        draw_char(windows, transport, char_code(ch))?;
    }
    Ok(())
}

/// Move the text cursor to a character cell
///
/// Each axis is only moved when the whole cell fits on the emulated screen;
/// an out-of-range column or row leaves that axis where it was.
pub fn set_text_cursor(windows: &mut WindowManager, col: u8, row: u8) {
    let mut cursor = windows.cursor();

    let x = u16::from(col) * CHAR_WIDTH;
    if x + CHAR_WIDTH <= SCREEN_WIDTH {
        cursor.x = x;
    }
    let y = u16::from(row) * CHAR_HEIGHT;
    if y + CHAR_HEIGHT <= SCREEN_HEIGHT {
        cursor.y = y;
    }

    windows.set_cursor(cursor);
}
