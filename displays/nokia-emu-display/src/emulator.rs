//! Nokia 5110 API on an ST7735S panel
//!
//! [`Emulator`] owns the transport, the window/cursor state and the
//! framebuffer. Text calls draw straight to the panel; sprite calls only
//! touch the framebuffer until [`Emulator::display_buffer`] sends it.

use embedded_hal::delay::DelayNs;
use nokia_emu_hal::DisplayTransport;

use crate::command::INIT_SEQUENCE;
use crate::config::EmulatorConfig;
use crate::error::{ConfigError, EmulatorError};
use crate::framebuffer::{Framebuffer, FRAMEBUFFER_SIZE};
use crate::glyph::{self, CHAR_HEIGHT};
use crate::pack::send_window;
use crate::sprite::{blit_bmp, BlitOutcome};
use crate::window::{Cursor, Window, WindowManager};

/// Digits printed by [`Emulator::out_udec`]
const UDEC_WIDTH: usize = 5;

/// Nokia 5110 emulator
pub struct Emulator<T> {
    transport: T,
    config: EmulatorConfig,
    windows: WindowManager,
    screen: Framebuffer,
}

impl<T: DisplayTransport> Emulator<T> {
    /// Create an emulator for the default CFAF128128B module
    pub fn new(transport: T) -> Self {
        let config = EmulatorConfig::default();
        Self {
            windows: WindowManager::new(config.panel()),
            transport,
            config,
            screen: Framebuffer::new(),
        }
    }

    /// Create an emulator for another panel
    pub fn with_config(transport: T, config: EmulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            windows: WindowManager::new(config.panel()),
            transport,
            config,
            screen: Framebuffer::new(),
        })
    }

    /// Reset and configure the panel, then show the blank emulated screen
    ///
    /// Runs the controller power-on sequence, optionally fills the whole
    /// panel with a colour pattern, draws the labels above the emulated
    /// screen and finally clears it. If any of that fails the emulated
    /// screen is still the selected window, with the cursor home.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), EmulatorError<T::Error>> {
        self.transport
            .hard_reset(delay)
            .map_err(EmulatorError::Transport)?;

        for step in INIT_SEQUENCE {
            self.transport
                .write_command(step.command, step.params)
                .map_err(EmulatorError::Transport)?;
            if step.delay_ms > 0 {
                delay.delay_ms(step.delay_ms);
            }
        }

        let shown = self.draw_boot_screen().and_then(|()| self.clear());
        if shown.is_err() {
            self.windows.home();
        }
        shown
    }

    /// Pattern and labels, drawn with the whole panel as the window
    fn draw_boot_screen(&mut self) -> Result<(), EmulatorError<T::Error>> {
        // Whole panel, addressed from its top-left corner
        let panel = *self.windows.panel();
        self.windows.set_origin(0, 0);
        self.windows.set_cursor(Cursor::default());
        self.windows
            .resize_window(&mut self.transport, panel.width, panel.height)?;

        if self.config.test_pattern {
            self.send_test_pattern()?;
        }

        let (_, screen_top) = panel.centred_origin();
        let title_row = screen_top.saturating_sub(3 * CHAR_HEIGHT);
        let subtitle_row = screen_top.saturating_sub(2 * CHAR_HEIGHT);
        let title = self.config.title.clone();
        let subtitle = self.config.subtitle.clone();
        self.draw_label(&title, title_row)?;
        self.draw_label(&subtitle, subtitle_row)
    }

    /// Diagnostic pattern: a fixed sequence of 12-bit colours over the panel
    fn send_test_pattern(&mut self) -> Result<(), EmulatorError<T::Error>> {
        let (width, height) = self.windows.size();
        let pairs = u32::from(width) * u32::from(height) / 2;

        self.transport.begin_data().map_err(EmulatorError::Transport)?;
        for i in 0..pairs {
            let bytes = [i as u8, !i as u8, (i / 64) as u8];
            self.transport
                .send_bytes(&bytes)
                .map_err(EmulatorError::Transport)?;
        }
        self.transport.end().map_err(EmulatorError::Transport)
    }

    fn draw_label(&mut self, text: &str, y: u16) -> Result<(), EmulatorError<T::Error>> {
        if text.is_empty() {
            return Ok(());
        }
        let x = self.config.centred_column(text.chars().count());
        self.windows.set_cursor(Cursor::new(x, y));
        glyph::draw_str(&mut self.windows, &mut self.transport, text)
    }

    /// Turn every emulated pixel off and home the cursor
    ///
    /// The framebuffer is not touched; see [`clear_buffer`](Self::clear_buffer).
    pub fn clear(&mut self) -> Result<(), EmulatorError<T::Error>> {
        draw_screen(&mut self.transport, &mut self.windows, None)
    }

    /// Print one character at the cursor and advance it
    ///
    /// Codes outside 0x20..=0x7F print as a space.
    pub fn out_char(&mut self, code: u8) -> Result<(), EmulatorError<T::Error>> {
        glyph::draw_char(&mut self.windows, &mut self.transport, code)
    }

    /// Print a string, wrapping at the right edge and back to the top
    pub fn out_string(&mut self, text: &str) -> Result<(), EmulatorError<T::Error>> {
        glyph::draw_str(&mut self.windows, &mut self.transport, text)
    }

    /// Print a number as five right-justified digits
    pub fn out_udec(&mut self, value: u16) -> Result<(), EmulatorError<T::Error>> {
        for code in udec_cells(value) {
            self.out_char(code)?;
        }
        Ok(())
    }

    /// Move the cursor to text cell (`col`, `row`)
    ///
    /// `col` is 0..=13 and `row` 0..=5; an out-of-range value leaves that
    /// axis unchanged.
    pub fn set_cursor(&mut self, col: u8, row: u8) {
        glyph::set_text_cursor(&mut self.windows, col, row);
    }

    /// Show a full-screen image in Nokia 5110 page layout
    ///
    /// The cursor is homed.
    pub fn draw_full_image(
        &mut self,
        image: &[u8; FRAMEBUFFER_SIZE],
    ) -> Result<(), EmulatorError<T::Error>> {
        draw_screen(&mut self.transport, &mut self.windows, Some(image.as_slice()))
    }

    /// Turn every framebuffer pixel off without touching the panel
    pub fn clear_buffer(&mut self) {
        self.screen.clear();
    }

    /// Send the framebuffer to the panel
    pub fn display_buffer(&mut self) -> Result<(), EmulatorError<T::Error>> {
        draw_screen(
            &mut self.transport,
            &mut self.windows,
            Some(self.screen.as_bytes().as_slice()),
        )
    }

    /// Draw a 4-bit BMP sprite into the framebuffer
    ///
    /// `(xpos, ypos)` is the sprite's bottom-left corner. Nothing is sent to
    /// the panel until [`display_buffer`](Self::display_buffer).
    pub fn print_bmp(&mut self, xpos: u8, ypos: u8, image: &[u8], threshold: u8) -> BlitOutcome {
        blit_bmp(&mut self.screen, xpos, ypos, image, threshold)
    }

    pub fn buffer(&self) -> &Framebuffer {
        &self.screen
    }

    pub fn buffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.screen
    }

    /// Cursor position in pixels on the emulated screen
    pub fn cursor(&self) -> Cursor {
        self.windows.cursor()
    }

    pub fn window(&self) -> &Window {
        self.windows.window()
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport
    pub fn release(self) -> T {
        self.transport
    }
}

/// Select the whole emulated screen and fill it from `image`
fn draw_screen<T: DisplayTransport>(
    transport: &mut T,
    windows: &mut WindowManager,
    image: Option<&[u8]>,
) -> Result<(), EmulatorError<T::Error>> {
    windows.reset_window(transport)?;
    send_window(transport, windows.window(), image)
}

/// Character codes for a right-justified five digit number
fn udec_cells(mut value: u16) -> [u8; UDEC_WIDTH] {
    let mut cells = [b' '; UDEC_WIDTH];
    for cell in cells.iter_mut().rev() {
        *cell = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    cells
}
