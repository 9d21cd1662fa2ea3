//! Panel address window and text cursor
//!
//! The ST7735S only accepts pixel data inside its current address window,
//! filling it left to right, top to bottom. Every drawing operation first
//! points that window at the rectangle it is about to fill:
//!
//! ```text
//!  panel (128x128)
//! ┌──────────────────────────────┐
//! │        origin                │
//! │          ┌─────────────────┐ │
//! │          │ cursor          │ │
//! │          │   ┌──────┐      │ │
//! │          │   │ w x h│      │ │
//! │          │   └──────┘      │ │
//! │          └─────────────────┘ │
//! └──────────────────────────────┘
//! ```
//!
//! The addressed rectangle starts at origin + cursor. The origin is the
//! top-left corner of the emulated screen, the cursor is relative to it.

use nokia_emu_hal::DisplayTransport;

use crate::command::{address_params, cmd};
use crate::error::EmulatorError;
use crate::framebuffer::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Physical panel size and controller RAM offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelGeometry {
    /// Visible width in pixels
    pub width: u16,
    /// Visible height in pixels
    pub height: u16,
    /// Controller column of visible column 0
    pub column_offset: u16,
    /// Controller row of visible row 0
    pub row_offset: u16,
}

impl PanelGeometry {
    /// Crystalfontz CFAF128128B-0145T
    pub const CFAF128128B: Self = Self {
        width: 128,
        height: 128,
        column_offset: 2,
        row_offset: 1,
    };

    /// Origin that centres the emulated screen on this panel
    pub fn centred_origin(&self) -> (u16, u16) {
        (
            self.width.saturating_sub(SCREEN_WIDTH) / 2,
            self.height.saturating_sub(SCREEN_HEIGHT) / 2,
        )
    }
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self::CFAF128128B
    }
}

/// Text cursor in pixels, relative to the window origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    pub x: u16,
    pub y: u16,
}

impl Cursor {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Active window: origin on the panel and size of the addressed area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub origin_x: u16,
    pub origin_y: u16,
    pub width: u16,
    pub height: u16,
}

/// Owner of the cursor and the active window
///
/// All CASET/RASET/RAMWR traffic goes through [`resize_window`], so the
/// controller's address window always matches what is recorded here.
///
/// [`resize_window`]: WindowManager::resize_window
#[derive(Debug, Clone)]
pub struct WindowManager {
    panel: PanelGeometry,
    cursor: Cursor,
    window: Window,
}

impl WindowManager {
    /// Create a manager with the emulated screen selected and the cursor home
    ///
    /// Nothing is sent to the panel until the first resize.
    pub fn new(panel: PanelGeometry) -> Self {
        let (origin_x, origin_y) = panel.centred_origin();
        Self {
            panel,
            cursor: Cursor::default(),
            window: Window {
                origin_x,
                origin_y,
                width: SCREEN_WIDTH,
                height: SCREEN_HEIGHT,
            },
        }
    }

    pub fn panel(&self) -> &PanelGeometry {
        &self.panel
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Active window size as `(width, height)`
    pub fn size(&self) -> (u16, u16) {
        (self.window.width, self.window.height)
    }

    /// Record a window size without addressing the panel
    ///
    /// Used after a temporary resize (such as a glyph cell) so that cursor
    /// wrapping follows the caller's window again. The controller keeps its
    /// last address window until the next resize.
    pub fn restore_size(&mut self, width: u16, height: u16) {
        self.window.width = width;
        self.window.height = height;
    }

    /// Move the window origin on the panel
    pub fn set_origin(&mut self, x: u16, y: u16) {
        self.window.origin_x = x;
        self.window.origin_y = y;
    }

    /// Record the emulated screen as the window and home the cursor
    ///
    /// Nothing is sent; the panel is addressed by the next resize.
    pub fn home(&mut self) {
        self.cursor = Cursor::default();
        let (origin_x, origin_y) = self.panel.centred_origin();
        self.set_origin(origin_x, origin_y);
        self.restore_size(SCREEN_WIDTH, SCREEN_HEIGHT);
    }

    /// Home the cursor and select the whole emulated screen
    pub fn reset_window<T: DisplayTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), EmulatorError<T::Error>> {
        self.home();
        self.resize_window(transport, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    /// Address a `width` x `height` rectangle at origin + cursor
    ///
    /// On success the controller is left in memory-write mode, ready for
    /// exactly `width * height` pixels. The new size is only recorded once
    /// RAMWR has been sent; a rejected size sends nothing.
    pub fn resize_window<T: DisplayTransport>(
        &mut self,
        transport: &mut T,
        width: u16,
        height: u16,
    ) -> Result<(), EmulatorError<T::Error>> {
        if width % 2 != 0 {
            return Err(EmulatorError::OddWindowWidth(width));
        }
        if width == 0 || height == 0 {
            return Err(EmulatorError::EmptyWindow);
        }

        let left = u32::from(self.window.origin_x) + u32::from(self.cursor.x);
        let top = u32::from(self.window.origin_y) + u32::from(self.cursor.y);
        if left + u32::from(width) > u32::from(self.panel.width)
            || top + u32::from(height) > u32::from(self.panel.height)
        {
            return Err(EmulatorError::WindowOutOfBounds);
        }

        // left and top are inside the panel here, so they fit in u16
        let first_column = (left as u16).saturating_add(self.panel.column_offset);
        let first_row = (top as u16).saturating_add(self.panel.row_offset);
        let columns = address_params(first_column, first_column.saturating_add(width - 1));
        let rows = address_params(first_row, first_row.saturating_add(height - 1));

        transport
            .write_command(cmd::CASET, &columns)
            .map_err(EmulatorError::Transport)?;
        transport
            .write_command(cmd::RASET, &rows)
            .map_err(EmulatorError::Transport)?;
        transport
            .write_command(cmd::RAMWR, &[])
            .map_err(EmulatorError::Transport)?;

        self.window.width = width;
        self.window.height = height;
        Ok(())
    }

    /// Step the cursor right by one cell, wrapping inside the active window
    ///
    /// When the next cell would not fit on the row the cursor moves to the
    /// start of the next row, and back to the top when that row would not
    /// fit either.
    pub fn advance_cursor(&mut self, step_x: u16, step_y: u16) {
        self.cursor.x = self.cursor.x.saturating_add(step_x);
        if self.cursor.x.saturating_add(step_x) > self.window.width {
            self.cursor.x = 0;
            self.cursor.y = self.cursor.y.saturating_add(step_y);
            if self.cursor.y.saturating_add(step_y) > self.window.height {
                self.cursor.y = 0;
            }
        }
    }
}
