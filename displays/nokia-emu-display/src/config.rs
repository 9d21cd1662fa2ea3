//! Emulator configuration
//!
//! Defaults describe the Crystalfontz CFAF128128B-0145T module. A different
//! ST7735S module only needs its visible size and RAM offsets changed.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::framebuffer::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::glyph::CHAR_WIDTH;
use crate::window::PanelGeometry;

/// Maximum label length (one full row of text on a 128-pixel panel)
pub const MAX_LABEL_LEN: usize = 21;

/// Emulator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EmulatorConfig {
    /// Visible panel width in pixels
    pub panel_width: u16,
    /// Visible panel height in pixels
    pub panel_height: u16,
    /// Controller column of visible column 0
    pub column_offset: u16,
    /// Controller row of visible row 0
    pub row_offset: u16,
    /// Fill the panel with a colour pattern during init
    pub test_pattern: bool,
    /// Label drawn three text rows above the emulated screen
    pub title: String<MAX_LABEL_LEN>,
    /// Label drawn two text rows above the emulated screen
    pub subtitle: String<MAX_LABEL_LEN>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        let panel = PanelGeometry::CFAF128128B;
        Self {
            panel_width: panel.width,
            panel_height: panel.height,
            column_offset: panel.column_offset,
            row_offset: panel.row_offset,
            test_pattern: true,
            title: label(" Nokia 5110 "),
            subtitle: label(" Emulator "),
        }
    }
}

fn label(text: &str) -> String<MAX_LABEL_LEN> {
    let mut s = String::new();
    for ch in text.chars() {
        if s.push(ch).is_err() {
            break;
        }
    }
    s
}

impl EmulatorConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration without the boot labels or colour pattern
    pub fn quiet() -> Self {
        Self {
            test_pattern: false,
            title: String::new(),
            subtitle: String::new(),
            ..Self::default()
        }
    }

    /// Check that the emulated screen fits on the panel
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.panel_width < SCREEN_WIDTH || self.panel_height < SCREEN_HEIGHT {
            return Err(ConfigError::PanelTooSmall);
        }
        if self.panel_width % 2 != 0 {
            return Err(ConfigError::OddPanelWidth);
        }
        Ok(())
    }

    /// Panel geometry described by this configuration
    pub fn panel(&self) -> PanelGeometry {
        PanelGeometry {
            width: self.panel_width,
            height: self.panel_height,
            column_offset: self.column_offset,
            row_offset: self.row_offset,
        }
    }

    /// Column at which `len` characters are centred on the panel
    pub fn centred_column(&self, len: usize) -> u16 {
        let text_width = u16::try_from(len)
            .unwrap_or(u16::MAX)
            .saturating_mul(CHAR_WIDTH);
        self.panel_width.saturating_sub(text_width) / 2
    }
}
