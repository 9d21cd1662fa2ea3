//! Nokia 5110 emulation on an ST7735S colour panel
//!
//! This crate provides:
//! - `Emulator`, the device context that implements the Nokia 5110 text and
//!   bitmap API on top of any [`DisplayTransport`]
//! - `Framebuffer`, the 504-byte paged screen buffer shared with existing
//!   Nokia 5110 image data
//! - The window manager, pixel packer, 6x8 glyph renderer and 4-bit BMP
//!   blitter that the emulator is built from
//!
//! # Architecture
//!
//! Every API call first points the panel's address window at the part of
//! the emulated screen it touches, then streams 1-bit samples through the
//! pixel packer:
//!
//! ```text
//! Emulator ──▶ WindowManager ──▶ CASET / RASET / RAMWR
//!    │                                   │
//!    └──▶ Framebuffer ──▶ pixel packer ──┴──▶ DisplayTransport
//! ```
//!
//! The emulated 84x48 screen is centred on the 128x128 panel. Characters are
//! 6x8 pixels, giving 14 columns and 6 rows of text.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod config;
pub mod emulator;
pub mod error;
pub mod font;
pub mod framebuffer;
pub mod glyph;
pub mod pack;
pub mod sprite;
pub mod window;

#[cfg(test)]
mod mock;

// Re-export key types
pub use config::EmulatorConfig;
pub use emulator::Emulator;
pub use error::{ConfigError, EmulatorError};
pub use framebuffer::{Framebuffer, FRAMEBUFFER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use glyph::{CHAR_HEIGHT, CHAR_WIDTH, TEXT_COLS, TEXT_ROWS};
pub use nokia_emu_hal::DisplayTransport;
pub use sprite::{BlitOutcome, BlitReject};
pub use window::{Cursor, PanelGeometry, Window};
