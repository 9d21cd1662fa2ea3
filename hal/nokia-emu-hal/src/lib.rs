//! Nokia Emu Hardware Abstraction Layer
//!
//! This crate defines the bus capabilities the emulator core is written
//! against. The core never touches registers or pins directly; it only
//! asks a [`DisplayTransport`] to open a command or data burst, push bytes
//! and close the burst again.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  nokia-emu-display (emulator core)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  nokia-emu-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ SpiTransport  │       │ test doubles  │
//! │ (embedded-hal)│       │ (recording)   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`transport::DisplayTransport`] - Command/data selector plus byte send
//! - [`transport::ReadyWait`] - Strategy for waiting on bus readiness
//! - [`spi::SpiTransport`] - Transport over an `embedded-hal` SPI bus

#![no_std]
#![deny(unsafe_code)]

pub mod spi;
pub mod transport;

// Re-export key types at crate root for convenience
pub use spi::{SpiConfig, SpiTransport, SpiTransportError};
pub use transport::{BusyPoll, DisplayTransport, NoWait, ReadyWait};
