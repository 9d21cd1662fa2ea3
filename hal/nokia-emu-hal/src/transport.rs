//! Display transport abstractions
//!
//! The panel controller distinguishes command bytes from parameter/pixel
//! bytes with a D/C line, and every burst is framed by chip-select. The
//! [`DisplayTransport`] trait exposes exactly those four steps so that the
//! emulator core can be driven by real hardware or by a recording fake.

use embedded_hal::delay::DelayNs;

/// Byte-level display bus with command/data selection
///
/// A burst starts with [`begin_command`](Self::begin_command) or
/// [`begin_data`](Self::begin_data) and ends with [`end`](Self::end).
/// Calling `begin_data` while a command burst is open only switches the
/// D/C line; chip-select stays asserted so parameters follow their command
/// in the same burst.
pub trait DisplayTransport {
    /// Error type for bus operations
    type Error;

    /// Assert chip-select and mark following bytes as a command
    fn begin_command(&mut self) -> Result<(), Self::Error>;

    /// Assert chip-select and mark following bytes as parameter/pixel data
    fn begin_data(&mut self) -> Result<(), Self::Error>;

    /// Send one byte, blocking until the bus has accepted it
    fn send_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Wait for the last byte to leave the bus and release chip-select
    fn end(&mut self) -> Result<(), Self::Error>;

    /// Send a run of bytes within the current burst
    fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &byte in bytes {
            self.send_byte(byte)?;
        }
        Ok(())
    }

    /// Send a command and its parameters as one uninterrupted burst
    fn write_command(&mut self, command: u8, params: &[u8]) -> Result<(), Self::Error> {
        self.begin_command()?;
        self.send_byte(command)?;
        if !params.is_empty() {
            self.begin_data()?;
            self.send_bytes(params)?;
        }
        self.end()
    }

    /// Pulse the controller's reset line, if the transport owns one
    fn hard_reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        let _ = delay;
        Ok(())
    }
}

/// Strategy for waiting until the bus peripheral can take another byte
///
/// There is no timeout: a peripheral that never becomes ready blocks the
/// caller forever.
pub trait ReadyWait {
    /// Block until the peripheral is ready
    fn wait_ready(&mut self);
}

/// Busy-polls a status predicate until it reports the bus idle
///
/// The predicate returns `true` while the peripheral is still busy
/// (for example a BSY flag in an SPI status register).
pub struct BusyPoll<F> {
    is_busy: F,
}

impl<F> BusyPoll<F>
where
    F: FnMut() -> bool,
{
    /// Create a poller from a "still busy" predicate
    pub fn new(is_busy: F) -> Self {
        Self { is_busy }
    }
}

impl<F> ReadyWait for BusyPoll<F>
where
    F: FnMut() -> bool,
{
    fn wait_ready(&mut self) {
        while (self.is_busy)() {
            core::hint::spin_loop();
        }
    }
}

/// No extra waiting
///
/// For buses whose write call already blocks until the byte is accepted,
/// such as blocking `embedded-hal` SPI implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWait;

impl ReadyWait for NoWait {
    fn wait_ready(&mut self) {}
}
