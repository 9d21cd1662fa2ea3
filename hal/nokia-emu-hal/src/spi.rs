//! SPI bus transport
//!
//! Implements [`DisplayTransport`] on top of an `embedded-hal` SPI bus plus
//! the D/C, chip-select and reset lines of a 4-wire serial panel.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Mode, SpiBus, MODE_0, MODE_1, MODE_2, MODE_3};

use crate::transport::{DisplayTransport, NoWait, ReadyWait};

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity and phase
    pub mode: Mode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        // 8 MHz, comfortably below the ST7735S limit
        Self::new(8_000_000, MODE_0)
    }
}

impl SpiConfig {
    pub fn new(frequency: u32, mode: Mode) -> Self {
        Self { frequency, mode }
    }

    /// Look up SPI mode 0-3 by number
    pub fn mode_from_number(number: u8) -> Option<Mode> {
        match number {
            0 => Some(MODE_0),
            1 => Some(MODE_1),
            2 => Some(MODE_2),
            3 => Some(MODE_3),
            _ => None,
        }
    }
}

/// Errors from the SPI transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiTransportError<E> {
    /// The SPI bus reported an error
    Spi(E),
    /// Driving the D/C, CS or reset line failed
    Pin,
}

/// Reset pulse low time (datasheet minimum is 10 µs)
const RESET_PULSE_MS: u32 = 1;

/// Time the controller needs after reset before it accepts commands
const RESET_SETTLE_MS: u32 = 150;

/// Display transport over a 4-wire SPI bus
///
/// - `dc`: low for commands, high for data
/// - `cs`: active-low chip-select
/// - `rst`: active-low controller reset
pub struct SpiTransport<SPI, DC, CS, RST, W = NoWait> {
    spi: SPI,
    dc: DC,
    cs: CS,
    rst: RST,
    wait: W,
    selected: bool,
}

impl<SPI, DC, CS, RST> SpiTransport<SPI, DC, CS, RST, NoWait>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    /// Create a transport for a bus whose writes already block
    pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST) -> Self {
        Self::with_wait(spi, dc, cs, rst, NoWait)
    }
}

impl<SPI, DC, CS, RST, W> SpiTransport<SPI, DC, CS, RST, W>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    W: ReadyWait,
{
    /// Create a transport with an explicit ready-wait strategy
    pub fn with_wait(spi: SPI, dc: DC, cs: CS, rst: RST, wait: W) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            wait,
            selected: false,
        }
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, DC, CS, RST) {
        (self.spi, self.dc, self.cs, self.rst)
    }

    /// Finish clocking out the current burst before D/C changes
    ///
    /// D/C is sampled with the last bit of each byte.
    fn drain(&mut self) -> Result<(), SpiTransportError<SPI::Error>> {
        if self.selected {
            self.wait.wait_ready();
            self.spi.flush().map_err(SpiTransportError::Spi)?;
        }
        Ok(())
    }

    fn select(&mut self) -> Result<(), SpiTransportError<SPI::Error>> {
        if !self.selected {
            self.cs.set_low().map_err(|_| SpiTransportError::Pin)?;
            self.selected = true;
        }
        Ok(())
    }
}

impl<SPI, DC, CS, RST, W> DisplayTransport for SpiTransport<SPI, DC, CS, RST, W>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    W: ReadyWait,
{
    type Error = SpiTransportError<SPI::Error>;

    fn begin_command(&mut self) -> Result<(), Self::Error> {
        self.drain()?;
        self.dc.set_low().map_err(|_| SpiTransportError::Pin)?;
        self.select()
    }

    fn begin_data(&mut self) -> Result<(), Self::Error> {
        self.drain()?;
        self.dc.set_high().map_err(|_| SpiTransportError::Pin)?;
        self.select()
    }

    fn send_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.wait.wait_ready();
        self.spi.write(&[byte]).map_err(SpiTransportError::Spi)
    }

    fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.wait.wait_ready();
        self.spi.write(bytes).map_err(SpiTransportError::Spi)
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        self.wait.wait_ready();
        self.spi.flush().map_err(SpiTransportError::Spi)?;
        self.cs.set_high().map_err(|_| SpiTransportError::Pin)?;
        self.selected = false;
        Ok(())
    }

    fn hard_reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        self.cs.set_high().map_err(|_| SpiTransportError::Pin)?;
        self.selected = false;
        self.rst.set_low().map_err(|_| SpiTransportError::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(|_| SpiTransportError::Pin)?;
        delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }
}
