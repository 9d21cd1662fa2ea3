//! Emulator error types

/// Errors from emulator operations
///
/// `E` is the error type of the underlying [`DisplayTransport`].
///
/// [`DisplayTransport`]: nokia_emu_hal::DisplayTransport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmulatorError<E> {
    /// The bus transport failed
    Transport(E),
    /// Requested window width is odd
    ///
    /// Pixels are sent two at a time, so an odd-width window would leave
    /// the controller's write pointer half a pixel pair out of step.
    OddWindowWidth(u16),
    /// Requested window has zero width or height
    EmptyWindow,
    /// Requested window would extend past the panel edge
    WindowOutOfBounds,
    /// Pixel buffer is shorter than the active window needs
    BufferTooSmall,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Panel is smaller than the emulated 84x48 screen
    PanelTooSmall,
    /// Panel width is odd, so the full-panel window cannot be addressed
    OddPanelWidth,
}
