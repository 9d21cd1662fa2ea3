//! ST7735S command set and power-on sequence
//!
//! Only the commands the emulator issues are listed. The power-on sequence
//! is fixed data for the CFAF128128B-0145T module: frame rates, power
//! levels and gamma curves tuned by the module vendor.

/// ST7735S commands
pub mod cmd {
    /// Sleep out and booster on
    pub const SLPOUT: u8 = 0x11;
    /// Display on
    pub const DISPON: u8 = 0x29;
    /// Column address set
    pub const CASET: u8 = 0x2A;
    /// Row address set
    pub const RASET: u8 = 0x2B;
    /// Memory write
    pub const RAMWR: u8 = 0x2C;
    /// Memory data access control
    pub const MADCTL: u8 = 0x36;
    /// Interface pixel format
    pub const COLMOD: u8 = 0x3A;
    /// Frame rate control, normal mode
    pub const FRMCTR1: u8 = 0xB1;
    /// Frame rate control, idle mode
    pub const FRMCTR2: u8 = 0xB2;
    /// Frame rate control, partial mode
    pub const FRMCTR3: u8 = 0xB3;
    /// Display inversion control
    pub const INVCTR: u8 = 0xB4;
    /// Power control 1 (GVDD)
    pub const PWCTR1: u8 = 0xC0;
    /// Power control 2 (VGH/VGL)
    pub const PWCTR2: u8 = 0xC1;
    /// Power control 3, normal mode
    pub const PWCTR3: u8 = 0xC2;
    /// Power control 4, idle mode
    pub const PWCTR4: u8 = 0xC3;
    /// Power control 5, partial mode
    pub const PWCTR5: u8 = 0xC4;
    /// VCOM control
    pub const VMCTR1: u8 = 0xC5;
    /// Positive gamma correction
    pub const GAMCTRP1: u8 = 0xE0;
    /// Negative gamma correction
    pub const GAMCTRN1: u8 = 0xE1;
}

/// COLMOD parameter for 12 bits per pixel (RRRRGGGG BBBBRRRR GGGGBBBB)
pub const COLMOD_12BIT: u8 = 0x03;

/// COLMOD parameter for 18 bits per pixel (controller default)
pub const COLMOD_18BIT: u8 = 0x06;

/// MADCTL: row and column address order reversed (MY | MX)
pub const MADCTL_MY_MX: u8 = 0xC0;

/// One step of the power-on sequence
#[derive(Debug, Clone, Copy)]
pub struct InitStep {
    /// Command byte
    pub command: u8,
    /// Parameter bytes sent in the same burst
    pub params: &'static [u8],
    /// Delay after the command in milliseconds
    pub delay_ms: u32,
}

const fn step(command: u8, params: &'static [u8], delay_ms: u32) -> InitStep {
    InitStep {
        command,
        params,
        delay_ms,
    }
}

/// Power-on sequence, sent after the hardware reset
pub const INIT_SEQUENCE: &[InitStep] = &[
    step(cmd::SLPOUT, &[], 120),
    step(cmd::FRMCTR1, &[0x01, 0x2C, 0x2D], 0),
    step(cmd::FRMCTR2, &[0x01, 0x2C, 0x2D], 0),
    step(cmd::FRMCTR3, &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D], 0),
    step(cmd::INVCTR, &[0x07], 0),
    step(cmd::PWCTR1, &[0x02, 0x02], 0),
    step(cmd::PWCTR2, &[0xC5], 0),
    step(cmd::PWCTR3, &[0x0D, 0x00], 0),
    step(cmd::PWCTR4, &[0x8D, 0x1A], 0),
    step(cmd::PWCTR5, &[0x8D, 0xEE], 0),
    step(cmd::VMCTR1, &[0x51, 0x4D], 0),
    step(
        cmd::GAMCTRP1,
        &[
            0x0A, 0x1C, 0x0C, 0x14, 0x33, 0x2B, 0x24, 0x28, 0x27, 0x25, 0x2C, 0x39, 0x00, 0x05,
            0x03, 0x0D,
        ],
        0,
    ),
    step(
        cmd::GAMCTRN1,
        &[
            0x0A, 0x1C, 0x0C, 0x14, 0x33, 0x2B, 0x24, 0x28, 0x27, 0x25, 0x2D, 0x3A, 0x00, 0x05,
            0x03, 0x0D,
        ],
        0,
    ),
    step(cmd::COLMOD, &[COLMOD_18BIT], 0),
    step(cmd::DISPON, &[], 1),
    step(cmd::MADCTL, &[MADCTL_MY_MX], 0),
    // Switch to 12-bit pixels last; the pixel packer depends on it
    step(cmd::COLMOD, &[COLMOD_12BIT], 0),
];

/// Encode a start/end address pair for CASET or RASET (big-endian)
pub fn address_params(start: u16, end: u16) -> [u8; 4] {
    let [start_hi, start_lo] = start.to_be_bytes();
    let [end_hi, end_lo] = end.to_be_bytes();
    [start_hi, start_lo, end_hi, end_lo]
}
