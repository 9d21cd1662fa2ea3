//! Nokia 5110 Emulator Demo Firmware
//!
//! Drives a CFAF128128B-0145T (ST7735S) module from an STM32F042K6 over
//! SPI1 and runs the Nokia 5110 text and sprite API against it.
//!
//! Wiring:
//! - PA5: SCK
//! - PA7: MOSI
//! - PA3: D/C
//! - PA4: CS
//! - PA2: RESET

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use nokia_emu_display::sprite::BlitOutcome;
use nokia_emu_display::{Emulator, EmulatorConfig};
use embedded_hal::spi::{Phase, Polarity, MODE_0};
use nokia_emu_hal::{SpiConfig, SpiTransport};

/// Settings generated from emulator.toml
mod settings {
    include!(concat!(env!("OUT_DIR"), "/emulator_config.rs"));
}

/// Sprite size in pixels
const SPRITE_WIDTH: usize = 8;
const SPRITE_HEIGHT: usize = 8;

/// Header bytes before the pixel data (file + info header + 16-entry palette)
const BMP_HEADER_LEN: usize = 14 + 40 + 16 * 4;

/// Stored row length: 4 bytes of pixels, already a multiple of 4
const SPRITE_STRIDE: usize = SPRITE_WIDTH / 2;

const SPRITE_LEN: usize = BMP_HEADER_LEN + SPRITE_STRIDE * SPRITE_HEIGHT;

/// Invader, one bit per pixel, top row first
const INVADER: [u8; SPRITE_HEIGHT] = [0x18, 0x3C, 0x7E, 0xDB, 0xFF, 0x24, 0x5A, 0xA5];

/// Build a 4-bit BMP of the invader at compile time
const fn invader_bmp() -> [u8; SPRITE_LEN] {
    let mut bmp = [0u8; SPRITE_LEN];
    bmp[0] = b'B';
    bmp[1] = b'M';
    bmp[2] = SPRITE_LEN as u8;
    bmp[10] = BMP_HEADER_LEN as u8;
    bmp[14] = 40;
    bmp[18] = SPRITE_WIDTH as u8;
    bmp[22] = SPRITE_HEIGHT as u8;
    bmp[26] = 1;
    bmp[28] = 4;

    // Rows are stored bottom first
    let mut stored = 0;
    while stored < SPRITE_HEIGHT {
        let bits = INVADER[SPRITE_HEIGHT - 1 - stored];
        let mut x = 0;
        while x < SPRITE_WIDTH {
            let left = if bits & (0x80 >> x) != 0 { 0xF0 } else { 0x00 };
            let right = if bits & (0x80 >> (x + 1)) != 0 { 0x0F } else { 0x00 };
            bmp[BMP_HEADER_LEN + stored * SPRITE_STRIDE + x / 2] = left | right;
            x += 2;
        }
        stored += 1;
    }
    bmp
}

static INVADER_BMP: [u8; SPRITE_LEN] = invader_bmp();

/// Frame period of the demo loop
const FRAME_MS: u64 = 100;

fn emulator_config() -> EmulatorConfig {
    let mut config = EmulatorConfig::new();
    config.panel_width = settings::PANEL_WIDTH;
    config.panel_height = settings::PANEL_HEIGHT;
    config.column_offset = settings::COLUMN_OFFSET;
    config.row_offset = settings::ROW_OFFSET;
    config.test_pattern = settings::TEST_PATTERN;
    config.title.clear();
    if config.title.push_str(settings::TITLE).is_err() {
        warn!("Title too long, not shown");
        config.title.clear();
    }
    config.subtitle.clear();
    if config.subtitle.push_str(settings::SUBTITLE).is_err() {
        warn!("Subtitle too long, not shown");
        config.subtitle.clear();
    }
    config
}

/// Convert the bus settings into the STM32 SPI peripheral config
fn stm32_spi_config(bus: &SpiConfig) -> spi::Config {
    let mut config = spi::Config::default();
    config.frequency = Hertz(bus.frequency);
    config.mode = spi::Mode {
        polarity: match bus.mode.polarity {
            Polarity::IdleLow => spi::Polarity::IdleLow,
            Polarity::IdleHigh => spi::Polarity::IdleHigh,
        },
        phase: match bus.mode.phase {
            Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
            Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
        },
    };
    config
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Nokia 5110 emulator starting...");

    let p = embassy_stm32::init(Default::default());

    let mode = SpiConfig::mode_from_number(settings::SPI_MODE).unwrap_or(MODE_0);
    let bus = SpiConfig::new(settings::SPI_FREQUENCY_HZ, mode);
    info!("SPI1 at {} Hz", bus.frequency);
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PA5, p.PA7, stm32_spi_config(&bus));

    let dc = Output::new(p.PA3, Level::Low, Speed::VeryHigh);
    let cs = Output::new(p.PA4, Level::High, Speed::VeryHigh);
    let rst = Output::new(p.PA2, Level::High, Speed::VeryHigh);

    let transport = SpiTransport::new(spi, dc, cs, rst);
    let mut emu = match Emulator::with_config(transport, emulator_config()) {
        Ok(emu) => emu,
        Err(e) => {
            error!("Invalid emulator config: {:?}", e);
            return;
        }
    };

    let mut delay = Delay;
    if let Err(e) = emu.init(&mut delay) {
        error!("Failed to initialize panel: {:?}", e);
        return;
    }
    info!("Panel initialized");

    if let Err(e) = emu.out_string("Hello, world!") {
        warn!("Text failed: {:?}", e);
    }
    Timer::after_millis(1000).await;

    let mut frame: u16 = 0;
    let mut x: u8 = 0;
    let mut moving_right = true;

    loop {
        emu.clear_buffer();
        match emu.print_bmp(x, 47, &INVADER_BMP, 0) {
            BlitOutcome::Drawn => {}
            BlitOutcome::Rejected(reason) => warn!("Sprite rejected: {:?}", reason),
        }

        let shown = emu
            .display_buffer()
            .and_then(|()| emu.out_string("Frame"))
            .and_then(|()| emu.out_udec(frame));
        if let Err(e) = shown {
            error!("Frame {} failed: {:?}", frame, e);
        }

        let max_x = (nokia_emu_display::SCREEN_WIDTH as usize - SPRITE_WIDTH) as u8;
        if moving_right {
            if x >= max_x {
                moving_right = false;
            } else {
                x += 1;
            }
        } else if x == 0 {
            moving_right = true;
        } else {
            x -= 1;
        }

        frame = frame.wrapping_add(1);
        Timer::after_millis(FRAME_MS).await;
    }
}
