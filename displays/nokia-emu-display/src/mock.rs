//! Recording ST7735S stand-in for unit tests
//!
//! Decodes the command stream the way the controller does: CASET/RASET set
//! the address window, RAMWR starts a memory write, and 12-bit pixel pairs
//! fill the window row by row. Panel RAM can then be read back to check what
//! the emulator actually drew.

use std::vec;
use std::vec::Vec;

use nokia_emu_hal::DisplayTransport;

use crate::command::cmd;
use crate::pack::unpack_pair;
use crate::window::PanelGeometry;

/// Controller RAM size (ST7735S)
const RAM_COLUMNS: usize = 132;
const RAM_ROWS: usize = 162;

/// Value of RAM cells that were never written
pub const UNWRITTEN: u16 = 0x0F0;

/// Error returned once a failing panel's byte budget is used up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Command,
    Data,
}

pub struct MockPanel {
    geometry: PanelGeometry,
    ram: Vec<u16>,
    phase: Phase,
    commands: Vec<(u8, Vec<u8>)>,
    raw_data: Vec<u8>,
    pending: Vec<u8>,
    columns: (usize, usize),
    rows: (usize, usize),
    write_at: (usize, usize),
    bytes_sent: usize,
    stray_bytes: usize,
    data_bursts: usize,
    pixels_written: usize,
    resets: usize,
    fail_after: Option<usize>,
}

impl MockPanel {
    pub fn new() -> Self {
        Self {
            geometry: PanelGeometry::CFAF128128B,
            ram: vec![UNWRITTEN; RAM_COLUMNS * RAM_ROWS],
            phase: Phase::Idle,
            commands: Vec::new(),
            raw_data: Vec::new(),
            pending: Vec::new(),
            columns: (0, RAM_COLUMNS - 1),
            rows: (0, RAM_ROWS - 1),
            write_at: (0, 0),
            bytes_sent: 0,
            stray_bytes: 0,
            data_bursts: 0,
            pixels_written: 0,
            resets: 0,
            fail_after: None,
        }
    }

    /// Panel whose bus fails once `limit` bytes have been accepted
    pub fn failing_after(limit: usize) -> Self {
        let mut panel = Self::new();
        panel.fail_after = Some(limit);
        panel
    }

    /// Change the byte budget, counted from the last [`clear_log`](Self::clear_log)
    pub fn set_fail_after(&mut self, limit: Option<usize>) {
        self.fail_after = limit;
    }

    /// Commands received, each with its parameter bytes
    ///
    /// Pixel data after RAMWR is not included.
    pub fn commands(&self) -> Vec<(u8, Vec<u8>)> {
        self.commands.clone()
    }

    pub fn clear_log(&mut self) {
        self.commands.clear();
        self.raw_data.clear();
        self.bytes_sent = 0;
        self.data_bursts = 0;
        self.pixels_written = 0;
    }

    /// Pixel data bytes, in the order received
    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    pub fn bytes_sent(&self) -> usize {
        self.bytes_sent
    }

    pub fn stray_bytes(&self) -> usize {
        self.stray_bytes
    }

    pub fn data_bursts(&self) -> usize {
        self.data_bursts
    }

    pub fn pixels_written(&self) -> usize {
        self.pixels_written
    }

    pub fn resets(&self) -> usize {
        self.resets
    }

    /// Colour at a visible panel position
    pub fn panel_pixel(&self, x: u16, y: u16) -> u16 {
        let column = usize::from(x + self.geometry.column_offset);
        let row = usize::from(y + self.geometry.row_offset);
        self.ram[row * RAM_COLUMNS + column]
    }

    /// Colour at a position on the emulated screen
    pub fn screen_pixel(&self, x: u16, y: u16) -> u16 {
        let (origin_x, origin_y) = self.geometry.centred_origin();
        self.panel_pixel(origin_x + x, origin_y + y)
    }

    fn last_command(&self) -> Option<u8> {
        self.commands.last().map(|(command, _)| *command)
    }

    fn receive_data(&mut self, byte: u8) {
        match self.last_command() {
            Some(cmd::RAMWR) => {
                self.raw_data.push(byte);
                self.pending.push(byte);
                if self.pending.len() == 3 {
                    let (first, second) =
                        unpack_pair([self.pending[0], self.pending[1], self.pending[2]]);
                    self.pending.clear();
                    self.write_pixel(first);
                    self.write_pixel(second);
                }
            }
            Some(_) => {
                if let Some((command, params)) = self.commands.last_mut() {
                    params.push(byte);
                    let command = *command;
                    if params.len() == 4 {
                        let start = usize::from(u16::from_be_bytes([params[0], params[1]]));
                        let end = usize::from(u16::from_be_bytes([params[2], params[3]]));
                        match command {
                            cmd::CASET => self.columns = (start, end),
                            cmd::RASET => self.rows = (start, end),
                            _ => {}
                        }
                    }
                }
            }
            None => self.raw_data.push(byte),
        }
    }

    fn write_pixel(&mut self, colour: u16) {
        let (column, row) = self.write_at;
        if column < RAM_COLUMNS && row < RAM_ROWS {
            self.ram[row * RAM_COLUMNS + column] = colour;
        }
        self.pixels_written += 1;

        let mut next = (column + 1, row);
        if next.0 > self.columns.1 {
            next = (self.columns.0, row + 1);
            if next.1 > self.rows.1 {
                next.1 = self.rows.0;
            }
        }
        self.write_at = next;
    }
}

impl DisplayTransport for MockPanel {
    type Error = BusFault;

    fn begin_command(&mut self) -> Result<(), Self::Error> {
        self.phase = Phase::Command;
        Ok(())
    }

    fn begin_data(&mut self) -> Result<(), Self::Error> {
        if self.phase == Phase::Idle {
            self.data_bursts += 1;
        }
        self.phase = Phase::Data;
        Ok(())
    }

    fn send_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        if self.fail_after.is_some_and(|limit| self.bytes_sent >= limit) {
            return Err(BusFault);
        }
        self.bytes_sent += 1;
        match self.phase {
            Phase::Idle => self.stray_bytes += 1,
            Phase::Command => {
                self.commands.push((byte, Vec::new()));
                if byte == cmd::RAMWR {
                    self.write_at = (self.columns.0, self.rows.0);
                    self.pending.clear();
                }
            }
            Phase::Data => self.receive_data(byte),
        }
        Ok(())
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        self.phase = Phase::Idle;
        Ok(())
    }

    fn hard_reset<D: embedded_hal::delay::DelayNs>(
        &mut self,
        _delay: &mut D,
    ) -> Result<(), Self::Error> {
        self.resets += 1;
        Ok(())
    }
}

/// Delay that only adds up the time requested
#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
