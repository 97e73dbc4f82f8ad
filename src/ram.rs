//! Controller memory addressing
//!
//! The HD44780 exposes two memories through one 7-bit address counter:
//! Display Data RAM (the characters on the glass) and Character Generator RAM
//! (eight user-defined 5x8 glyph bitmaps). This module holds the pure
//! coordinate-to-address arithmetic; the driver facade issues the actual
//! set-address instructions.
//!
//! The counter auto-increments on every RAM access, reads included. Callers
//! reading multi-byte ranges inherit that movement.

use crate::command;
use crate::error::Error;

/// Characters per display line
pub const COLUMNS: u8 = 16;
/// Display lines
pub const LINES: u8 = 2;
/// DDRAM address of the first character of the second line
pub const LINE_OFFSET: u8 = 0x40;

/// Number of custom glyph slots in CGRAM
pub const MAX_CUSTOM_GLYPHS: u8 = 8;
/// Bytes per glyph pattern: one per pixel row
pub const GLYPH_ROWS: usize = 8;

/// Which controller memory an address targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RamTarget {
    /// Display Data RAM
    DisplayData,
    /// Character Generator RAM
    CharacterGenerator,
}

/// DDRAM address of a cursor coordinate
///
/// # Errors
///
/// [`Error::CursorOutOfRange`] unless `x < 16` and `y < 2`.
pub const fn ddram_address(x: u8, y: u8) -> Result<u8, Error> {
    if x >= COLUMNS || y >= LINES {
        return Err(Error::CursorOutOfRange { x, y });
    }
    Ok(y * LINE_OFFSET + x)
}

/// CGRAM base address of a glyph slot
///
/// # Errors
///
/// [`Error::GlyphSlotOutOfRange`] unless `slot < MAX_CUSTOM_GLYPHS`.
pub const fn cgram_address(slot: u8) -> Result<u8, Error> {
    if slot >= MAX_CUSTOM_GLYPHS {
        return Err(Error::GlyphSlotOutOfRange { slot });
    }
    Ok(slot * GLYPH_ROWS as u8)
}

/// Instruction byte positioning the address counter
#[must_use]
pub const fn address_command(addr: u8, target: RamTarget) -> u8 {
    match target {
        RamTarget::DisplayData => command::set_ddram_address(addr),
        RamTarget::CharacterGenerator => command::set_cgram_address(addr),
    }
}
