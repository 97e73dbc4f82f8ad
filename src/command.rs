//! HD44780 instruction encoding
//!
//! Pure byte builders for the controller's instruction set, plus the handful
//! of fixed opcodes the driver issues verbatim. Nothing here touches
//! hardware; the [`interface`](crate::interface) module shifts these bytes
//! onto the bus a nibble at a time.
//!
//! Wire format (instruction register, write):
//!
//! | Byte            | Meaning                                        |
//! |-----------------|------------------------------------------------|
//! | `0000_0001`     | Clear display, address counter to 0            |
//! | `0000_0010`     | Return home without clearing                   |
//! | `0000_01xx`     | Entry mode set                                 |
//! | `0000_1xxx`     | Display control                                |
//! | `0001_xxxx`     | Cursor/display shift                           |
//! | `001x_xxxx`     | Function set                                   |
//! | `addr \| 0x40`  | Set CGRAM address counter                      |
//! | `addr \| 0x80`  | Set DDRAM address counter                      |
//! | `1100_0000`     | DDRAM address 0x40: start of the second line   |

/// Clear the display and reset the address counter to DDRAM 0
pub const CLEAR_DISPLAY: u8 = 0b0000_0001;

/// Return the cursor home without clearing
pub const RETURN_HOME: u8 = 0b0000_0010;

/// Jump to the start of the second display line
///
/// This is `set_ddram_address(0x40)` spelled as a constant; the text
/// interpreter emits it for `\n`.
pub const LINE_TWO: u8 = 0xC0;

/// 4-bit wake command sent three times during the power-on ritual
///
/// Forces the controller out of whatever bus width it powered up in.
pub const WAKE_NIBBLE: u8 = 0b0011;

/// 4-bit command switching the controller to 4-bit bus mode
///
/// Sent once, immediately before the first full function-set byte.
pub const FOUR_BIT_NIBBLE: u8 = 0b0010;

/// Bit position of the busy flag in an instruction register read
pub const BUSY_FLAG_BIT: u8 = 7;

/// Mask extracting the 7-bit address counter from an instruction read
pub const ADDRESS_COUNTER_MASK: u8 = 0x7F;

/// Encode an entry-mode-set instruction
///
/// `cursor_moves_right` advances the address counter after each access;
/// `display_shifts_on_write` scrolls the whole display instead of moving the
/// cursor.
#[must_use]
pub const fn entry_mode(cursor_moves_right: bool, display_shifts_on_write: bool) -> u8 {
    let mut byte = 0b0000_0100;
    if cursor_moves_right {
        byte |= 1 << 1;
    }
    if display_shifts_on_write {
        byte |= 1 << 0;
    }
    byte
}

/// Encode a display-control instruction
#[must_use]
pub const fn display_control(display_on: bool, cursor_on: bool, cursor_blinks: bool) -> u8 {
    let mut byte = 0b0000_1000;
    if display_on {
        byte |= 1 << 2;
    }
    if cursor_on {
        byte |= 1 << 1;
    }
    if cursor_blinks {
        byte |= 1 << 0;
    }
    byte
}

/// Encode a function-set instruction
///
/// `eight_bit_bus` is always false on the shipped 4-pin path; the parameter
/// exists because the instruction has the bit.
#[must_use]
pub const fn function_set(eight_bit_bus: bool, two_lines: bool, font_5x10: bool) -> u8 {
    let mut byte = 0b0010_0000;
    if eight_bit_bus {
        byte |= 1 << 4;
    }
    if two_lines {
        byte |= 1 << 3;
    }
    if font_5x10 {
        byte |= 1 << 2;
    }
    byte
}

/// Encode a cursor/display-shift instruction
#[must_use]
pub const fn cursor_display_shift(shift_display: bool, shift_right: bool) -> u8 {
    let mut byte = 0b0001_0000;
    if shift_display {
        byte |= 1 << 3;
    }
    if shift_right {
        byte |= 1 << 2;
    }
    byte
}

/// Encode a set-DDRAM-address instruction
#[must_use]
pub const fn set_ddram_address(addr: u8) -> u8 {
    0x80 | (addr & ADDRESS_COUNTER_MASK)
}

/// Encode a set-CGRAM-address instruction
#[must_use]
pub const fn set_cgram_address(addr: u8) -> u8 {
    0x40 | (addr & 0x3F)
}
