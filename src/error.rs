//! Error types for the driver
//!
//! Two layers, mirroring when a mistake can be caught:
//!
//! - [`ConfigError`] - wiring/configuration mistakes, reported while the
//!   [`Config`](crate::config::Config) is being built. A reserved pin or a
//!   malformed mask is a hardware design bug; construction refuses it outright
//!   rather than letting the driver run on a broken bus.
//! - [`Error`] - runtime misuse of an otherwise valid driver: operations
//!   issued out of lifecycle order, oversized text, out-of-range coordinates.
//!
//! Electrical and timing faults have no error type. The HD44780 bus carries
//! no acknowledgement, so a mistimed wait or a loose wire is invisible to
//! software; the only symptom is garbled content on the glass.

use crate::config::PinRole;
use crate::display::State;
use crate::hal::Port;

/// Errors reported while building a [`Config`](crate::config::Config)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Pin mask does not have exactly one bit set
    InvalidPinMask {
        /// The offending mask
        mask: u8,
    },
    /// The descriptor's clock domain does not feed its port
    ClockDomainMismatch {
        /// Port named in the descriptor
        port: Port,
    },
    /// The pin is reserved for a fixed board function (console UART, SSI,
    /// I2C, JTAG, NMI) and cannot be used as bus GPIO
    ReservedPin {
        /// Port of the reserved pin
        port: Port,
        /// Single-bit mask of the reserved pin
        mask: u8,
    },
    /// A required pin role was never assigned to the builder
    MissingPin(PinRole),
    /// Timing scaler outside `1..=MAX_TIME_SCALER`
    ///
    /// Zero would underflow the rise-time compensation; past the ceiling the
    /// scaled cycle time no longer fits `u32`.
    TimeScalerOutOfRange {
        /// The rejected scaler
        scaler: u32,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidPinMask { mask } => {
                write!(f, "pin mask {mask:#04x} must have exactly one bit set")
            }
            Self::ClockDomainMismatch { port } => {
                write!(f, "clock domain does not feed port {port:?}")
            }
            Self::ReservedPin { port, mask } => {
                write!(f, "pin {mask:#04x} on port {port:?} is reserved")
            }
            Self::MissingPin(role) => write!(f, "no pin assigned for {role:?}"),
            Self::TimeScalerOutOfRange { scaler } => {
                write!(f, "timing scaler {scaler} outside the accepted range")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Errors reported by [`Lcd`](crate::display::Lcd) operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Operation requires a later lifecycle state
    ///
    /// `init()` must run before `enable()`, and `enable()` before any
    /// content operation.
    InvalidState {
        /// State the operation requires
        required: State,
        /// State the driver is actually in
        actual: State,
    },
    /// Text buffer exceeds [`MAX_TEXT_LEN`](crate::text::MAX_TEXT_LEN)
    TextTooLong {
        /// Length of the rejected buffer
        len: usize,
        /// Maximum accepted length
        max: usize,
    },
    /// Cursor coordinate outside the 16x2 character grid
    CursorOutOfRange {
        /// Requested column
        x: u8,
        /// Requested line
        y: u8,
    },
    /// Custom glyph slot outside `0..MAX_CUSTOM_GLYPHS`
    GlyphSlotOutOfRange {
        /// Requested slot
        slot: u8,
    },
    /// A RAM transfer of zero bytes was requested
    ZeroLengthTransfer,
    /// `set_backlight` was called but no backlight pin is configured
    BacklightNotConfigured,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidState { required, actual } => {
                write!(f, "driver is {actual:?}, operation requires {required:?}")
            }
            Self::TextTooLong { len, max } => {
                write!(f, "text of {len} bytes exceeds the {max} byte limit")
            }
            Self::CursorOutOfRange { x, y } => write!(f, "cursor ({x}, {y}) is off the display"),
            Self::GlyphSlotOutOfRange { slot } => write!(f, "glyph slot {slot} out of range"),
            Self::ZeroLengthTransfer => write!(f, "zero-length RAM transfer"),
            Self::BacklightNotConfigured => write!(f, "no backlight pin configured"),
        }
    }
}

impl core::error::Error for Error {}
