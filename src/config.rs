//! Pin descriptors and driver configuration
//!
//! Wiring mistakes are configuration-time bugs, not runtime conditions, so
//! everything here validates at construction. A [`PinDescriptor`] can only be
//! created for a pin that is actually usable as bus GPIO, and a [`Config`] can
//! only be built once every required role has a pin.
//!
//! ## Example
//!
//! ```
//! use hd44780_parallel::{Builder, ClockDomain, PinDescriptor, Port};
//!
//! fn pin(port: Port, bit: u8) -> PinDescriptor {
//!     match PinDescriptor::new(port.clock_domain(), port, 1 << bit) {
//!         Ok(pin) => pin,
//!         Err(e) => unreachable!("valid wiring: {e}"),
//!     }
//! }
//!
//! let config = Builder::new()
//!     .register_select(pin(Port::B, 0))
//!     .read_write(pin(Port::B, 1))
//!     .enable(pin(Port::B, 4))
//!     .data_pins([
//!         pin(Port::E, 1),
//!         pin(Port::E, 2),
//!         pin(Port::E, 3),
//!         pin(Port::E, 4),
//!     ])
//!     .build();
//! assert!(config.is_ok());
//! ```

use crate::error::ConfigError;
use crate::hal::{ClockDomain, Port};
use crate::timing::MAX_TIME_SCALER;

/// Default bus timing scaler, tuned for an 80 MHz system clock
///
/// See [`Timing`](crate::timing::Timing) for why this is not a free knob.
pub const DEFAULT_TIME_SCALER: u32 = 7_000;

/// Pins reserved for fixed board functions, per port
///
/// Bit set = pin unusable as bus GPIO. PA0-PA1 console UART, PA2-PA5 SSI,
/// PB2-PB3 I2C, PC0-PC3 JTAG/SWD, PD7 and PF0 NMI.
const RESERVED_PINS: [u8; 6] = [
    0b0011_1111, // Port A
    0b0000_1100, // Port B
    0b0000_1111, // Port C
    0b1000_0000, // Port D
    0b0000_0000, // Port E
    0b0000_0001, // Port F
];

/// Role a pin plays on the bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinRole {
    /// RS line: selects instruction or data register
    RegisterSelect,
    /// R/W line: selects read or write
    ReadWrite,
    /// E line: the latch strobe
    Enable,
    /// Optional backlight switch (relay/transistor, not an HD44780 line)
    Backlight,
    /// Data line D4
    Data0,
    /// Data line D5
    Data1,
    /// Data line D6
    Data2,
    /// Data line D7
    Data3,
}

/// One GPIO pin: its clock domain, port, and single-bit mask
///
/// Immutable after construction; [`PinDescriptor::new`] is the only way to
/// obtain one and refuses reserved or malformed assignments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinDescriptor {
    clock_domain: ClockDomain,
    port: Port,
    pin_mask: u8,
}

impl PinDescriptor {
    /// Create a validated pin descriptor
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidPinMask`] unless exactly one bit of `pin_mask`
    ///   is set
    /// - [`ConfigError::ClockDomainMismatch`] if `clock_domain` is not the
    ///   domain feeding `port`
    /// - [`ConfigError::ReservedPin`] if the pin is on the reserved-pin
    ///   blacklist
    pub fn new(clock_domain: ClockDomain, port: Port, pin_mask: u8) -> Result<Self, ConfigError> {
        if pin_mask.count_ones() != 1 {
            return Err(ConfigError::InvalidPinMask { mask: pin_mask });
        }
        if clock_domain != port.clock_domain() {
            return Err(ConfigError::ClockDomainMismatch { port });
        }
        if RESERVED_PINS[port.index()] & pin_mask != 0 {
            return Err(ConfigError::ReservedPin {
                port,
                mask: pin_mask,
            });
        }
        Ok(Self {
            clock_domain,
            port,
            pin_mask,
        })
    }

    /// Clock domain feeding this pin's port
    #[must_use]
    pub const fn clock_domain(&self) -> ClockDomain {
        self.clock_domain
    }

    /// Port the pin lives on
    #[must_use]
    pub const fn port(&self) -> Port {
        self.port
    }

    /// Single-bit pin mask within the port
    #[must_use]
    pub const fn pin_mask(&self) -> u8 {
        self.pin_mask
    }
}

/// Driver configuration
///
/// Holds the full pin assignment plus the power-up option flags written
/// during [`Lcd::enable`](crate::display::Lcd::enable). Built with
/// [`Builder`]; copied into the driver, which owns its copy exclusively.
#[derive(Clone, Debug)]
pub struct Config {
    /// RS line
    pub register_select: PinDescriptor,
    /// R/W line
    pub read_write: PinDescriptor,
    /// E line
    pub enable: PinDescriptor,
    /// Optional backlight switch pin
    pub backlight: Option<PinDescriptor>,
    /// Data lines D4-D7, least significant nibble bit first
    pub data: [PinDescriptor; 4],
    /// Function set: drive the panel in two-line mode
    pub two_line_mode: bool,
    /// Function set: use the 5x10 font instead of 5x8
    pub font_5x10: bool,
    /// Entry mode: cursor moves right after each write
    pub cursor_moves_right: bool,
    /// Entry mode: shift the whole display on write
    pub display_shift_on_write: bool,
    /// Display control: display on after enable
    pub display_on: bool,
    /// Display control: cursor visible after enable
    pub cursor_on: bool,
    /// Display control: cursor blinks after enable
    pub cursor_blink: bool,
    /// Multiplier applied to every scaled datasheet wait
    pub time_scaler: u32,
}

/// Builder for [`Config`]
///
/// Pin roles have no defaults and must all be assigned (backlight excepted);
/// option flags default to the common 16x2 setup: two lines, 5x8 font, cursor
/// advancing right, display/cursor/blink all on.
#[must_use]
pub struct Builder {
    register_select: Option<PinDescriptor>,
    read_write: Option<PinDescriptor>,
    enable: Option<PinDescriptor>,
    backlight: Option<PinDescriptor>,
    data: Option<[PinDescriptor; 4]>,
    two_line_mode: bool,
    font_5x10: bool,
    cursor_moves_right: bool,
    display_shift_on_write: bool,
    display_on: bool,
    cursor_on: bool,
    cursor_blink: bool,
    time_scaler: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            register_select: None,
            read_write: None,
            enable: None,
            backlight: None,
            data: None,
            two_line_mode: true,
            font_5x10: false,
            cursor_moves_right: true,
            display_shift_on_write: false,
            display_on: true,
            cursor_on: true,
            cursor_blink: true,
            time_scaler: DEFAULT_TIME_SCALER,
        }
    }
}

impl Builder {
    /// Create a new builder with default option flags
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the RS pin (required)
    pub fn register_select(mut self, pin: PinDescriptor) -> Self {
        self.register_select = Some(pin);
        self
    }

    /// Assign the R/W pin (required)
    pub fn read_write(mut self, pin: PinDescriptor) -> Self {
        self.read_write = Some(pin);
        self
    }

    /// Assign the E pin (required)
    pub fn enable(mut self, pin: PinDescriptor) -> Self {
        self.enable = Some(pin);
        self
    }

    /// Assign the backlight pin (optional)
    pub fn backlight(mut self, pin: PinDescriptor) -> Self {
        self.backlight = Some(pin);
        self
    }

    /// Assign the four data pins D4-D7 (required)
    pub fn data_pins(mut self, pins: [PinDescriptor; 4]) -> Self {
        self.data = Some(pins);
        self
    }

    /// Set two-line mode for the power-up function set
    pub fn two_line_mode(mut self, on: bool) -> Self {
        self.two_line_mode = on;
        self
    }

    /// Select the 5x10 font for the power-up function set
    pub fn font_5x10(mut self, on: bool) -> Self {
        self.font_5x10 = on;
        self
    }

    /// Set the entry-mode cursor direction
    pub fn cursor_moves_right(mut self, on: bool) -> Self {
        self.cursor_moves_right = on;
        self
    }

    /// Shift the whole display on each write
    pub fn display_shift_on_write(mut self, on: bool) -> Self {
        self.display_shift_on_write = on;
        self
    }

    /// Display on/off after enable
    pub fn display_on(mut self, on: bool) -> Self {
        self.display_on = on;
        self
    }

    /// Cursor visible after enable
    pub fn cursor_on(mut self, on: bool) -> Self {
        self.cursor_on = on;
        self
    }

    /// Cursor blink after enable
    pub fn cursor_blink(mut self, on: bool) -> Self {
        self.cursor_blink = on;
        self
    }

    /// Override the bus timing scaler
    ///
    /// Must lie in `1..=MAX_TIME_SCALER`; [`build`](Self::build) rejects
    /// anything else. Too small a value corrupts transfers silently; see
    /// [`Timing`](crate::timing::Timing).
    pub fn time_scaler(mut self, scaler: u32) -> Self {
        self.time_scaler = scaler;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingPin`] when a required role has no pin;
    /// [`ConfigError::TimeScalerOutOfRange`] for a zero or oversized scaler.
    pub fn build(self) -> Result<Config, ConfigError> {
        if self.time_scaler == 0 || self.time_scaler > MAX_TIME_SCALER {
            return Err(ConfigError::TimeScalerOutOfRange {
                scaler: self.time_scaler,
            });
        }
        Ok(Config {
            register_select: self
                .register_select
                .ok_or(ConfigError::MissingPin(PinRole::RegisterSelect))?,
            read_write: self
                .read_write
                .ok_or(ConfigError::MissingPin(PinRole::ReadWrite))?,
            enable: self.enable.ok_or(ConfigError::MissingPin(PinRole::Enable))?,
            backlight: self.backlight,
            data: self.data.ok_or(ConfigError::MissingPin(PinRole::Data0))?,
            two_line_mode: self.two_line_mode,
            font_5x10: self.font_5x10,
            cursor_moves_right: self.cursor_moves_right,
            display_shift_on_write: self.display_shift_on_write,
            display_on: self.display_on,
            cursor_on: self.cursor_on,
            cursor_blink: self.cursor_blink,
            time_scaler: self.time_scaler,
        })
    }
}
