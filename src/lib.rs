//! HD44780 Character LCD Driver, 4-Pin Parallel Bus
//!
//! A bit-banged driver for HD44780-class 16x2 character LCDs wired over the
//! 4-bit parallel interface (RS, R/W, E plus four data lines), with an
//! optional backlight switch pin.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 `DelayNs` for all bus timing
//! - Generic over narrow [`Gpio`]/[`ClockControl`] traits; no PAC dependency
//! - Validated pin configuration with a reserved-pin blacklist
//! - Datasheet-derived bus timing with a configurable safety scaler
//! - Text interpreter: `\n` line jump and `` `N `` custom glyph escapes
//! - Eight programmable CGRAM glyphs
//! - Busy flag, address counter, and RAM read-back
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hd44780_parallel::{
//!     Builder, ClockControl, ClockDomain, DriveStrength, Gpio, Lcd, Level,
//!     PinDescriptor, PinMode, Port, SlewControl,
//! };
//!
//! # struct MockGpio;
//! # impl Gpio for MockGpio {
//! #     fn set_mode(&mut self, _pin: &PinDescriptor, _mode: PinMode) {}
//! #     fn write(&mut self, _pin: &PinDescriptor, _level: Level) {}
//! #     fn read(&mut self, _pin: &PinDescriptor) -> Level { Level::Low }
//! #     fn configure_pad(
//! #         &mut self,
//! #         _pin: &PinDescriptor,
//! #         _strength: DriveStrength,
//! #         _slew: SlewControl,
//! #     ) {}
//! # }
//! # impl ClockControl for MockGpio {
//! #     fn enable_domain(&mut self, _domain: ClockDomain) {}
//! # }
//! # struct MockDelay;
//! # impl embedded_hal::delay::DelayNs for MockDelay {
//! #     fn delay_ns(&mut self, _ns: u32) {}
//! # }
//! # let gpio = MockGpio;
//! # let timer = MockDelay;
//! fn pin(port: Port, bit: u8) -> PinDescriptor {
//!     match PinDescriptor::new(port.clock_domain(), port, 1 << bit) {
//!         Ok(pin) => pin,
//!         Err(_) => unreachable!(),
//!     }
//! }
//!
//! let config = match Builder::new()
//!     .register_select(pin(Port::B, 0))
//!     .read_write(pin(Port::B, 1))
//!     .enable(pin(Port::B, 4))
//!     .data_pins([pin(Port::E, 1), pin(Port::E, 2), pin(Port::E, 3), pin(Port::E, 4)])
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut lcd = Lcd::new(gpio, &config, timer);
//! let _ = lcd.init();
//! let _ = lcd.enable();
//! let _ = lcd.display_write("Hello\nWorld");
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Pin groups and nibble-level bus primitives
pub mod bus;
/// HD44780 instruction encoding
pub mod command;
/// Pin descriptors, driver configuration, and builder
pub mod config;
/// Driver facade and lifecycle
pub mod display;
/// Error types for the driver
pub mod error;
/// Collaborator traits for GPIO and clock gating
pub mod hal;
/// Bus transaction engine
pub mod interface;
/// DDRAM/CGRAM addressing
pub mod ram;
/// Display text interpreter
pub mod text;
/// Busy-wait timing on a free-running counter
pub mod timer;
/// Datasheet-derived bus timing intervals
pub mod timing;

pub use config::{Builder, Config, DEFAULT_TIME_SCALER, PinDescriptor, PinRole};
pub use display::{Lcd, State};
pub use error::{ConfigError, Error};
pub use hal::{ClockControl, ClockDomain, DriveStrength, Gpio, Level, PinMode, Port, SlewControl};
pub use interface::{Direction, ParallelBus, Register};
pub use ram::{MAX_CUSTOM_GLYPHS, RamTarget};
pub use text::{MAX_TEXT_LEN, TextItem, TextScanner};
pub use timer::{FreeRunningCounter, TickTimer};
pub use timing::{MAX_TIME_SCALER, Timing};
