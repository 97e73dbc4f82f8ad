//! Collaborator traits for the MCU peripherals the driver bit-bangs through
//!
//! The driver never touches hardware registers itself. It is generic over two
//! narrow traits:
//!
//! - [`Gpio`] - per-pin mode, level, and pad (drive strength / slew rate)
//!   control, addressed by [`PinDescriptor`](crate::config::PinDescriptor)
//! - [`ClockControl`] - gating of the GPIO port clock domains
//!
//! Waiting is not part of this module: all timing goes through
//! [`embedded_hal::delay::DelayNs`], usually provided by
//! [`TickTimer`](crate::timer::TickTimer).
//!
//! All operations here are infallible. They model memory-mapped register
//! writes, which cannot report failure; a wiring mistake is caught earlier,
//! when the [`PinDescriptor`](crate::config::PinDescriptor) is constructed.

use crate::config::PinDescriptor;

/// Logic level on a GPIO pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Logic low
    Low,
    /// Logic high
    High,
}

impl Level {
    /// Level from a boolean, `true` mapping to [`Level::High`]
    #[must_use]
    pub const fn from_bool(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }

    /// Whether this is [`Level::High`]
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

/// Direction of a GPIO pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinMode {
    /// Pin is read by the MCU (bus read transactions, idle bus)
    Input,
    /// Pin is driven by the MCU
    Output,
}

/// Pad drive strength
///
/// The bus timing math in [`crate::timing`] assumes the rise/fall budget of
/// the strongest setting; [`PinBus::configure`](crate::bus::PinBus::configure)
/// therefore requests [`DriveStrength::Ma8`] on every bus pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveStrength {
    /// 2 mA drive
    Ma2,
    /// 4 mA drive
    Ma4,
    /// 8 mA drive
    Ma8,
}

/// Pad slew rate control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlewControl {
    /// No slew rate limiting
    Disabled,
    /// Slew rate limited to keep edges within the pad's rise/fall spec
    Enabled,
}

/// GPIO port identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    /// Port A
    A,
    /// Port B
    B,
    /// Port C
    C,
    /// Port D
    D,
    /// Port E
    E,
    /// Port F
    F,
}

impl Port {
    /// The clock domain feeding this port
    #[must_use]
    pub const fn clock_domain(self) -> ClockDomain {
        match self {
            Self::A => ClockDomain::GpioA,
            Self::B => ClockDomain::GpioB,
            Self::C => ClockDomain::GpioC,
            Self::D => ClockDomain::GpioD,
            Self::E => ClockDomain::GpioE,
            Self::F => ClockDomain::GpioF,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
            Self::E => 4,
            Self::F => 5,
        }
    }
}

/// Peripheral clock domain identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockDomain {
    /// GPIO port A clock
    GpioA,
    /// GPIO port B clock
    GpioB,
    /// GPIO port C clock
    GpioC,
    /// GPIO port D clock
    GpioD,
    /// GPIO port E clock
    GpioE,
    /// GPIO port F clock
    GpioF,
}

/// Number of distinct [`ClockDomain`] values
pub(crate) const CLOCK_DOMAIN_COUNT: usize = 6;

impl ClockDomain {
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::GpioA => 0,
            Self::GpioB => 1,
            Self::GpioC => 2,
            Self::GpioD => 3,
            Self::GpioE => 4,
            Self::GpioF => 5,
        }
    }
}

/// Per-pin GPIO operations
///
/// Implement this once for the target MCU. Every call receives the full
/// [`PinDescriptor`], so the implementation can resolve the port base address
/// and pin mask without any state of its own.
pub trait Gpio {
    /// Switch a pin between input and output
    fn set_mode(&mut self, pin: &PinDescriptor, mode: PinMode);

    /// Drive an output pin to the given level
    fn write(&mut self, pin: &PinDescriptor, level: Level);

    /// Sample the current level of a pin
    fn read(&mut self, pin: &PinDescriptor) -> Level;

    /// Configure pad drive strength and slew rate control
    fn configure_pad(&mut self, pin: &PinDescriptor, strength: DriveStrength, slew: SlewControl);
}

/// Peripheral clock gating
pub trait ClockControl {
    /// Enable a clock domain and block until it is ready
    ///
    /// Must be idempotent: enabling an already-running domain is a no-op.
    fn enable_domain(&mut self, domain: ClockDomain);
}
