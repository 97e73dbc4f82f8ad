//! Pin bus: the named pin groups behind the parallel interface
//!
//! [`PinBus`] owns the role-to-descriptor mapping out of a
//! [`Config`](crate::config::Config) and provides the pin-level primitives the
//! transaction engine sequences: control line writes, grouped data direction
//! switches, and 4-bit nibble drive/sample. Everything is a direct
//! pass-through to the [`Gpio`] collaborator - this is a push bus, so there is
//! no debouncing and no edge detection.

use crate::config::{Config, PinDescriptor};
use crate::hal::{
    CLOCK_DOMAIN_COUNT, ClockControl, DriveStrength, Gpio, Level, PinMode, SlewControl,
};

/// Number of parallel data lines in 4-bit mode
pub const DATA_PIN_COUNT: usize = 4;

/// The four data pins plus the control pins, grouped by role
#[derive(Clone, Debug)]
pub struct PinBus {
    register_select: PinDescriptor,
    read_write: PinDescriptor,
    enable: PinDescriptor,
    backlight: Option<PinDescriptor>,
    data: [PinDescriptor; DATA_PIN_COUNT],
}

impl PinBus {
    /// Extract the pin assignment from a configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            register_select: config.register_select,
            read_write: config.read_write,
            enable: config.enable,
            backlight: config.backlight,
            data: config.data,
        }
    }

    /// Whether a backlight pin was assigned
    #[must_use]
    pub const fn has_backlight(&self) -> bool {
        self.backlight.is_some()
    }

    /// One-time electrical setup of every assigned pin
    ///
    /// Enables each pin's clock domain (once per domain, however many pins
    /// share it), switches the pin to output, and configures the pad for
    /// 8 mA drive with slew control so edges stay inside the rise/fall budget
    /// the [`timing`](crate::timing) math assumes. Finishes by idling the
    /// data pins as inputs.
    pub fn configure<G: Gpio + ClockControl>(&self, gpio: &mut G) {
        let mut enabled = [false; CLOCK_DOMAIN_COUNT];
        for pin in self.all_pins() {
            let domain = pin.clock_domain();
            if !enabled[domain.index()] {
                gpio.enable_domain(domain);
                enabled[domain.index()] = true;
            }
            gpio.set_mode(&pin, PinMode::Output);
            gpio.configure_pad(&pin, DriveStrength::Ma8, SlewControl::Enabled);
        }
        self.set_data_direction(gpio, PinMode::Input);
    }

    /// Switch all four data pins as a group
    pub fn set_data_direction<G: Gpio>(&self, gpio: &mut G, mode: PinMode) {
        for pin in &self.data {
            gpio.set_mode(pin, mode);
        }
    }

    /// Drive the RS line: high selects the data register
    pub fn select_register<G: Gpio>(&self, gpio: &mut G, data_register: bool) {
        gpio.write(&self.register_select, Level::from_bool(data_register));
    }

    /// Drive the R/W line: high selects read
    pub fn set_read_write<G: Gpio>(&self, gpio: &mut G, read: bool) {
        gpio.write(&self.read_write, Level::from_bool(read));
    }

    /// Drive the E line
    pub fn set_enable<G: Gpio>(&self, gpio: &mut G, asserted: bool) {
        gpio.write(&self.enable, Level::from_bool(asserted));
    }

    /// Drive the backlight pin, if one is assigned
    pub fn set_backlight<G: Gpio>(&self, gpio: &mut G, on: bool) -> bool {
        match self.backlight {
            Some(pin) => {
                gpio.write(&pin, Level::from_bool(on));
                true
            }
            None => false,
        }
    }

    /// Put a 4-bit value on the data lines, bit `i` onto data pin `i`
    pub fn drive_nibble<G: Gpio>(&self, gpio: &mut G, nibble: u8) {
        for (index, pin) in self.data.iter().enumerate() {
            let bit = nibble >> index & 1 != 0;
            gpio.write(pin, Level::from_bool(bit));
        }
    }

    /// Sample the data lines into a 4-bit value, data pin `i` into bit `i`
    pub fn sample_nibble<G: Gpio>(&self, gpio: &mut G) -> u8 {
        let mut nibble = 0;
        for (index, pin) in self.data.iter().enumerate() {
            if gpio.read(pin).is_high() {
                nibble |= 1 << index;
            }
        }
        nibble
    }

    fn all_pins(&self) -> impl Iterator<Item = PinDescriptor> + '_ {
        [self.register_select, self.read_write, self.enable]
            .into_iter()
            .chain(self.backlight)
            .chain(self.data)
    }
}
