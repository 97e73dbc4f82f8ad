//! Bus transaction engine
//!
//! This is the part of the driver where correctness is defined purely by
//! timing. One *transaction* is a run of enable pulses against a fixed
//! RS/R&#x2F;W setting; each pulse transfers one 4-bit nibble, and a byte is two
//! pulses, most significant nibble first. The controller latches written data
//! on the **falling** enable edge and presents read data while enable is
//! high.
//!
//! There is no acknowledgement, no busy handshake inside a transaction, and
//! no retry. If a wait below is shortened past the datasheet minimum the
//! transfer silently corrupts; the only observable symptom is wrong content
//! on the glass. The wait lengths come from [`Timing`](crate::timing::Timing)
//! and every one of them is performed through the caller-supplied
//! [`DelayNs`].
//!
//! Sequencing per transaction:
//!
//! ```text
//! begin:     RS, R/W set -> t_AS wait -> E high -> strobe wait
//! continue:  t_DSW wait -> E low -> cycle remainder -> E high -> strobe wait
//! end:       t_DSW wait -> E low -> hold wait; bus idle
//! ```

use embedded_hal::delay::DelayNs;

use crate::bus::PinBus;
use crate::config::Config;
use crate::hal::{ClockControl, Gpio, PinMode};
use crate::timing::Timing;

/// Target register of a transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// Instruction register: commands, busy flag, address counter
    Instruction,
    /// Data register: DDRAM/CGRAM content
    Data,
}

/// Transfer direction of a transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// MCU drives the data pins
    Write,
    /// Controller drives the data pins
    Read,
}

impl Direction {
    const fn is_read(self) -> bool {
        matches!(self, Self::Read)
    }
}

/// The 4-pin parallel bus with its timing state machine
///
/// Owns the GPIO collaborator and the pin assignment; exclusively owns the
/// bus electrically - nothing else may drive these pins while a transaction
/// is in flight, and the driver assumes a single execution context with no
/// preemption across a transaction.
pub struct ParallelBus<G> {
    gpio: G,
    pins: PinBus,
    timing: Timing,
}

impl<G: Gpio + ClockControl> ParallelBus<G> {
    /// Build the bus from a validated configuration
    pub fn new(gpio: G, config: &Config) -> Self {
        Self {
            gpio,
            pins: PinBus::from_config(config),
            timing: Timing::new(config.time_scaler),
        }
    }

    /// Electrically configure every bus pin; see [`PinBus::configure`]
    pub fn configure(&mut self) {
        self.pins.configure(&mut self.gpio);
    }

    /// Whether a backlight pin was assigned
    #[must_use]
    pub const fn has_backlight(&self) -> bool {
        self.pins.has_backlight()
    }

    /// Drive the backlight pin; returns false when none is assigned
    pub fn set_backlight(&mut self, on: bool) -> bool {
        self.pins.set_backlight(&mut self.gpio, on)
    }

    /// Hand the GPIO collaborator back
    pub fn release(self) -> G {
        self.gpio
    }

    /// Open a transaction: address the controller and raise enable
    pub fn begin_transaction<D: DelayNs>(
        &mut self,
        register: Register,
        direction: Direction,
        delay: &mut D,
    ) {
        self.pins
            .select_register(&mut self.gpio, matches!(register, Register::Data));
        self.pins
            .set_read_write(&mut self.gpio, direction.is_read());
        delay.delay_ns(self.timing.address_setup());
        self.pins.set_enable(&mut self.gpio, true);
        delay.delay_ns(self.timing.strobe_for(direction.is_read()));
    }

    /// Cycle enable between two nibbles of an open transaction
    pub fn continue_transaction<D: DelayNs>(&mut self, direction: Direction, delay: &mut D) {
        delay.delay_ns(self.timing.data_setup());
        self.pins.set_enable(&mut self.gpio, false);
        delay.delay_ns(self.timing.cycle_remainder());
        self.pins.set_enable(&mut self.gpio, true);
        delay.delay_ns(self.timing.strobe_for(direction.is_read()));
    }

    /// Close a transaction and leave the bus idle
    pub fn end_transaction<D: DelayNs>(&mut self, delay: &mut D) {
        delay.delay_ns(self.timing.data_setup());
        self.pins.set_enable(&mut self.gpio, false);
        delay.delay_ns(self.timing.end_hold());
    }

    /// Write bytes to one register in a single transaction
    ///
    /// Each byte goes out high nibble first; the controller reassembles and
    /// latches on every falling enable edge. Empty input is the caller's
    /// mistake and is filtered out before this layer.
    pub fn write_bytes<D: DelayNs>(&mut self, register: Register, data: &[u8], delay: &mut D) {
        if data.is_empty() {
            return;
        }
        self.pins.set_data_direction(&mut self.gpio, PinMode::Output);
        self.begin_transaction(register, Direction::Write, delay);
        let last = data.len() - 1;
        for (index, byte) in data.iter().enumerate() {
            self.pins.drive_nibble(&mut self.gpio, byte >> 4);
            self.continue_transaction(Direction::Write, delay);
            self.pins.drive_nibble(&mut self.gpio, byte & 0x0F);
            if index != last {
                self.continue_transaction(Direction::Write, delay);
            }
        }
        self.end_transaction(delay);
    }

    /// Read bytes from one register in a single transaction
    ///
    /// The data pins are switched to input first; each sampled nibble pair is
    /// reassembled high-then-low. Every byte read advances the controller's
    /// address counter as a hardware side effect.
    pub fn read_bytes<D: DelayNs>(&mut self, register: Register, buf: &mut [u8], delay: &mut D) {
        if buf.is_empty() {
            return;
        }
        self.pins.set_data_direction(&mut self.gpio, PinMode::Input);
        self.begin_transaction(register, Direction::Read, delay);
        let last = buf.len() - 1;
        for index in 0..buf.len() {
            let high = self.pins.sample_nibble(&mut self.gpio);
            self.continue_transaction(Direction::Read, delay);
            let low = self.pins.sample_nibble(&mut self.gpio);
            buf[index] = high << 4 | low;
            if index != last {
                self.continue_transaction(Direction::Read, delay);
            }
        }
        self.end_transaction(delay);
    }

    /// Transfer a single raw nibble to the instruction register
    ///
    /// Used by the power-on wake ritual, where the controller is still (or
    /// may still be) in 8-bit mode and must see lone 4-bit transfers. With
    /// `terminate` false the transaction is left open so follow-on bytes ride
    /// the same enable cycle train.
    pub fn write_raw_nibble<D: DelayNs>(&mut self, nibble: u8, terminate: bool, delay: &mut D) {
        self.pins.set_data_direction(&mut self.gpio, PinMode::Output);
        self.begin_transaction(Register::Instruction, Direction::Write, delay);
        self.pins.drive_nibble(&mut self.gpio, nibble & 0x0F);
        if terminate {
            self.end_transaction(delay);
        } else {
            self.continue_transaction(Direction::Write, delay);
        }
    }

    /// Continue an open transaction with full bytes, then close it
    ///
    /// Companion to [`write_raw_nibble`](Self::write_raw_nibble) with
    /// `terminate = false`: the one-time configuration write appends its
    /// command bytes to the still-open transaction.
    pub fn append_bytes<D: DelayNs>(&mut self, data: &[u8], delay: &mut D) {
        if data.is_empty() {
            self.end_transaction(delay);
            return;
        }
        let last = data.len() - 1;
        for (index, byte) in data.iter().enumerate() {
            self.pins.drive_nibble(&mut self.gpio, byte >> 4);
            self.continue_transaction(Direction::Write, delay);
            self.pins.drive_nibble(&mut self.gpio, byte & 0x0F);
            if index != last {
                self.continue_transaction(Direction::Write, delay);
            }
        }
        self.end_transaction(delay);
    }
}
