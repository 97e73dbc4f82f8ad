//! Driver facade
//!
//! [`Lcd`] owns the bus, the timer, and the configuration, and sequences the
//! controller through its lifecycle: pin setup, the power-on wake ritual, and
//! the content operations. Everything below it is synchronous and blocking;
//! each call returns only after the full datasheet-mandated duration has been
//! busy-waited.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::command::{
    self, ADDRESS_COUNTER_MASK, BUSY_FLAG_BIT, CLEAR_DISPLAY, FOUR_BIT_NIBBLE, RETURN_HOME,
    WAKE_NIBBLE,
};
use crate::config::Config;
use crate::error::Error;
use crate::hal::{ClockControl, Gpio};
use crate::interface::{ParallelBus, Register};
use crate::ram::{self, GLYPH_ROWS, RamTarget};
use crate::text::{MAX_TEXT_LEN, TextItem, TextScanner};
use crate::timing::{FIRST_WAKE_GAP_NS, SECOND_WAKE_GAP_NS, WARM_UP_NS};

/// Driver lifecycle state
///
/// Strictly ordered; every operation names the state it requires and fails
/// with [`Error::InvalidState`] from an earlier one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum State {
    /// Constructed, pins untouched
    Uninitialized,
    /// Pins validated, clocked, and configured; bus idle
    PinsConfigured,
    /// Wake ritual delivered, controller forced into 4-bit mode
    PoweredOn,
    /// One-time configuration written; content operations available
    Ready,
}

/// HD44780 driver over a 4-pin parallel bus
///
/// Generic over the GPIO/clock collaborator `G` and the wait source `D`.
/// Exclusively owns both for its lifetime; [`release`](Self::release) hands
/// them back.
pub struct Lcd<G, D> {
    bus: ParallelBus<G>,
    timer: D,
    config: Config,
    state: State,
}

impl<G, D> Lcd<G, D>
where
    G: Gpio + ClockControl,
    D: DelayNs,
{
    /// Build a driver from a validated configuration
    ///
    /// The configuration is copied in; the driver owns its copy exclusively.
    pub fn new(gpio: G, config: &Config, timer: D) -> Self {
        Self {
            bus: ParallelBus::new(gpio, config),
            timer,
            config: config.clone(),
            state: State::Uninitialized,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Hand the peripherals back, consuming the driver
    pub fn release(self) -> (G, D) {
        (self.bus.release(), self.timer)
    }

    /// Electrically configure every bus pin
    ///
    /// Enables clock domains (once each), sets output mode and pad drive on
    /// all pins including the optional backlight, then idles the data pins
    /// as inputs.
    pub fn init(&mut self) -> Result<(), Error> {
        self.bus.configure();
        self.state = State::PinsConfigured;
        debug!("lcd pins configured, bus idle");
        Ok(())
    }

    /// Power-on sequence: wake ritual plus one-time configuration
    ///
    /// The controller may power up in 8-bit mode, so after the warm-up wait
    /// the wake command is issued three times with strictly decreasing gaps
    /// (4.5 ms, 150 us, immediate) before anything else; only then is it
    /// switched to 4-bit mode and given the function-set, display-control,
    /// clear, and entry-mode bytes as one instruction transaction.
    pub fn enable(&mut self) -> Result<(), Error> {
        self.require(State::PinsConfigured)?;

        self.timer.delay_ns(WARM_UP_NS);
        self.bus.write_raw_nibble(WAKE_NIBBLE, true, &mut self.timer);
        self.timer.delay_ns(FIRST_WAKE_GAP_NS);
        self.bus.write_raw_nibble(WAKE_NIBBLE, true, &mut self.timer);
        self.timer.delay_ns(SECOND_WAKE_GAP_NS);
        self.bus.write_raw_nibble(WAKE_NIBBLE, true, &mut self.timer);
        self.state = State::PoweredOn;

        // 4-bit switch rides the same transaction as the config bytes.
        self.bus
            .write_raw_nibble(FOUR_BIT_NIBBLE, false, &mut self.timer);
        let config_bytes = [
            command::function_set(false, self.config.two_line_mode, self.config.font_5x10),
            command::display_control(
                self.config.display_on,
                self.config.cursor_on,
                self.config.cursor_blink,
            ),
            CLEAR_DISPLAY,
            command::entry_mode(
                self.config.cursor_moves_right,
                self.config.display_shift_on_write,
            ),
        ];
        self.bus.append_bytes(&config_bytes, &mut self.timer);
        self.state = State::Ready;
        debug!("lcd powered on and configured");
        Ok(())
    }

    /// Clear the display, then write interpreted text from address 0
    ///
    /// # Errors
    ///
    /// [`Error::TextTooLong`] over 32 bytes, [`Error::ZeroLengthTransfer`]
    /// for empty text, [`Error::InvalidState`] before
    /// [`enable`](Self::enable).
    pub fn display_write(&mut self, text: &str) -> Result<(), Error> {
        self.require(State::Ready)?;
        Self::check_len(text)?;
        self.bus
            .write_bytes(Register::Instruction, &[CLEAR_DISPLAY], &mut self.timer);
        self.write_text(text);
        Ok(())
    }

    /// Write interpreted text without clearing
    ///
    /// Content lands wherever the address counter currently sits - after a
    /// previous write, glyph upload, or read, all of which move it. Callers
    /// needing deterministic placement call [`set_cursor`](Self::set_cursor)
    /// first; this is a documented caveat, not a defect.
    pub fn display_append(&mut self, text: &str) -> Result<(), Error> {
        self.require(State::Ready)?;
        Self::check_len(text)?;
        self.write_text(text);
        Ok(())
    }

    /// Program a custom glyph pattern into a CGRAM slot
    ///
    /// Each of the eight bytes carries one pixel row in its low five bits.
    /// The slot becomes referenceable from text as `` `N `` once programmed.
    /// Leaves the address counter inside CGRAM.
    pub fn add_custom_glyph(&mut self, pattern: &[u8; GLYPH_ROWS], slot: u8) -> Result<(), Error> {
        self.require(State::Ready)?;
        let base = ram::cgram_address(slot)?;
        self.set_address_counter(base, RamTarget::CharacterGenerator);
        self.bus.write_bytes(Register::Data, pattern, &mut self.timer);
        Ok(())
    }

    /// Move the cursor to a character cell
    pub fn set_cursor(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.require(State::Ready)?;
        let addr = ram::ddram_address(x, y)?;
        self.set_address_counter(addr, RamTarget::DisplayData);
        Ok(())
    }

    /// Switch display, cursor, and blink on or off in one command
    pub fn toggle_features(
        &mut self,
        display_on: bool,
        cursor_on: bool,
        cursor_blink_on: bool,
    ) -> Result<(), Error> {
        self.require(State::Ready)?;
        let byte = command::display_control(display_on, cursor_on, cursor_blink_on);
        self.bus
            .write_bytes(Register::Instruction, &[byte], &mut self.timer);
        Ok(())
    }

    /// Shift the cursor or the whole display one position
    pub fn shift(&mut self, shift_display: bool, shift_right: bool) -> Result<(), Error> {
        self.require(State::Ready)?;
        let byte = command::cursor_display_shift(shift_display, shift_right);
        self.bus
            .write_bytes(Register::Instruction, &[byte], &mut self.timer);
        Ok(())
    }

    /// Clear the display
    ///
    /// Content-level reset only; the wake ritual is not repeated.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.require(State::Ready)?;
        self.bus
            .write_bytes(Register::Instruction, &[CLEAR_DISPLAY], &mut self.timer);
        debug!("lcd display cleared");
        Ok(())
    }

    /// Return the cursor to address 0 without clearing
    pub fn return_home(&mut self) -> Result<(), Error> {
        self.require(State::Ready)?;
        self.bus
            .write_bytes(Register::Instruction, &[RETURN_HOME], &mut self.timer);
        Ok(())
    }

    /// Switch the backlight pin
    pub fn set_backlight(&mut self, on: bool) -> Result<(), Error> {
        self.require(State::PinsConfigured)?;
        if self.bus.set_backlight(on) {
            Ok(())
        } else {
            Err(Error::BacklightNotConfigured)
        }
    }

    /// Poll the controller's busy flag
    ///
    /// The shipped control flow never polls; fixed conservative waits replace
    /// it. The read path exists for callers that prefer latency over margin.
    pub fn is_busy(&mut self) -> Result<bool, Error> {
        let status = self.read_status()?;
        Ok(status >> BUSY_FLAG_BIT & 1 != 0)
    }

    /// Read the controller's 7-bit address counter
    pub fn address_counter(&mut self) -> Result<u8, Error> {
        let status = self.read_status()?;
        Ok(status & ADDRESS_COUNTER_MASK)
    }

    /// Read back controller RAM starting at an address
    ///
    /// Each byte read auto-increments the hardware address counter; after
    /// this call the counter sits at `start + buf.len()`.
    pub fn read_ram(&mut self, buf: &mut [u8], start: u8, target: RamTarget) -> Result<(), Error> {
        self.require(State::Ready)?;
        if buf.is_empty() {
            return Err(Error::ZeroLengthTransfer);
        }
        self.set_address_counter(start, target);
        self.bus.read_bytes(Register::Data, buf, &mut self.timer);
        Ok(())
    }

    fn read_status(&mut self) -> Result<u8, Error> {
        self.require(State::Ready)?;
        let mut status = [0u8; 1];
        self.bus
            .read_bytes(Register::Instruction, &mut status, &mut self.timer);
        Ok(status[0])
    }

    fn set_address_counter(&mut self, addr: u8, target: RamTarget) {
        let byte = ram::address_command(addr, target);
        self.bus
            .write_bytes(Register::Instruction, &[byte], &mut self.timer);
    }

    fn write_text(&mut self, text: &str) {
        for item in TextScanner::new(text.as_bytes()) {
            match item {
                TextItem::Data(byte) => {
                    self.bus.write_bytes(Register::Data, &[byte], &mut self.timer);
                }
                TextItem::Command(byte) => {
                    self.bus
                        .write_bytes(Register::Instruction, &[byte], &mut self.timer);
                }
            }
        }
    }

    fn require(&self, required: State) -> Result<(), Error> {
        if self.state >= required {
            Ok(())
        } else {
            Err(Error::InvalidState {
                required,
                actual: self.state,
            })
        }
    }

    const fn check_len(text: &str) -> Result<(), Error> {
        if text.is_empty() {
            return Err(Error::ZeroLengthTransfer);
        }
        if text.len() > MAX_TEXT_LEN {
            return Err(Error::TextTooLong {
                len: text.len(),
                max: MAX_TEXT_LEN,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, PinDescriptor};
    use crate::hal::{ClockDomain, DriveStrength, Level, PinMode, Port, SlewControl};
    use alloc::vec::Vec;

    /// Controller-side model: reconstructs full bytes from nibbles latched
    /// on falling enable edges.
    struct PanelProbe {
        levels: [[bool; 8]; 6],
        latched: Vec<(bool, u8)>,
    }

    impl PanelProbe {
        fn new() -> Self {
            Self {
                levels: [[false; 8]; 6],
                latched: Vec::new(),
            }
        }

        fn data_nibble(&self) -> u8 {
            let mut nibble = 0;
            for bit in 0..4 {
                if self.levels[Port::E.index()][bit + 1] {
                    nibble |= 1 << bit;
                }
            }
            nibble
        }

        /// Latched nibbles folded into (data register, byte) pairs,
        /// consuming two nibbles per byte high-first. `prefix_nibbles`
        /// single-nibble transfers are returned separately.
        fn transfers(&self, prefix_nibbles: usize) -> (Vec<u8>, Vec<(bool, u8)>) {
            let prefix = self
                .latched
                .iter()
                .take(prefix_nibbles)
                .map(|(_, nibble)| *nibble)
                .collect();
            let bytes = self.latched[prefix_nibbles..]
                .chunks(2)
                .map(|pair| (pair[0].0, pair[0].1 << 4 | pair.get(1).map_or(0, |p| p.1)))
                .collect();
            (prefix, bytes)
        }
    }

    impl Gpio for PanelProbe {
        fn set_mode(&mut self, _: &PinDescriptor, _: PinMode) {}

        fn write(&mut self, pin: &PinDescriptor, level: Level) {
            let port = pin.port().index();
            let bit = pin.pin_mask().trailing_zeros() as usize;
            let was_high = self.levels[port][bit];
            self.levels[port][bit] = level.is_high();
            // PB4 is the enable line in the test wiring.
            if pin.port() == Port::B && bit == 4 && was_high && !level.is_high() {
                let data_register = self.levels[Port::B.index()][0];
                self.latched.push((data_register, self.data_nibble()));
            }
        }

        fn read(&mut self, _: &PinDescriptor) -> Level {
            Level::Low
        }

        fn configure_pad(&mut self, _: &PinDescriptor, _: DriveStrength, _: SlewControl) {}
    }

    impl ClockControl for PanelProbe {
        fn enable_domain(&mut self, _: ClockDomain) {}
    }

    /// Delay recorder; nanosecond waits pile up here in call order.
    #[derive(Default)]
    struct DelayLog {
        waits: Vec<u32>,
    }

    impl DelayNs for DelayLog {
        fn delay_ns(&mut self, ns: u32) {
            self.waits.push(ns);
        }
    }

    fn pin(port: Port, bit: u8) -> PinDescriptor {
        match PinDescriptor::new(port.clock_domain(), port, 1 << bit) {
            Ok(pin) => pin,
            Err(e) => panic!("expected valid pin: {e}"),
        }
    }

    fn config(backlight: bool) -> Config {
        let mut builder = Builder::new()
            .register_select(pin(Port::B, 0))
            .read_write(pin(Port::B, 1))
            .enable(pin(Port::B, 4))
            .data_pins([
                pin(Port::E, 1),
                pin(Port::E, 2),
                pin(Port::E, 3),
                pin(Port::E, 4),
            ]);
        if backlight {
            builder = builder.backlight(pin(Port::F, 4));
        }
        match builder.build() {
            Ok(config) => config,
            Err(e) => panic!("config should build: {e}"),
        }
    }

    fn lcd() -> Lcd<PanelProbe, DelayLog> {
        Lcd::new(PanelProbe::new(), &config(true), DelayLog::default())
    }

    fn ready_lcd() -> Lcd<PanelProbe, DelayLog> {
        let mut lcd = lcd();
        assert_eq!(lcd.init(), Ok(()));
        assert_eq!(lcd.enable(), Ok(()));
        lcd
    }

    #[test]
    fn test_lifecycle_order_enforced() {
        let mut lcd = lcd();
        assert_eq!(
            lcd.enable(),
            Err(Error::InvalidState {
                required: State::PinsConfigured,
                actual: State::Uninitialized,
            })
        );
        assert_eq!(lcd.init(), Ok(()));
        assert_eq!(
            lcd.display_write("hi"),
            Err(Error::InvalidState {
                required: State::Ready,
                actual: State::PinsConfigured,
            })
        );
        assert_eq!(lcd.enable(), Ok(()));
        assert_eq!(lcd.state(), State::Ready);
        assert_eq!(lcd.display_write("hi"), Ok(()));
    }

    #[test]
    fn test_enable_issues_three_wakes_then_config() {
        let lcd = ready_lcd();
        let (probe, _) = lcd.release();
        let (prefix, bytes) = probe.transfers(4);
        // Three wake nibbles, then the 4-bit switch nibble.
        assert_eq!(prefix, [0b0011, 0b0011, 0b0011, 0b0010]);
        // Function set (two-line), display control (all on), clear, entry
        // mode - all to the instruction register.
        let expected = [
            (false, 0x28u8),
            (false, 0x0F),
            (false, CLEAR_DISPLAY),
            (false, 0x06),
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_enable_wake_gaps_strictly_decrease() {
        let mut lcd = lcd();
        assert_eq!(lcd.init(), Ok(()));
        assert_eq!(lcd.enable(), Ok(()));
        let (_, delay) = lcd.release();
        let warm_up = delay.waits.iter().position(|ns| *ns == WARM_UP_NS);
        let first = delay.waits.iter().position(|ns| *ns == FIRST_WAKE_GAP_NS);
        let second = delay.waits.iter().position(|ns| *ns == SECOND_WAKE_GAP_NS);
        match (warm_up, first, second) {
            (Some(w), Some(f), Some(s)) => {
                assert!(w < f && f < s, "gaps out of order");
            }
            _ => panic!("missing a power-on wait"),
        }
        assert!(WARM_UP_NS > FIRST_WAKE_GAP_NS && FIRST_WAKE_GAP_NS > SECOND_WAKE_GAP_NS);
    }

    #[test]
    fn test_display_write_clears_then_interprets() {
        let mut lcd = ready_lcd();
        assert_eq!(lcd.display_write("A\n`2"), Ok(()));
        let (probe, _) = lcd.release();
        let (_, bytes) = probe.transfers(4);
        // After the 4 enable-time config bytes: clear, 'A' as data,
        // jump-line as command, glyph slot 2 as data.
        assert_eq!(
            &bytes[4..],
            [
                (false, CLEAR_DISPLAY),
                (true, b'A'),
                (false, 0xC0),
                (true, 0x02),
            ]
        );
    }

    #[test]
    fn test_display_append_does_not_clear() {
        let mut lcd = ready_lcd();
        assert_eq!(lcd.display_append("ok"), Ok(()));
        let (probe, _) = lcd.release();
        let (_, bytes) = probe.transfers(4);
        assert_eq!(&bytes[4..], [(true, b'o'), (true, b'k')]);
    }

    #[test]
    fn test_text_length_limit() {
        let mut lcd = ready_lcd();
        let max = "x".repeat(MAX_TEXT_LEN);
        assert_eq!(lcd.display_write(&max), Ok(()));
        let over = "x".repeat(MAX_TEXT_LEN + 1);
        assert_eq!(
            lcd.display_write(&over),
            Err(Error::TextTooLong { len: 33, max: 32 })
        );
        assert_eq!(
            lcd.display_append(&over),
            Err(Error::TextTooLong { len: 33, max: 32 })
        );
    }

    #[test]
    fn test_empty_text_rejected() {
        let mut lcd = ready_lcd();
        assert_eq!(lcd.display_write(""), Err(Error::ZeroLengthTransfer));
        assert_eq!(lcd.display_append(""), Err(Error::ZeroLengthTransfer));
        // Nothing reached the bus, not even the clear.
        let (probe, _) = lcd.release();
        let (_, bytes) = probe.transfers(4);
        assert_eq!(bytes.len(), 4);
    }

    #[test]
    fn test_set_cursor_addresses_ddram() {
        let mut lcd = ready_lcd();
        assert_eq!(lcd.set_cursor(3, 1), Ok(()));
        let (probe, _) = lcd.release();
        let (_, bytes) = probe.transfers(4);
        assert_eq!(&bytes[4..], [(false, 0x80 | 0x43)]);
    }

    #[test]
    fn test_set_cursor_rejects_off_grid() {
        let mut lcd = ready_lcd();
        assert_eq!(
            lcd.set_cursor(16, 0),
            Err(Error::CursorOutOfRange { x: 16, y: 0 })
        );
        assert_eq!(
            lcd.set_cursor(0, 2),
            Err(Error::CursorOutOfRange { x: 0, y: 2 })
        );
    }

    #[test]
    fn test_add_custom_glyph_targets_slot_base() {
        let mut lcd = ready_lcd();
        let pattern = [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11, 0x00];
        assert_eq!(lcd.add_custom_glyph(&pattern, 3), Ok(()));
        let (probe, _) = lcd.release();
        let (_, bytes) = probe.transfers(4);
        // CGRAM address 24, then the eight pattern rows as data.
        assert_eq!(bytes[4], (false, 0x40 | 24));
        let rows: Vec<u8> = bytes[5..].iter().map(|(_, byte)| *byte).collect();
        assert_eq!(rows, pattern);
        assert!(bytes[5..].iter().all(|(data, _)| *data));
    }

    #[test]
    fn test_add_custom_glyph_rejects_slot_8() {
        let mut lcd = ready_lcd();
        assert_eq!(
            lcd.add_custom_glyph(&[0; 8], 8),
            Err(Error::GlyphSlotOutOfRange { slot: 8 })
        );
    }

    #[test]
    fn test_toggle_features_writes_display_control() {
        let mut lcd = ready_lcd();
        assert_eq!(lcd.toggle_features(true, false, false), Ok(()));
        let (probe, _) = lcd.release();
        let (_, bytes) = probe.transfers(4);
        assert_eq!(&bytes[4..], [(false, 0b0000_1100)]);
    }

    #[test]
    fn test_reset_clears_without_wake_ritual() {
        let mut lcd = ready_lcd();
        assert_eq!(lcd.reset(), Ok(()));
        let (probe, delay) = lcd.release();
        let (_, bytes) = probe.transfers(4);
        assert_eq!(&bytes[4..], [(false, CLEAR_DISPLAY)]);
        // Exactly one warm-up wait in the whole session: reset() must not
        // repeat the power-on ritual.
        let warm_ups = delay.waits.iter().filter(|ns| **ns == WARM_UP_NS).count();
        assert_eq!(warm_ups, 1);
    }

    #[test]
    fn test_backlight_requires_configured_pin() {
        let mut lcd = lcd();
        assert_eq!(lcd.init(), Ok(()));
        assert_eq!(lcd.set_backlight(true), Ok(()));

        let mut plain = Lcd::new(PanelProbe::new(), &config(false), DelayLog::default());
        assert_eq!(plain.init(), Ok(()));
        assert_eq!(plain.set_backlight(true), Err(Error::BacklightNotConfigured));
    }

    #[test]
    fn test_read_ram_rejects_empty_buffer() {
        let mut lcd = ready_lcd();
        let mut buf = [0u8; 0];
        assert_eq!(
            lcd.read_ram(&mut buf, 0, RamTarget::DisplayData),
            Err(Error::ZeroLengthTransfer)
        );
    }

    #[test]
    fn test_return_home_and_shift_opcodes() {
        let mut lcd = ready_lcd();
        assert_eq!(lcd.return_home(), Ok(()));
        assert_eq!(lcd.shift(true, true), Ok(()));
        let (probe, _) = lcd.release();
        let (_, bytes) = probe.transfers(4);
        assert_eq!(&bytes[4..], [(false, RETURN_HOME), (false, 0b0001_1100)]);
    }
}
