//! HD44780 bus timing intervals
//!
//! Every wait the transaction engine performs comes from this module. The raw
//! numbers are the controller datasheet's minimum setup/hold/cycle times in
//! nanoseconds; [`Timing`] multiplies each scaled value by a safety factor
//! because the datasheet minima leave no margin for pad rise/fall behaviour,
//! breadboard wiring, or a slow panel.
//!
//! The scaler is **not** a correctness-neutral knob. The bus has no
//! acknowledgement and no error detection: shave the margin too thin and the
//! only symptom is garbled characters on the glass, never a software error.
//! Tune it per target clock speed and leave it generous.

/// Raw datasheet enable pulse width, ns (PW_EH)
const PULSE_WIDTH_NS: u32 = 200;
/// Raw datasheet minimum enable cycle time, ns (t_cycE)
const MIN_CYCLE_NS: u32 = 410;
/// Raw datasheet data setup time before the falling enable edge, ns (t_DSW)
const DATA_SETUP_NS: u32 = 45;
/// Raw datasheet data hold time after the falling enable edge, ns (t_H)
const DATA_HOLD_NS: u32 = 15;
/// Raw datasheet RS/RW address setup time before enable rises, ns (t_AS)
const ADDR_SETUP_NS: u32 = 35;

/// Read data access time after enable rises, ns (t_DDR); unscaled
const READ_ACCESS_NS: u32 = 800;

/// Worst-case pad rise time compensation, ns
const RISE_TIME_NS: u32 = 13;
/// Worst-case pad fall time compensation, ns
const FALL_TIME_NS: u32 = 14;

/// Largest accepted timing scaler
///
/// Bounded by the widest scaled product, `MIN_CYCLE_NS * scaler`, staying
/// inside `u32`. Zero is equally invalid: the rise-time compensation in
/// [`Timing::address_setup`] would underflow.
/// [`Builder::build`](crate::config::Builder::build) enforces both ends, so a
/// [`Timing`] reached through a [`Config`](crate::config::Config) is always
/// safe.
pub const MAX_TIME_SCALER: u32 = u32::MAX / MIN_CYCLE_NS;

/// Display power-on warm-up before the wake ritual, ns (unscaled)
pub const WARM_UP_NS: u32 = 49_000_000;
/// Wait after the first wake command, ns (unscaled)
pub const FIRST_WAKE_GAP_NS: u32 = 4_500_000;
/// Wait after the second wake command, ns (unscaled)
pub const SECOND_WAKE_GAP_NS: u32 = 150_000;

/// Scaled wait intervals for one bus transaction
///
/// Constructed from the configured scaler once and owned by the transaction
/// engine. All values are nanoseconds, ready to feed to
/// [`DelayNs`](embedded_hal::delay::DelayNs).
///
/// The scaler must lie in `1..=MAX_TIME_SCALER`; a configuration built
/// through [`Builder`](crate::config::Builder) guarantees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    scaler: u32,
}

impl Timing {
    /// Build the interval table for a given safety scaler
    #[must_use]
    pub const fn new(scaler: u32) -> Self {
        Self { scaler }
    }

    /// Data setup time before deasserting enable
    #[must_use]
    pub const fn data_setup(&self) -> u32 {
        DATA_SETUP_NS * self.scaler
    }

    /// RS/RW setup wait before asserting enable, rise-time compensated
    #[must_use]
    pub const fn address_setup(&self) -> u32 {
        ADDR_SETUP_NS * self.scaler - RISE_TIME_NS
    }

    /// Wait with enable high while the controller latches written data
    ///
    /// The enable pulse width minus the data setup already spent, plus the
    /// pad rise time the edge loses.
    #[must_use]
    pub const fn write_strobe(&self) -> u32 {
        RISE_TIME_NS + PULSE_WIDTH_NS * self.scaler - self.data_setup()
    }

    /// Wait with enable high before driver-side sampling on a read
    #[must_use]
    pub const fn read_access(&self) -> u32 {
        READ_ACCESS_NS
    }

    /// Low phase between two enable pulses of one transaction
    ///
    /// Pads the strobe out to the minimum enable cycle time.
    #[must_use]
    pub const fn cycle_remainder(&self) -> u32 {
        MIN_CYCLE_NS * self.scaler - self.write_strobe()
    }

    /// Data hold after the final falling enable edge, fall-time compensated
    #[must_use]
    pub const fn end_hold(&self) -> u32 {
        DATA_HOLD_NS * self.scaler + FALL_TIME_NS
    }

    /// Setup wait used after every enable assertion for this direction
    #[must_use]
    pub const fn strobe_for(&self, is_read: bool) -> u32 {
        if is_read {
            self.read_access()
        } else {
            self.write_strobe()
        }
    }
}
