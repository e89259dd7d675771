//! Board assembly
//!
//! Claims the configured GPIOs from the pin bank and builds the display
//! and button drivers over them.

use embassy_time::Delay;

use tetrad_core::config::{ButtonConfig, DeviceConfig, DisplayPinsConfig, PinConfig};
use tetrad_drivers::{DisplayLines, GpioButton, Line, MultiplexDisplay};
use tetrad_hal_rp2040::{GpioAllocator, PinBank, RpInput, RpOutput};

use crate::Fault;

/// The display as wired on this board
pub type Display = MultiplexDisplay<RpOutput, Delay>;

/// The mode button as wired on this board
pub type Button = GpioButton<RpInput>;

/// Reject configurations that reuse a pin or touch the radio's pins
pub fn check_pins(config: &DeviceConfig) -> Result<(), Fault> {
    GpioAllocator::new()
        .allocate_device(config)
        .map_err(|(pin, error)| Fault::PinConflict { pin, error })
}

/// Build the multiplexed display
pub fn display(bank: &mut PinBank, config: &DisplayPinsConfig) -> Result<Display, Fault> {
    let mut output = |pin: PinConfig| -> Result<RpOutput, Fault> {
        let peri = bank
            .take(pin.pin)
            .map_err(|error| Fault::PinClaim { pin: pin.pin, error })?;
        Ok(RpOutput::new(peri, false))
    };

    let mut segment = |pin: PinConfig| Ok::<_, Fault>(Line::cathode(output(pin)?, pin.inverted));
    let segments = [
        segment(config.segments[0])?,
        segment(config.segments[1])?,
        segment(config.segments[2])?,
        segment(config.segments[3])?,
        segment(config.segments[4])?,
        segment(config.segments[5])?,
        segment(config.segments[6])?,
    ];
    let decimal_point = segment(config.decimal_point)?;
    let colon_cathode = segment(config.colon_cathode)?;
    let degree_cathode = segment(config.degree_cathode)?;

    let mut anode = |pin: PinConfig| Ok::<_, Fault>(Line::anode(output(pin)?, pin.inverted));
    let digits = [
        anode(config.digits[0])?,
        anode(config.digits[1])?,
        anode(config.digits[2])?,
        anode(config.digits[3])?,
    ];
    let colon_anode = anode(config.colon_anode)?;
    let degree_anode = anode(config.degree_anode)?;

    let lines = DisplayLines {
        segments,
        decimal_point,
        digits,
        colon_anode,
        colon_cathode,
        degree_anode,
        degree_cathode,
    };
    Ok(MultiplexDisplay::new(lines, Delay, config.dwell_us))
}

/// Build the mode button
pub fn button(bank: &mut PinBank, config: &ButtonConfig) -> Result<Button, Fault> {
    let pin = config.pin;
    let peri = bank
        .take(pin.pin)
        .map_err(|error| Fault::PinClaim { pin: pin.pin, error })?;
    Ok(GpioButton::new(RpInput::new(peri, pin.pull_up), pin.inverted))
}
