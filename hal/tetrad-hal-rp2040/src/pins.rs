//! Pin claiming by GPIO number
//!
//! The display and button wiring comes from the device configuration, so
//! pins are taken by number at runtime instead of by peripheral name.
//! The four GPIOs wired to the CYW43 radio are split off up front and
//! can never be handed out by number.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::{
    ADC, ADC_TEMP_SENSOR, DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0, WATCHDOG,
};
use embassy_rp::{Peri, Peripherals};
use tetrad_core::config::hardware::RESERVED_GPIOS;

use crate::gpio::GPIO_COUNT;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin reserved for the radio
    Reserved,
}

/// Pins wired to the CYW43 radio
pub struct RadioPins {
    /// Regulator enable
    pub power: Peri<'static, PIN_23>,
    /// SPI data in/out
    pub dio: Peri<'static, PIN_24>,
    /// SPI chip select
    pub cs: Peri<'static, PIN_25>,
    /// SPI clock
    pub clk: Peri<'static, PIN_29>,
}

/// Non-GPIO peripherals the firmware uses
pub struct RemainingPeripherals {
    pub pio0: Peri<'static, PIO0>,
    pub dma_ch0: Peri<'static, DMA_CH0>,
    pub adc: Peri<'static, ADC>,
    pub temp_sensor: Peri<'static, ADC_TEMP_SENSOR>,
    pub watchdog: Peri<'static, WATCHDOG>,
}

/// Bank of general-purpose GPIOs, taken by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Split the peripherals into the pin bank, the radio pins and the rest
    pub fn split(p: Peripherals) -> (Self, RadioPins, RemainingPeripherals) {
        let bank = Self {
            pins: [
                Some(p.PIN_0.into()),
                Some(p.PIN_1.into()),
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                Some(p.PIN_10.into()),
                Some(p.PIN_11.into()),
                Some(p.PIN_12.into()),
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                None,
                None,
                None,
                Some(p.PIN_26.into()),
                Some(p.PIN_27.into()),
                Some(p.PIN_28.into()),
                None,
            ],
        };
        let radio = RadioPins {
            power: p.PIN_23,
            dio: p.PIN_24,
            cs: p.PIN_25,
            clk: p.PIN_29,
        };
        let remaining = RemainingPeripherals {
            pio0: p.PIO0,
            dma_ch0: p.DMA_CH0,
            adc: p.ADC,
            temp_sensor: p.ADC_TEMP_SENSOR,
            watchdog: p.WATCHDOG,
        };
        (bank, radio, remaining)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        let slot = self
            .pins
            .get_mut(usize::from(pin_num))
            .ok_or(PinError::InvalidPin)?;
        if RESERVED_GPIOS.contains(&pin_num) {
            return Err(PinError::Reserved);
        }
        slot.take().ok_or(PinError::AlreadyTaken)
    }

    /// Check if a pin is available
    pub fn is_available(&self, pin_num: u8) -> bool {
        self.pins
            .get(usize::from(pin_num))
            .is_some_and(|slot| slot.is_some())
    }
}
