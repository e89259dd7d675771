//! RP2040 on-chip temperature sensor
//!
//! The internal sensor is a biased diode on ADC input 4. Its voltage
//! falls about 1.721 mV per degree from 0.706 V at 27 °C.

use tetrad_core::traits::{SensorError, TemperatureSensor};

/// Full-scale count of the 12-bit converter
pub const ADC_COUNTS: f32 = 4096.0;

/// Converter reference voltage
pub const VREF: f32 = 3.3;

/// Sensor voltage at 27 °C
const V27: f32 = 0.706;

/// Sensor slope in volts per degree
const SLOPE: f32 = 0.001721;

/// Readings outside the chip's rated range are rejected
const MIN_CELSIUS: f32 = -40.0;
const MAX_CELSIUS: f32 = 125.0;

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read one 12-bit sample (0-4095)
    fn read(&mut self) -> Result<u16, SensorError>;
}

/// On-chip temperature sensor
pub struct OnChipTemperature<ADC> {
    adc: ADC,
}

impl<ADC: AdcReader> OnChipTemperature<ADC> {
    /// Create a sensor over the temperature ADC channel
    pub fn new(adc: ADC) -> Self {
        Self { adc }
    }

    /// Convert a raw sample to degrees Celsius
    pub fn raw_to_celsius(raw: u16) -> f32 {
        let volts = f32::from(raw) * VREF / ADC_COUNTS;
        27.0 - (volts - V27) / SLOPE
    }
}

impl<ADC: AdcReader> TemperatureSensor for OnChipTemperature<ADC> {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let celsius = Self::raw_to_celsius(self.adc.read()?);
        if (MIN_CELSIUS..=MAX_CELSIUS).contains(&celsius) {
            Ok(celsius)
        } else {
            Err(SensorError::OutOfRange)
        }
    }
}
