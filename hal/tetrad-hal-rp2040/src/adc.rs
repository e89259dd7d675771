//! On-chip temperature channel
//!
//! ADC input 4 is the RP2040's internal temperature diode. Reading it
//! needs no GPIO, only the ADC block and the sensor's bias enable.

use embassy_rp::adc::{Adc, Blocking, Channel, Config};
use embassy_rp::peripherals::{ADC, ADC_TEMP_SENSOR};
use embassy_rp::Peri;
use tetrad_core::traits::SensorError;
use tetrad_drivers::AdcReader;

/// Blocking reader for ADC channel 4
pub struct TemperatureChannel {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl TemperatureChannel {
    pub fn new(adc: Peri<'static, ADC>, sensor: Peri<'static, ADC_TEMP_SENSOR>) -> Self {
        Self {
            adc: Adc::new_blocking(adc, Config::default()),
            channel: Channel::new_temp_sensor(sensor),
        }
    }
}

impl AdcReader for TemperatureChannel {
    fn read(&mut self) -> Result<u16, SensorError> {
        self.adc
            .blocking_read(&mut self.channel)
            .map_err(|_| SensorError::ReadFailed)
    }
}
