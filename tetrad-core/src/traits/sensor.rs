//! Temperature sensor trait

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// The converter did not return a sample
    ReadFailed,
    /// Sample decoded to an implausible temperature
    OutOfRange,
}

/// Trait for temperature sensors
pub trait TemperatureSensor {
    /// Read the current temperature in degrees Celsius
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}
