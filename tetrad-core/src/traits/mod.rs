//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and the hardware-specific implementations in `tetrad-drivers`.

pub mod display;
pub mod input;
pub mod sensor;

pub use display::SegmentDisplay;
pub use input::ButtonInput;
pub use sensor::{SensorError, TemperatureSensor};
