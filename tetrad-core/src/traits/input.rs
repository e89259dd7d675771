//! Button input trait

/// A momentary push button
pub trait ButtonInput {
    /// Raw (undebounced) pressed state
    fn is_pressed(&mut self) -> bool;
}
