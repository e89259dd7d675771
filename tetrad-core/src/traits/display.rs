//! Display write interface

/// Anything the application and scroller can render text onto
///
/// Writes only touch memory. Pushing the buffer out to the segment lines
/// is the driver's refresh job and happens elsewhere.
pub trait SegmentDisplay {
    /// Write up to four visible characters
    ///
    /// `colon` and `degree` replace the indicator state when `Some` and
    /// leave it untouched when `None`.
    fn write(&mut self, text: &str, colon: Option<bool>, degree: Option<bool>);

    /// Blank the display and both indicators
    fn clear(&mut self) {
        self.write("", Some(false), Some(false));
    }
}

impl<T: SegmentDisplay + ?Sized> SegmentDisplay for &mut T {
    fn write(&mut self, text: &str, colon: Option<bool>, degree: Option<bool>) {
        (**self).write(text, colon, degree);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}
