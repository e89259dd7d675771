//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Bootstrap events
    /// The startup message has been handed to the scroller
    StartupScrollStarted,
    /// The scroller went inactive
    ScrollFinished,
    /// Connectivity bootstrap returned (either way)
    ConnectFinished,

    // Button events
    /// Debounced press; `index` is the manual page after the press
    ButtonPressed { index: u8 },
    /// No press for the manual timeout
    ManualTimeout,

    // Remote events
    /// Remote static text accepted
    RemoteStatic,
    /// Remote scroll accepted
    RemoteScroll,
    /// Remote override reached its expiry
    RemoteExpired,
    /// Remote clear request
    RemoteCleared,
}
