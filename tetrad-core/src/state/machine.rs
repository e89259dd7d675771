//! State machine definition
//!
//! What the display shows is a function of the current state. Transitions
//! are driven by [`Event`]s that the application raises from timers,
//! the button and remote commands.

use super::events::Event;

/// Manual cursor position that scrolls the network address
pub const MANUAL_ADDRESS_INDEX: u8 = 2;

/// Number of manual pages (time, temperature, address)
pub const MANUAL_PAGES: u8 = 3;

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Power-on, nothing shown yet
    Startup,
    /// A scroll owns the display; move on once it finishes
    AwaitScroll(Pending),
    /// Connectivity bootstrap in progress
    ConnectingWifi,
    /// Periodic time/temperature rotation
    NormalCycle,
    /// Button-selected time or temperature page
    ManualMode,
    /// Button-selected looping address scroll
    ManualIpScroll,
    /// Remote text held until its expiry
    ApiStatic,
    /// Remote scroll running until its expiry
    ApiScroll,
}

/// Where [`State::AwaitScroll`] goes once the scroll ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pending {
    ConnectingWifi,
    NormalCycle,
}

impl Pending {
    /// The state this resolves to
    pub const fn state(self) -> State {
        match self {
            Pending::ConnectingWifi => State::ConnectingWifi,
            Pending::NormalCycle => State::NormalCycle,
        }
    }
}

/// What the normal cycle is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RotationMode {
    #[default]
    Time,
    Temperature,
}

impl RotationMode {
    /// The other mode
    pub const fn toggled(self) -> Self {
        match self {
            RotationMode::Time => RotationMode::Temperature,
            RotationMode::Temperature => RotationMode::Time,
        }
    }

    /// Name reported over the control API
    pub const fn name(self) -> &'static str {
        match self {
            RotationMode::Time => "time",
            RotationMode::Temperature => "temp",
        }
    }
}

impl State {
    /// Upper-snake name reported over the control API
    pub const fn name(&self) -> &'static str {
        match self {
            State::Startup => "STARTUP",
            State::AwaitScroll(_) => "AWAIT_SCROLL",
            State::ConnectingWifi => "CONNECTING_WIFI",
            State::NormalCycle => "NORMAL_CYCLE",
            State::ManualMode => "MANUAL_MODE",
            State::ManualIpScroll => "MANUAL_IP_SCROLL",
            State::ApiStatic => "API_STATIC",
            State::ApiScroll => "API_SCROLL",
        }
    }

    /// Check if this is a button-driven state
    pub fn is_manual(&self) -> bool {
        matches!(self, State::ManualMode | State::ManualIpScroll)
    }

    /// Check if this is a remote override
    pub fn is_remote(&self) -> bool {
        matches!(self, State::ApiStatic | State::ApiScroll)
    }

    /// Check if the connectivity bootstrap is still running
    ///
    /// Button and remote overrides are ignored until it completes, since
    /// leaving these states early would skip network bring-up.
    pub fn is_bootstrapping(&self) -> bool {
        matches!(
            self,
            State::Startup | State::AwaitScroll(Pending::ConnectingWifi) | State::ConnectingWifi
        )
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Bootstrap sequence
            (Startup, StartupScrollStarted) => AwaitScroll(Pending::ConnectingWifi),
            (AwaitScroll(pending), ScrollFinished) => pending.state(),
            (ConnectingWifi, ConnectFinished) => AwaitScroll(Pending::NormalCycle),

            // Overrides are refused while bootstrapping
            (s, ButtonPressed { .. } | RemoteStatic | RemoteScroll | RemoteCleared)
                if s.is_bootstrapping() =>
            {
                s
            }

            // Manual override (preempts remote override)
            (_, ButtonPressed { index }) if index == MANUAL_ADDRESS_INDEX => ManualIpScroll,
            (_, ButtonPressed { .. }) => ManualMode,
            (ManualMode | ManualIpScroll, ManualTimeout) => NormalCycle,

            // Remote override (latest input wins)
            (_, RemoteStatic) => ApiStatic,
            (_, RemoteScroll) => ApiScroll,
            (ApiStatic | ApiScroll, RemoteExpired) => NormalCycle,
            (_, RemoteCleared) => NormalCycle,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_sequence() {
        let s = State::Startup.transition(Event::StartupScrollStarted);
        assert_eq!(s, State::AwaitScroll(Pending::ConnectingWifi));
        let s = s.transition(Event::ScrollFinished);
        assert_eq!(s, State::ConnectingWifi);
        let s = s.transition(Event::ConnectFinished);
        assert_eq!(s, State::AwaitScroll(Pending::NormalCycle));
        let s = s.transition(Event::ScrollFinished);
        assert_eq!(s, State::NormalCycle);
    }

    #[test]
    fn test_button_pages() {
        let s = State::NormalCycle.transition(Event::ButtonPressed { index: 0 });
        assert_eq!(s, State::ManualMode);
        let s = s.transition(Event::ButtonPressed { index: 1 });
        assert_eq!(s, State::ManualMode);
        let s = s.transition(Event::ButtonPressed { index: 2 });
        assert_eq!(s, State::ManualIpScroll);
        let s = s.transition(Event::ManualTimeout);
        assert_eq!(s, State::NormalCycle);
    }

    #[test]
    fn test_overrides_refused_while_bootstrapping() {
        let states = [
            State::Startup,
            State::AwaitScroll(Pending::ConnectingWifi),
            State::ConnectingWifi,
        ];

        for state in states {
            assert_eq!(state.transition(Event::ButtonPressed { index: 0 }), state);
            assert_eq!(state.transition(Event::RemoteStatic), state);
            assert_eq!(state.transition(Event::RemoteScroll), state);
        }
    }

    #[test]
    fn test_button_allowed_during_address_scroll() {
        let s = State::AwaitScroll(Pending::NormalCycle);
        assert_eq!(s.transition(Event::ButtonPressed { index: 0 }), State::ManualMode);
    }

    #[test]
    fn test_manual_preempts_remote() {
        let s = State::ApiScroll.transition(Event::ButtonPressed { index: 0 });
        assert_eq!(s, State::ManualMode);
    }

    #[test]
    fn test_remote_preempts_manual() {
        assert_eq!(State::ManualMode.transition(Event::RemoteStatic), State::ApiStatic);
        assert_eq!(State::ManualIpScroll.transition(Event::RemoteScroll), State::ApiScroll);
    }

    #[test]
    fn test_remote_expiry_and_clear() {
        for state in [State::ApiStatic, State::ApiScroll] {
            assert_eq!(state.transition(Event::RemoteExpired), State::NormalCycle);
            assert_eq!(state.transition(Event::RemoteCleared), State::NormalCycle);
        }
        // Expiry only ends a remote override
        assert_eq!(State::ManualMode.transition(Event::RemoteExpired), State::ManualMode);
    }

    #[test]
    fn test_clear_returns_to_normal_cycle() {
        let states = [
            State::ManualMode,
            State::ManualIpScroll,
            State::AwaitScroll(Pending::NormalCycle),
            State::NormalCycle,
        ];
        for state in states {
            assert_eq!(state.transition(Event::RemoteCleared), State::NormalCycle);
        }
        assert_eq!(
            State::ConnectingWifi.transition(Event::RemoteCleared),
            State::ConnectingWifi
        );
    }

    #[test]
    fn test_timeout_only_affects_manual() {
        assert_eq!(State::ApiStatic.transition(Event::ManualTimeout), State::ApiStatic);
        assert_eq!(State::NormalCycle.transition(Event::ManualTimeout), State::NormalCycle);
    }

    #[test]
    fn test_names() {
        assert_eq!(State::AwaitScroll(Pending::NormalCycle).name(), "AWAIT_SCROLL");
        assert_eq!(State::ManualIpScroll.name(), "MANUAL_IP_SCROLL");
        assert_eq!(RotationMode::Temperature.name(), "temp");
        assert_eq!(RotationMode::Time.toggled(), RotationMode::Temperature);
    }
}
