//! Application controller
//!
//! Owns the state machine and everything that decides what the display
//! shows: the scroller, rotation timers, manual cursor, remote expiry and
//! the wall clock. It never touches hardware. Each entry point takes the
//! display to write to and the current monotonic time, so the firmware
//! loop and the host tests drive it the same way.
//!
//! Work that needs I/O (joining the network) is handed back to the caller
//! as a [`Command`]; the caller reports the outcome through
//! [`Application::connect_finished`].

mod remote;

use crate::button::Debouncer;
use crate::clock::WallClock;
use crate::config::{DeviceConfig, MessagesConfig, TimingConfig};
use crate::format::{format_address, format_temperature, format_time, AddressText, SENSOR_FAULT};
use crate::scroller::Scroller;
use crate::state::machine::{MANUAL_ADDRESS_INDEX, MANUAL_PAGES};
use crate::state::{Event, RotationMode, State};
use crate::traits::{SegmentDisplay, TemperatureSensor};

/// Work the caller must perform on the application's behalf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Join the network, sync time, then call
    /// [`Application::connect_finished`]
    Connect,
}

/// A state change, reported once for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: State,
    pub to: State,
}

/// The display controller
pub struct Application<S> {
    state: State,
    scroller: Scroller,
    sensor: S,
    clock: WallClock,
    debouncer: Debouncer,
    timing: TimingConfig,
    messages: MessagesConfig,

    /// Address acquired by the last connect
    address: Option<[u8; 4]>,
    /// `Connect` issued and not yet answered
    connect_pending: bool,

    rotation: RotationMode,
    last_rotation_ms: u64,
    last_refresh_ms: u64,
    /// Re-render on the next tick regardless of the refresh timer
    refresh_now: bool,
    colon_on: bool,

    manual_index: u8,
    last_press_ms: u64,

    remote_expiry_ms: Option<u64>,

    transition: Option<Transition>,
}

impl<S: TemperatureSensor> Application<S> {
    /// Create a controller in [`State::Startup`]
    pub fn new(config: &DeviceConfig, sensor: S) -> Self {
        Self {
            state: State::Startup,
            scroller: Scroller::new(config.timing.scroll_interval_ms),
            sensor,
            clock: WallClock::new(config.network.utc_offset_minutes),
            debouncer: Debouncer::new(config.button.debounce_ms),
            timing: config.timing,
            messages: config.messages.clone(),
            address: None,
            connect_pending: false,
            rotation: RotationMode::Time,
            last_rotation_ms: 0,
            last_refresh_ms: 0,
            refresh_now: true,
            colon_on: false,
            manual_index: 0,
            last_press_ms: 0,
            remote_expiry_ms: None,
            transition: None,
        }
    }

    /// Run one state-machine step
    ///
    /// Timeouts are checked first so that a looping scroll cannot hold a
    /// manual or remote override open. After that an active scroll owns
    /// the frame and nothing else happens this tick.
    pub fn tick<D>(&mut self, display: &mut D, now_ms: u64) -> Option<Command>
    where
        D: SegmentDisplay + ?Sized,
    {
        self.check_timeouts(now_ms);

        if self.scroller.is_active() {
            self.scroller.update(display, now_ms);
            return None;
        }

        match self.state {
            State::Startup => {
                self.scroller
                    .start(display, &self.messages.startup, false, now_ms);
                self.apply(Event::StartupScrollStarted, now_ms);
            }
            State::AwaitScroll(_) => {
                self.apply(Event::ScrollFinished, now_ms);
            }
            State::ConnectingWifi if !self.connect_pending => {
                self.connect_pending = true;
                display.write(&self.messages.connecting, None, None);
                return Some(Command::Connect);
            }
            State::NormalCycle => self.normal_cycle(display, now_ms),
            State::ManualMode => self.manual_page(display, now_ms),
            State::ConnectingWifi
            | State::ManualIpScroll
            | State::ApiStatic
            | State::ApiScroll => {}
        }

        None
    }

    /// Report the outcome of [`Command::Connect`]
    ///
    /// Starts the address scroll (or the failure message) and waits for
    /// it before entering the normal cycle.
    pub fn connect_finished<D>(&mut self, display: &mut D, address: Option<[u8; 4]>, now_ms: u64)
    where
        D: SegmentDisplay + ?Sized,
    {
        self.address = address;
        if self.state != State::ConnectingWifi {
            return;
        }
        self.connect_pending = false;

        match address {
            Some(_) => {
                let text = format_address(address);
                self.scroller.start(display, &text, false, now_ms);
            }
            None => self
                .scroller
                .start(display, &self.messages.wifi_failed, false, now_ms),
        }
        self.apply(Event::ConnectFinished, now_ms);
    }

    /// Record a successful time sync
    pub fn time_synced(&mut self, unix_seconds: u64, now_ms: u64) {
        self.clock.sync(unix_seconds, now_ms);
    }

    /// Feed a raw button sample through the debouncer
    ///
    /// Returns whether a press was accepted.
    pub fn sample_button<D>(&mut self, display: &mut D, pressed: bool, now_ms: u64) -> bool
    where
        D: SegmentDisplay + ?Sized,
    {
        self.debouncer.sample(pressed, now_ms) && self.button_pressed(display, now_ms)
    }

    /// Handle a debounced press
    ///
    /// From outside manual mode this enters page 0; inside it, advances
    /// to the next page. Any scroll or remote override is abandoned.
    /// Presses are refused while the network is still being brought up.
    pub fn button_pressed<D>(&mut self, display: &mut D, now_ms: u64) -> bool
    where
        D: SegmentDisplay + ?Sized,
    {
        if self.state.is_bootstrapping() {
            return false;
        }

        self.last_press_ms = now_ms;
        self.scroller.stop();
        self.remote_expiry_ms = None;
        self.manual_index = if self.state.is_manual() {
            (self.manual_index + 1) % MANUAL_PAGES
        } else {
            0
        };
        self.apply(
            Event::ButtonPressed {
                index: self.manual_index,
            },
            now_ms,
        );

        if self.manual_index == MANUAL_ADDRESS_INDEX {
            let text = self.address_text();
            self.scroller.start(display, &text, true, now_ms);
        } else {
            self.refresh_now = true;
            self.manual_page(display, now_ms);
        }
        true
    }

    /// Take the state change since the last call, if any
    pub fn take_transition(&mut self) -> Option<Transition> {
        self.transition.take()
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// What the normal cycle is showing
    pub fn rotation(&self) -> RotationMode {
        self.rotation
    }

    /// Manual page cursor (0..3)
    pub fn manual_index(&self) -> u8 {
        self.manual_index
    }

    /// Acquired network address
    pub fn address(&self) -> Option<[u8; 4]> {
        self.address
    }

    /// Address as displayed and reported
    pub fn address_text(&self) -> AddressText {
        format_address(self.address)
    }

    /// When the remote override ends
    pub fn remote_expiry_ms(&self) -> Option<u64> {
        self.remote_expiry_ms
    }

    /// The scroller
    pub fn scroller(&self) -> &Scroller {
        &self.scroller
    }

    /// Apply an event, recording the transition and running entry actions
    fn apply(&mut self, event: Event, now_ms: u64) {
        let next = self.state.transition(event);
        if next == self.state {
            return;
        }

        let from = self.transition.map_or(self.state, |t| t.from);
        self.transition = Some(Transition { from, to: next });
        self.state = next;

        if next == State::NormalCycle {
            self.last_rotation_ms = now_ms;
            self.refresh_now = true;
        }
    }

    fn check_timeouts(&mut self, now_ms: u64) {
        if self.state.is_remote() {
            if self.remote_expiry_ms.is_some_and(|expiry| now_ms >= expiry) {
                self.scroller.stop();
                self.remote_expiry_ms = None;
                self.apply(Event::RemoteExpired, now_ms);
            }
        } else if self.state.is_manual()
            && now_ms.saturating_sub(self.last_press_ms) > self.timing.manual_timeout_ms()
        {
            self.scroller.stop();
            self.apply(Event::ManualTimeout, now_ms);
        }
    }

    fn normal_cycle<D>(&mut self, display: &mut D, now_ms: u64)
    where
        D: SegmentDisplay + ?Sized,
    {
        if now_ms.saturating_sub(self.last_rotation_ms) > self.timing.rotation_ms(self.rotation) {
            self.last_rotation_ms = now_ms;
            self.rotation = self.rotation.toggled();
        }

        if self.refresh_due(now_ms) {
            match self.rotation {
                RotationMode::Time => {
                    self.colon_on = !self.colon_on;
                    self.show_time(display, self.colon_on, now_ms);
                }
                RotationMode::Temperature => self.show_temperature(display),
            }
        }
    }

    fn manual_page<D>(&mut self, display: &mut D, now_ms: u64)
    where
        D: SegmentDisplay + ?Sized,
    {
        if self.refresh_due(now_ms) {
            if self.manual_index == 0 {
                self.show_time(display, true, now_ms);
            } else {
                self.show_temperature(display);
            }
        }
    }

    fn refresh_due(&mut self, now_ms: u64) -> bool {
        let due = self.refresh_now
            || now_ms.saturating_sub(self.last_refresh_ms)
                >= u64::from(self.timing.content_refresh_ms);
        if due {
            self.refresh_now = false;
            self.last_refresh_ms = now_ms;
        }
        due
    }

    fn show_time<D>(&self, display: &mut D, colon: bool, now_ms: u64)
    where
        D: SegmentDisplay + ?Sized,
    {
        let now = self.clock.time_of_day(now_ms);
        display.write(&format_time(now.hour, now.minute), Some(colon), Some(false));
    }

    fn show_temperature<D>(&mut self, display: &mut D)
    where
        D: SegmentDisplay + ?Sized,
    {
        match self.sensor.read_celsius() {
            Ok(celsius) if celsius.is_finite() => {
                display.write(&format_temperature(celsius), Some(false), Some(true));
            }
            _ => display.write(SENSOR_FAULT, Some(false), Some(false)),
        }
    }
}
