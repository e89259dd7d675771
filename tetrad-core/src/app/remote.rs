//! Remote-control entry points
//!
//! Applies commands routed by the control server. A remote override
//! holds the display until its expiry; the next tick past the expiry
//! drops it and returns to the normal cycle.

use tetrad_protocol::{ApiCommand, ApiError, ApiReply, StatusReport};

use super::Application;
use crate::state::Event;
use crate::traits::{SegmentDisplay, TemperatureSensor};

impl<S: TemperatureSensor> Application<S> {
    /// Apply a command from the control server
    pub fn handle_api<D>(&mut self, display: &mut D, command: ApiCommand, now_ms: u64) -> ApiReply
    where
        D: SegmentDisplay + ?Sized,
    {
        match command {
            ApiCommand::Status => ApiReply::Status(self.status()),
            ApiCommand::Info => ApiReply::Info,
            _ if self.state.is_bootstrapping() => ApiReply::Error(ApiError::NotReady),
            ApiCommand::Clear => {
                self.clear_remote(display, now_ms);
                ApiReply::Ok
            }
            ApiCommand::Display {
                text,
                colon,
                degree,
                duration_s,
            } => {
                self.show_remote_text(display, &text, colon, degree, duration_s, now_ms);
                ApiReply::Ok
            }
            ApiCommand::Scroll {
                text,
                looping,
                duration_s,
            } => {
                self.scroll_remote_text(display, &text, looping, duration_s, now_ms);
                ApiReply::Ok
            }
        }
    }

    /// Snapshot for the status endpoint
    pub fn status(&self) -> StatusReport {
        StatusReport {
            ip: self.address_text(),
            state: self.state.name(),
            mode: self.rotation.name(),
        }
    }

    /// Write text statically and hold it for `duration_s`
    ///
    /// `None` indicators keep their current state.
    pub fn show_remote_text<D>(
        &mut self,
        display: &mut D,
        text: &str,
        colon: Option<bool>,
        degree: Option<bool>,
        duration_s: u32,
        now_ms: u64,
    ) where
        D: SegmentDisplay + ?Sized,
    {
        self.scroller.stop();
        display.write(text, colon, degree);
        self.enter_remote(Event::RemoteStatic, duration_s, now_ms);
    }

    /// Scroll text and hold the override for `duration_s`
    pub fn scroll_remote_text<D>(
        &mut self,
        display: &mut D,
        text: &str,
        looping: bool,
        duration_s: u32,
        now_ms: u64,
    ) where
        D: SegmentDisplay + ?Sized,
    {
        self.scroller.start(display, text, looping, now_ms);
        self.enter_remote(Event::RemoteScroll, duration_s, now_ms);
    }

    /// Stop scrolling, blank the display and drop any remote override
    pub fn clear_remote<D>(&mut self, display: &mut D, now_ms: u64)
    where
        D: SegmentDisplay + ?Sized,
    {
        self.scroller.stop();
        display.clear();
        self.remote_expiry_ms = None;
        self.apply(Event::RemoteCleared, now_ms);
    }

    fn enter_remote(&mut self, event: Event, duration_s: u32, now_ms: u64) {
        self.remote_expiry_ms = Some(now_ms + u64::from(duration_s) * 1000);
        self.apply(event, now_ms);
    }
}
