//! Request/reply pairing
//!
//! The server task and the main loop exchange one command at a time, but a
//! request that timed out may still be answered later. Every message
//! carries the ticket of the request it belongs to, and the server only
//! accepts a reply whose ticket matches the request it is waiting on.

/// Identifies one request; wraps after `u32::MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ticket(u32);

impl Ticket {
    /// The ticket for the following request
    pub const fn next(self) -> Self {
        Ticket(self.0.wrapping_add(1))
    }

    /// Raw number, for logging
    pub const fn number(self) -> u32 {
        self.0
    }
}

/// A message tagged with the ticket of its request
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
    pub ticket: Ticket,
    pub body: T,
}

impl<T> Tagged<T> {
    pub const fn new(ticket: Ticket, body: T) -> Self {
        Self { ticket, body }
    }

    /// Whether this message belongs to `ticket`
    pub fn answers(&self, ticket: Ticket) -> bool {
        self.ticket == ticket
    }

    /// Keep the ticket, replace the body
    pub fn reply<R>(&self, body: R) -> Tagged<R> {
        Tagged::new(self.ticket, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApiCommand, ApiError, ApiReply};

    #[test]
    fn test_reply_keeps_ticket() {
        let request = Tagged::new(Ticket::default().next(), ApiCommand::Status);
        let reply = request.reply(ApiReply::Ok);
        assert!(reply.answers(request.ticket));
        assert_eq!(reply.ticket.number(), 1);
    }

    #[test]
    fn test_late_reply_rejected() {
        let first = Ticket::default().next();
        let second = first.next();

        // The first request timed out; its answer arrives during the second
        let late = Tagged::new(first, ApiCommand::Clear).reply(ApiReply::Error(ApiError::Timeout));
        assert!(!late.answers(second));

        let fresh = Tagged::new(second, ApiCommand::Info).reply(ApiReply::Info);
        assert!(fresh.answers(second));
        assert_eq!(fresh.body, ApiReply::Info);
    }

    #[test]
    fn test_ticket_wraps() {
        let last = Ticket(u32::MAX);
        assert_eq!(last.next(), Ticket::default());
        assert_ne!(last.next(), last);
    }
}
