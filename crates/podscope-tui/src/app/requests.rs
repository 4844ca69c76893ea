//! Request fencing for panels that load asynchronously
//!
//! Every fetch is issued with a [`Ticket`]. Only the most recently issued
//! ticket for a panel is current; responses carrying an older ticket are
//! dropped, so rapid repeated actions render the last request issued rather
//! than whichever response happens to arrive last.

use std::collections::HashMap;

/// A part of the UI that is filled by one kind of request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Panel {
    Contexts,
    Pods,
    Logs,
    Describe,
}

impl Panel {
    /// Spinner text while a request for this panel is in flight
    pub fn loading_message(&self) -> &'static str {
        match self {
            Self::Contexts => "Loading contexts...",
            Self::Pods => "Loading pods...",
            Self::Logs => "Loading logs...",
            Self::Describe => "Loading pod details...",
        }
    }
}

/// Identity of one issued request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub panel: Panel,
    pub seq: u64,
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    /// Monotonic across resets so old tickets never become current again
    next_seq: u64,
    latest: HashMap<Panel, u64>,
    /// Current in-flight tickets, oldest first
    in_flight: Vec<Ticket>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket, superseding any earlier one for the same panel
    pub fn begin(&mut self, panel: Panel) -> Ticket {
        self.next_seq += 1;
        let ticket = Ticket {
            panel,
            seq: self.next_seq,
        };
        self.latest.insert(panel, ticket.seq);
        self.in_flight.retain(|t| t.panel != panel);
        self.in_flight.push(ticket);
        tracing::debug!(?panel, seq = ticket.seq, "Request issued");
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.get(&ticket.panel) == Some(&ticket.seq)
    }

    /// Mark a request as completed.
    ///
    /// Returns false for a superseded ticket, whose response must be ignored.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(panel = ?ticket.panel, seq = ticket.seq, "Dropping stale response");
            return false;
        }
        self.in_flight.retain(|t| *t != ticket);
        true
    }

    /// Abandon whatever is in flight for a panel
    pub fn cancel(&mut self, panel: Panel) {
        self.latest.remove(&panel);
        self.in_flight.retain(|t| t.panel != panel);
    }

    /// Abandon everything in flight
    pub fn reset(&mut self) {
        self.latest.clear();
        self.in_flight.clear();
    }

    pub fn is_loading(&self, panel: Panel) -> bool {
        self.in_flight.iter().any(|t| t.panel == panel)
    }

    /// Message of the most recently issued request still in flight
    pub fn spinner_message(&self) -> Option<&'static str> {
        self.in_flight.last().map(|t| t.panel.loading_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(Panel::Pods);
        let second = tracker.begin(Panel::Pods);

        // Second resolves first, then the stale one arrives
        assert!(tracker.finish(second));
        assert!(!tracker.finish(first));
        assert!(!tracker.is_loading(Panel::Pods));
    }

    #[test]
    fn test_stale_response_keeps_spinner() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(Panel::Logs);
        let second = tracker.begin(Panel::Logs);

        assert!(!tracker.finish(first));
        assert_eq!(tracker.spinner_message(), Some("Loading logs..."));
        assert!(tracker.finish(second));
        assert_eq!(tracker.spinner_message(), None);
    }

    #[test]
    fn test_panels_are_independent() {
        let mut tracker = RequestTracker::new();
        let pods = tracker.begin(Panel::Pods);
        let describe = tracker.begin(Panel::Describe);
        assert_eq!(tracker.spinner_message(), Some("Loading pod details..."));

        assert!(tracker.finish(describe));
        assert_eq!(tracker.spinner_message(), Some("Loading pods..."));
        assert!(tracker.finish(pods));
    }

    #[test]
    fn test_reset_and_cancel_invalidate() {
        let mut tracker = RequestTracker::new();
        let contexts = tracker.begin(Panel::Contexts);
        tracker.reset();
        assert!(!tracker.finish(contexts));

        let logs = tracker.begin(Panel::Logs);
        tracker.cancel(Panel::Logs);
        assert!(!tracker.is_current(logs));
        assert_eq!(tracker.spinner_message(), None);

        // Sequence numbers keep growing after a reset
        let again = tracker.begin(Panel::Contexts);
        assert!(again.seq > contexts.seq);
    }
}
