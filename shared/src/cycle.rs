//! Bookkeeping for the periodic fetch-and-render cycle.
//!
//! At most one cycle is in flight. Every started cycle gets a sequence
//! number, and only the completion carrying the newest number may render.

/// Proof that a cycle was started; hand it back on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTicket(u64);

impl CycleTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct CycleGuard {
    latest: u64,
    in_flight: bool,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a cycle, or `None` if the previous one has not finished.
    pub fn begin(&mut self) -> Option<CycleTicket> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        self.latest += 1;
        Some(CycleTicket(self.latest))
    }

    /// Finish a cycle. Returns `true` if its result should be rendered.
    pub fn complete(&mut self, ticket: CycleTicket) -> bool {
        if ticket.0 != self.latest {
            return false;
        }
        self.in_flight = false;
        true
    }

    /// Drop the in-flight cycle so the next tick starts a fresh one. A late
    /// completion of the abandoned cycle is then ignored.
    pub fn abandon(&mut self) {
        if self.in_flight {
            self.in_flight = false;
            self.latest += 1;
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
