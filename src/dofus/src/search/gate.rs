//! Type-ahead request gating.
//!
//! [`SuggestionGate`] decides when a keystroke turns into a search
//! request: input shorter than [`MIN_QUERY_LEN`] clears suggestions,
//! longer input is debounced, and picking a suggestion suppresses the
//! search its own text change would otherwise trigger. Every input bumps
//! a generation counter so responses to superseded requests can be
//! discarded with [`SuggestionGate::is_current`].

use std::time::{Duration, Instant};

/// Shortest query that is sent to the provider
pub const MIN_QUERY_LEN: usize = 3;

/// Quiet period after the last keystroke before a request is issued
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// What the gate did with an input change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateInput {
    /// Query too short; suggestions should be cleared
    TooShort,
    /// Change came from picking a suggestion; no request
    Suppressed,
    /// A request is due once the debounce deadline passes
    Scheduled,
}

/// A request the caller should issue now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct SuggestionGate {
    debounce: Duration,
    min_len: usize,
    generation: u64,
    pending: Option<(Instant, String)>,
    suppress_next: bool,
}

impl Default for SuggestionGate {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SuggestionGate {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            min_len: MIN_QUERY_LEN,
            generation: 0,
            pending: None,
            suppress_next: false,
        }
    }

    /// Record an input change at `now`
    pub fn input(&mut self, query: &str, now: Instant) -> GateInput {
        self.generation += 1;
        self.pending = None;

        if self.suppress_next {
            self.suppress_next = false;
            return GateInput::Suppressed;
        }

        let query = query.trim();
        if query.chars().count() < self.min_len {
            return GateInput::TooShort;
        }

        self.pending = Some((now + self.debounce, query.to_string()));
        GateInput::Scheduled
    }

    /// The user picked a suggestion: drop pending work, invalidate in-flight
    /// responses and ignore the next input change
    pub fn pick(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.suppress_next = true;
    }

    /// When the pending request becomes due, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    /// Take the pending request if its debounce period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<Ticket> {
        match &self.pending {
            Some((due, _)) if *due <= now => {}
            _ => return None,
        }
        let (_, query) = self.pending.take()?;
        Some(Ticket {
            generation: self.generation,
            query,
        })
    }

    /// Whether a response for `ticket` may still be shown
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let start = Instant::now();
        let mut gate = SuggestionGate::default();

        assert_eq!(gate.input("bla", start), GateInput::Scheduled);
        assert_eq!(gate.input("blan", start + ms(100)), GateInput::Scheduled);

        assert!(gate.poll(start + ms(350)).is_none());
        let ticket = gate.poll(start + ms(400)).unwrap();
        assert_eq!(ticket.query, "blan");
        assert!(gate.is_current(&ticket));

        // taken once
        assert!(gate.poll(start + ms(1000)).is_none());
    }

    #[test]
    fn test_short_input_cancels_pending() {
        let start = Instant::now();
        let mut gate = SuggestionGate::default();
        gate.input("blé", start);
        assert_eq!(gate.input("bl", start + ms(50)), GateInput::TooShort);
        assert!(gate.deadline().is_none());
        assert!(gate.poll(start + ms(500)).is_none());
    }

    #[test]
    fn test_length_counts_characters() {
        let mut gate = SuggestionGate::default();
        assert_eq!(gate.input("œé", Instant::now()), GateInput::TooShort);
        assert_eq!(gate.input("œuf", Instant::now()), GateInput::Scheduled);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let start = Instant::now();
        let mut gate = SuggestionGate::default();
        gate.input("orge", start);
        let ticket = gate.poll(start + ms(300)).unwrap();

        gate.input("orges", start + ms(320));
        assert!(!gate.is_current(&ticket));
    }

    #[test]
    fn test_pick_suppresses_one_search() {
        let start = Instant::now();
        let mut gate = SuggestionGate::default();
        gate.input("chacha", start);
        let ticket = gate.poll(start + ms(300)).unwrap();

        gate.pick();
        assert!(!gate.is_current(&ticket));
        assert_eq!(gate.input("Chacha Tigré", start + ms(310)), GateInput::Suppressed);
        assert!(gate.poll(start + ms(2000)).is_none());

        // only the one change is suppressed
        assert_eq!(gate.input("Chacha Tigr", start + ms(2100)), GateInput::Scheduled);
    }
}
