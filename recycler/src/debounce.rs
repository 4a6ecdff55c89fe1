/// Collapses a burst of triggers into one run after an idle period.
///
/// Last call wins: every [`Debouncer::schedule`] replaces the pending deadline. Time is
/// supplied by the caller in milliseconds, so the owner decides what a "turn" is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Debouncer {
    delay_ms: u64,
    deadline_ms: Option<u64>,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline_ms: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms;
    }

    /// (Re)arms the debouncer to fire `delay_ms` after `now_ms`, cancelling any earlier arm.
    pub fn schedule(&mut self, now_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(self.delay_ms));
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Returns `true` exactly once when the deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Disarms and returns whether something was pending, so the caller can run it now.
    pub fn flush(&mut self) -> bool {
        self.deadline_ms.take().is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }
}
