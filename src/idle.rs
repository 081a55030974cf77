/// A single deferred callback keyed on a host-supplied clock.
///
/// Scheduling replaces any pending run, so at most one is ever in flight. The host drives it
/// with `take_due(now_ms)`, which fires at most once per schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdleTask {
    due_at_ms: Option<u64>,
}

impl IdleTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64) {
        self.due_at_ms = Some(now_ms.saturating_add(delay_ms));
    }

    pub fn cancel(&mut self) {
        self.due_at_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due_at_ms.is_some()
    }

    /// Returns `true` once when the scheduled time has passed and clears the schedule.
    pub fn take_due(&mut self, now_ms: u64) -> bool {
        match self.due_at_ms {
            Some(due) if now_ms >= due => {
                self.due_at_ms = None;
                true
            }
            _ => false,
        }
    }
}
