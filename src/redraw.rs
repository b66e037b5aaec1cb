//! Debounced redraw scheduling.
//!
//! The scheduler owns at most one pending timer handle. Requests that arrive
//! while a timer is pending are coalesced into that timer, so a burst of
//! scene mutations (an erase commit that reorders every object, say) paints
//! once. The handle type is generic: the browser host uses
//! `gloo_timers::callback::Timeout`, which cancels itself on drop, and tests
//! use a plain marker.

#[cfg(test)]
#[path = "redraw_test.rs"]
mod redraw_test;

#[derive(Debug)]
pub struct RedrawScheduler<H> {
    pending: Option<H>,
}

impl<H> Default for RedrawScheduler<H> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<H> RedrawScheduler<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a redraw. `schedule` is only called when no timer is pending;
    /// its handle is kept until [`fire`](Self::fire) or
    /// [`cancel`](Self::cancel). Returns whether a new timer was scheduled.
    pub fn request_redraw(&mut self, schedule: impl FnOnce() -> H) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(schedule());
        true
    }

    /// The pending timer elapsed. Returns whether a redraw was owed.
    pub fn fire(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Drop the pending timer, if any. Returns whether one was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
