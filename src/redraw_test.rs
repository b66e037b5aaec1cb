use std::cell::Cell;
use std::rc::Rc;

use super::*;

/// Counts how many handles were dropped, standing in for a cancellable timer.
struct DropCounter(Rc<Cell<usize>>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn first_request_schedules() {
    let mut sched = RedrawScheduler::new();
    let mut calls = 0;
    assert!(sched.request_redraw(|| calls += 1));
    assert_eq!(calls, 1);
    assert!(sched.is_pending());
}

#[test]
fn burst_coalesces_into_one_timer() {
    let mut sched = RedrawScheduler::new();
    let mut scheduled = 0;
    for _ in 0..10 {
        sched.request_redraw(|| scheduled += 1);
    }
    assert_eq!(scheduled, 1);
    assert!(sched.fire());
    assert!(!sched.is_pending());
}

#[test]
fn request_after_fire_schedules_again() {
    let mut sched = RedrawScheduler::new();
    assert!(sched.request_redraw(|| ()));
    assert!(sched.fire());
    assert!(sched.request_redraw(|| ()));
}

#[test]
fn fire_without_request_owes_nothing() {
    let mut sched: RedrawScheduler<()> = RedrawScheduler::new();
    assert!(!sched.fire());
}

#[test]
fn cancel_drops_pending_handle() {
    let drops = Rc::new(Cell::new(0));
    let mut sched = RedrawScheduler::new();
    let handle_drops = Rc::clone(&drops);
    sched.request_redraw(move || DropCounter(handle_drops));
    assert_eq!(drops.get(), 0);
    assert!(sched.cancel());
    assert_eq!(drops.get(), 1);
    assert!(!sched.cancel());
    assert!(!sched.fire());
}

#[test]
fn dropping_scheduler_drops_handle() {
    let drops = Rc::new(Cell::new(0));
    {
        let mut sched = RedrawScheduler::new();
        let handle_drops = Rc::clone(&drops);
        sched.request_redraw(move || DropCounter(handle_drops));
    }
    assert_eq!(drops.get(), 1);
}
