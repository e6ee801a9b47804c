use rondo_core::Debouncer;
use rondo_testing::TestScheduler;
use std::cell::RefCell;
use std::rc::Rc;

fn recording_debouncer(
    scheduler: &TestScheduler,
    delay_ms: u64,
) -> (Debouncer<i32>, Rc<RefCell<Vec<i32>>>) {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);
    let debouncer = Debouncer::new(scheduler.handle(), delay_ms, move |value| {
        sink.borrow_mut().push(value);
    });
    (debouncer, fired)
}

#[test]
fn burst_collapses_to_last_value() {
    let scheduler = TestScheduler::new();
    let (debouncer, fired) = recording_debouncer(&scheduler, 10);

    debouncer.call(1);
    debouncer.call(2);
    debouncer.call(3);
    assert!(fired.borrow().is_empty());

    scheduler.advance(10);
    assert_eq!(*fired.borrow(), vec![3]);

    scheduler.advance(100);
    assert_eq!(*fired.borrow(), vec![3]);
}

#[test]
fn window_restarts_on_each_call() {
    let scheduler = TestScheduler::new();
    let (debouncer, fired) = recording_debouncer(&scheduler, 10);

    debouncer.call(1);
    scheduler.advance(9);
    debouncer.call(2);
    scheduler.advance(9);
    assert!(fired.borrow().is_empty());

    scheduler.advance(1);
    assert_eq!(*fired.borrow(), vec![2]);
}

#[test]
fn separated_calls_each_fire() {
    let scheduler = TestScheduler::new();
    let (debouncer, fired) = recording_debouncer(&scheduler, 10);

    debouncer.call(1);
    scheduler.advance(10);
    debouncer.call(2);
    scheduler.advance(10);
    assert_eq!(*fired.borrow(), vec![1, 2]);
}

#[test]
fn cancel_drops_pending_invocation() {
    let scheduler = TestScheduler::new();
    let (debouncer, fired) = recording_debouncer(&scheduler, 10);

    debouncer.call(1);
    debouncer.cancel();
    scheduler.advance(100);
    assert!(fired.borrow().is_empty());
}
