use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use chip8_session::{await_surface, SessionError, StructureWatch};

/// Hand-cranked structural watch: the test drives notifications via
/// [`ManualWatch::mutate`]. Tracks how many subscriptions are live so tests
/// can assert the guard was released.
#[derive(Clone, Default)]
struct ManualWatch {
    subscriber: Rc<RefCell<Option<Box<dyn FnMut()>>>>,
    live_subscriptions: Rc<Cell<usize>>,
}

struct ManualGuard {
    subscriber: Rc<RefCell<Option<Box<dyn FnMut()>>>>,
    live_subscriptions: Rc<Cell<usize>>,
}

impl Drop for ManualGuard {
    fn drop(&mut self) {
        self.subscriber.borrow_mut().take();
        self.live_subscriptions
            .set(self.live_subscriptions.get() - 1);
    }
}

impl StructureWatch for ManualWatch {
    type Guard = ManualGuard;

    fn subscribe(&self, notify: Box<dyn FnMut()>) -> ManualGuard {
        *self.subscriber.borrow_mut() = Some(notify);
        self.live_subscriptions.set(self.live_subscriptions.get() + 1);
        ManualGuard {
            subscriber: self.subscriber.clone(),
            live_subscriptions: self.live_subscriptions.clone(),
        }
    }
}

impl ManualWatch {
    /// Deliver one structural-change notification.
    fn mutate(&self) {
        let mut notify = self.subscriber.borrow_mut().take();
        if let Some(cb) = notify.as_mut() {
            cb();
        }
        // Only restore the callback if the guard did not clear the slot
        // while we were calling it.
        if self.subscriber.borrow().is_none() {
            *self.subscriber.borrow_mut() = notify;
        }
    }

    /// Simulate a bounded watch giving up: drop the notify closure.
    fn abandon(&self) {
        self.subscriber.borrow_mut().take();
    }
}

fn poll_once<F: Future>(future: &mut Pin<Box<F>>) -> Poll<F::Output> {
    let waker = futures_util::task::noop_waker();
    let mut cx = Context::from_waker(&waker);
    future.as_mut().poll(&mut cx)
}

#[test]
fn resolves_immediately_when_surface_already_exists() {
    let watch = ManualWatch::default();
    let surface: Rc<RefCell<Option<u32>>> = Rc::new(RefCell::new(Some(7)));

    let probe_surface = surface.clone();
    let handle =
        pollster::block_on(await_surface(&watch, move || *probe_surface.borrow())).unwrap();

    assert_eq!(handle, 7);
    // The current state was probed first; no subscription was ever taken.
    assert_eq!(watch.live_subscriptions.get(), 0);
}

#[test]
fn resolves_after_the_surface_appears() {
    let watch = ManualWatch::default();
    let surface: Rc<RefCell<Option<u32>>> = Rc::new(RefCell::new(None));

    let probe_surface = surface.clone();
    let mut future = Box::pin(await_surface(&watch, move || *probe_surface.borrow()));

    assert!(poll_once(&mut future).is_pending());
    assert_eq!(watch.live_subscriptions.get(), 1);

    // Unrelated structural change: still no surface.
    watch.mutate();
    assert!(poll_once(&mut future).is_pending());

    *surface.borrow_mut() = Some(42);
    watch.mutate();

    match poll_once(&mut future) {
        Poll::Ready(Ok(handle)) => assert_eq!(handle, 42),
        other => panic!("expected resolution, got {other:?}"),
    }
    drop(future);
    assert_eq!(watch.live_subscriptions.get(), 0);
}

#[test]
fn resolves_exactly_once_despite_later_mutations() {
    let watch = ManualWatch::default();
    let surface: Rc<RefCell<Option<u32>>> = Rc::new(RefCell::new(None));

    let probe_surface = surface.clone();
    let mut future = Box::pin(await_surface(&watch, move || *probe_surface.borrow()));
    assert!(poll_once(&mut future).is_pending());

    *surface.borrow_mut() = Some(1);
    watch.mutate();
    watch.mutate();
    watch.mutate();

    match poll_once(&mut future) {
        Poll::Ready(Ok(handle)) => assert_eq!(handle, 1),
        other => panic!("expected resolution, got {other:?}"),
    }
}

#[test]
fn cancellation_releases_the_watch() {
    let watch = ManualWatch::default();
    let surface: Rc<RefCell<Option<u32>>> = Rc::new(RefCell::new(None));

    let probe_surface = surface.clone();
    let mut future = Box::pin(await_surface(&watch, move || *probe_surface.borrow()));
    assert!(poll_once(&mut future).is_pending());
    assert_eq!(watch.live_subscriptions.get(), 1);

    drop(future);
    assert_eq!(watch.live_subscriptions.get(), 0);
}

#[test]
fn abandoned_watch_reports_surface_lost() {
    let watch = ManualWatch::default();
    let surface: Rc<RefCell<Option<u32>>> = Rc::new(RefCell::new(None));

    let probe_surface = surface.clone();
    let mut future = Box::pin(await_surface(&watch, move || *probe_surface.borrow()));
    assert!(poll_once(&mut future).is_pending());

    watch.abandon();

    match poll_once(&mut future) {
        Poll::Ready(Err(SessionError::SurfaceLost)) => {}
        other => panic!("expected SurfaceLost, got {other:?}"),
    }
}
