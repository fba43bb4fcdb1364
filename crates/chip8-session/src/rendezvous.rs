//! One-shot rendezvous with a host-managed rendering surface.
//!
//! The surface (a canvas on the web) is created by the host at an
//! unpredictable point relative to this module's own startup, so the bridge
//! needs a primitive that waits for it without racing surface creation. The
//! watch subscription is RAII-scoped: it is released on resolution and on
//! cancellation, never leaked past the moment the surface exists.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Result, SessionError};

/// Subscription to structural-change notifications under some watched root.
///
/// `notify` is invoked after every batch of structural changes. Dropping the
/// returned guard must stop notifications; implementations back this with
/// whatever observation API the host offers (a `MutationObserver` on the
/// web, a hand-cranked fake in tests).
pub trait StructureWatch {
    type Guard;

    fn subscribe(&self, notify: Box<dyn FnMut()>) -> Self::Guard;
}

/// Wait until `probe` finds a qualifying surface under the watched root.
///
/// The current state is probed FIRST: if the surface already exists at call
/// time this resolves without waiting for a notification that may never
/// come. Otherwise the watch is subscribed and the probe re-run on every
/// notification until it produces a handle; the subscription guard is
/// dropped before the handle is returned.
///
/// Fails with [`SessionError::SurfaceLost`] if the watch ends (sender side
/// dropped) without the probe ever succeeding, which is how a bounded watch
/// implementation reports giving up.
pub async fn await_surface<W, P, H>(watch: &W, probe: P) -> Result<H>
where
    W: StructureWatch,
    P: Fn() -> Option<H> + 'static,
    H: 'static,
{
    if let Some(handle) = probe() {
        return Ok(handle);
    }

    // `futures_intrusive`'s shared oneshot requires `T: Send`, which the
    // surface handle (a JS object on the web) is not; emulate its sender
    // half — close-on-drop included — over the unsync channel instead.
    struct Sender<H: 'static>(Rc<futures_intrusive::channel::LocalOneshotChannel<H>>);
    impl<H> Sender<H> {
        fn send(&self, handle: H) {
            self.0.send(handle).ok();
        }
    }
    impl<H> Drop for Sender<H> {
        fn drop(&mut self) {
            self.0.close();
        }
    }

    let channel = Rc::new(futures_intrusive::channel::LocalOneshotChannel::new());
    let sender = Rc::new(RefCell::new(Some(Sender(channel.clone()))));
    let guard = watch.subscribe(Box::new(move || {
        // Resolve exactly once; later notifications find the sender gone.
        if sender.borrow().is_none() {
            return;
        }
        if let Some(handle) = probe() {
            if let Some(sender) = sender.borrow_mut().take() {
                sender.send(handle);
            }
        }
    }));

    let handle = channel.receive().await;
    drop(guard);
    handle.ok_or(SessionError::SurfaceLost)
}
