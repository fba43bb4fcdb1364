use std::cell::RefCell;
use std::rc::Rc;

use chip8_session::{InputBridge, KeyEdgeSink, KeyFeedbackSink, Keymap};

const QWERTY: [&str; 16] = [
    "X", "1", "2", "3", "Q", "W", "E", "A", "S", "D", "Z", "C", "4", "R", "F", "V",
];

/// Records every key edge the bridge forwards to the core.
#[derive(Clone, Default)]
struct EdgeLog {
    edges: Rc<RefCell<Vec<(usize, bool)>>>,
}

impl KeyEdgeSink for EdgeLog {
    fn set_key_state(&mut self, key: usize, pressed: bool) {
        self.edges.borrow_mut().push((key, pressed));
    }
}

#[derive(Clone, Default)]
struct FeedbackLog {
    calls: Rc<RefCell<Vec<(usize, bool)>>>,
}

impl KeyFeedbackSink for FeedbackLog {
    fn key_pressed(&mut self, key: usize) {
        self.calls.borrow_mut().push((key, true));
    }

    fn key_released(&mut self, key: usize) {
        self.calls.borrow_mut().push((key, false));
    }
}

fn bridge() -> (InputBridge, EdgeLog) {
    let log = EdgeLog::default();
    let bridge = InputBridge::new(Keymap::new(QWERTY).unwrap(), Box::new(log.clone()));
    (bridge, log)
}

#[test]
fn press_release_forwards_one_edge_pair() {
    let (mut bridge, log) = bridge();

    bridge.host_press("E");
    bridge.host_release("E");

    assert_eq!(*log.edges.borrow(), vec![(6, true), (6, false)]);
}

#[test]
fn key_repeat_forwards_exactly_one_press() {
    let (mut bridge, log) = bridge();

    // Host key-repeat fires "down" over and over with no intervening "up".
    bridge.host_press("Q");
    bridge.host_press("Q");
    bridge.host_press("Q");
    bridge.host_release("Q");

    assert_eq!(*log.edges.borrow(), vec![(4, true), (4, false)]);
}

#[test]
fn redundant_release_is_a_noop() {
    let (mut bridge, log) = bridge();

    // mouseup followed by mouseleave on the same element.
    bridge.host_press("W");
    bridge.host_release("W");
    bridge.host_release("W");
    // touchcancel for a key that was never pressed at all.
    bridge.host_release("F");

    assert_eq!(*log.edges.borrow(), vec![(5, true), (5, false)]);
}

#[test]
fn unknown_identifiers_are_dropped_silently() {
    let (mut bridge, log) = bridge();

    bridge.host_press("Escape");
    bridge.host_release("Escape");

    assert!(log.edges.borrow().is_empty());
}

#[test]
fn simultaneous_sources_cannot_double_press() {
    let (mut bridge, log) = bridge();

    // mousedown and touchstart both land on the same keypad element.
    bridge.host_press("S");
    bridge.host_press("S");
    // Either source's release clears the mark; the other release is a no-op.
    bridge.host_release("S");
    bridge.host_release("S");

    assert_eq!(*log.edges.borrow(), vec![(8, true), (8, false)]);
}

#[test]
fn press_count_never_leads_release_count_by_more_than_one() {
    let (mut bridge, log) = bridge();

    let gestures: &[(&str, bool)] = &[
        ("E", true),
        ("E", true),
        ("E", false),
        ("E", false),
        ("E", true),
        ("E", true),
        ("E", false),
        ("E", true),
    ];
    for &(id, down) in gestures {
        if down {
            bridge.host_press(id);
        } else {
            bridge.host_release(id);
        }

        let (mut presses, mut releases) = (0i32, 0i32);
        for &(_, pressed) in log.edges.borrow().iter() {
            if pressed {
                presses += 1;
            } else {
                releases += 1;
            }
        }
        assert!(presses - releases <= 1);
        assert!(presses >= releases);
    }
}

#[test]
fn release_all_clears_held_keys_only() {
    let (mut bridge, log) = bridge();

    bridge.host_press("X");
    bridge.host_press("V");
    bridge.release_all();
    // A second sweep has nothing left to release.
    bridge.release_all();

    assert_eq!(
        *log.edges.borrow(),
        vec![(0, true), (15, true), (0, false), (15, false)]
    );
    assert!(!bridge.is_pressed(0));
    assert!(!bridge.is_pressed(15));
}

#[test]
fn core_key_changes_produce_one_feedback_call_per_change() {
    let (mut bridge, _log) = bridge();
    let feedback = FeedbackLog::default();
    bridge.set_feedback_sink(Box::new(feedback.clone()));

    bridge.core_key_changed(6, true);
    bridge.core_key_changed(6, true); // duplicate report from the core
    bridge.core_key_changed(6, false);
    bridge.core_key_changed(6, false);
    bridge.core_key_changed(16, true); // out of range, dropped

    assert_eq!(*feedback.calls.borrow(), vec![(6, true), (6, false)]);
}
