use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// Engine clock rate.
pub const TICKS_PER_SECOND: i32 = 50;

pub fn to_seconds(seconds: i32) -> i32 {
    seconds * TICKS_PER_SECOND
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FreezeLabel {
    Freeze,
    Unfreeze,
}

impl FreezeLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            FreezeLabel::Freeze => "freeze",
            FreezeLabel::Unfreeze => "unfreeze",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreezeEvent {
    pub label: FreezeLabel,
    pub depth: u32,
    pub lba_time: i32,
}

#[derive(Debug, Default)]
struct ClockState {
    lba_time: i32,
    depth: u32,
    saved_time: i32,
    history: Vec<FreezeEvent>,
}

impl ClockState {
    fn record(&mut self, label: FreezeLabel) {
        self.history.push(FreezeEvent {
            label,
            depth: self.depth,
            lba_time: self.lba_time,
        });
    }
}

/// Shared game clock. Blocking presentation freezes it so the outer
/// simulation does not advance while dialogue or fades are on screen.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    state: Rc<RefCell<ClockState>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClockSnapshot {
    pub lba_time: i32,
    pub frozen: bool,
    pub freeze_history: Vec<FreezeEvent>,
}

impl Clock {
    pub fn new(lba_time: i32) -> Self {
        let clock = Self::default();
        clock.state.borrow_mut().lba_time = lba_time;
        clock
    }

    pub fn now(&self) -> i32 {
        self.state.borrow().lba_time
    }

    pub fn is_frozen(&self) -> bool {
        self.state.borrow().depth > 0
    }

    /// Advance by `ticks`; does nothing while frozen.
    pub fn advance(&self, ticks: i32) {
        let mut state = self.state.borrow_mut();
        if state.depth == 0 {
            state.lba_time += ticks;
        }
    }

    /// Hold the clock until the returned guard is dropped. Nested freezes
    /// restore the time saved by the outermost one.
    #[must_use = "the clock unfreezes as soon as the guard is dropped"]
    pub fn freeze(&self) -> FreezeGuard {
        let mut state = self.state.borrow_mut();
        if state.depth == 0 {
            state.saved_time = state.lba_time;
        }
        state.depth += 1;
        state.record(FreezeLabel::Freeze);
        FreezeGuard {
            clock: self.clone(),
        }
    }

    fn unfreeze(&self) {
        let mut state = self.state.borrow_mut();
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            state.lba_time = state.saved_time;
        }
        state.record(FreezeLabel::Unfreeze);
    }

    pub fn history(&self) -> Vec<FreezeEvent> {
        self.state.borrow().history.clone()
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        let state = self.state.borrow();
        ClockSnapshot {
            lba_time: state.lba_time,
            frozen: state.depth > 0,
            freeze_history: state.history.clone(),
        }
    }
}

#[derive(Debug)]
pub struct FreezeGuard {
    clock: Clock,
}

impl Drop for FreezeGuard {
    fn drop(&mut self) {
        self.clock.unfreeze();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frozen_clock_ignores_advance() {
        let clock = Clock::new(100);
        {
            let _guard = clock.freeze();
            assert!(clock.is_frozen());
            clock.advance(25);
            assert_eq!(clock.now(), 100);
        }
        assert!(!clock.is_frozen());
        clock.advance(25);
        assert_eq!(clock.now(), 125);
    }

    #[test]
    fn nested_freezes_release_once() {
        let clock = Clock::new(7);
        let outer = clock.freeze();
        let inner = clock.freeze();
        drop(inner);
        assert!(clock.is_frozen());
        drop(outer);
        assert!(!clock.is_frozen());

        let labels: Vec<&str> = clock
            .history()
            .iter()
            .map(|event| event.label.as_str())
            .collect();
        assert_eq!(labels, vec!["freeze", "freeze", "unfreeze", "unfreeze"]);
    }

    #[test]
    fn guard_releases_on_early_return() {
        fn blocking(clock: &Clock) -> Result<(), &'static str> {
            let _guard = clock.freeze();
            Err("presentation failed")
        }

        let clock = Clock::new(0);
        assert!(blocking(&clock).is_err());
        assert!(!clock.is_frozen());
        assert_eq!(to_seconds(3), 150);
    }
}
