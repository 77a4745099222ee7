//! Press lifecycle: idle → charging → locked, or cancelled back to idle.

use crate::capture::PointerId;
use crate::geometry::Point;
use derive_more::{Display, From, Into};
use std::time::{Duration, Instant};

pub const LONG_PRESS: Duration = Duration::from_millis(1500);
pub const QUICK_TAP: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct TimerId(u64);

/// One-shot timers supplied by the host event loop. A cancelled timer must
/// never be delivered.
pub trait Timers {
    fn arm(&mut self, delay: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    OpenChargingMenu(Point),
    LockMenu,
    CloseChargingMenu,
    DismissLockedMenu,
    SpawnRipple(Point),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressSession {
    pub start: Instant,
    pub origin: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Press {
    Idle,
    Charging {
        pointer: PointerId,
        session: PressSession,
        timer: TimerId,
    },
    Locked {
        pointer: PointerId,
        session: PressSession,
    },
}

#[derive(Debug)]
pub struct GestureController {
    press: Press,
}

impl Default for GestureController {
    fn default() -> Self {
        Self { press: Press::Idle }
    }
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_charging(&self) -> bool {
        matches!(self.press, Press::Charging { .. })
    }

    pub fn session(&self) -> Option<PressSession> {
        match self.press {
            Press::Idle => None,
            Press::Charging { session, .. } | Press::Locked { session, .. } => Some(session),
        }
    }

    fn active_pointer(&self) -> Option<PointerId> {
        match self.press {
            Press::Idle => None,
            Press::Charging { pointer, .. } | Press::Locked { pointer, .. } => Some(pointer),
        }
    }

    pub fn pointer_down(
        &mut self,
        pointer: PointerId,
        point: Point,
        now: Instant,
        menu_locked: bool,
        timers: &mut dyn Timers,
    ) -> Vec<Signal> {
        if self.active_pointer().is_some_and(|p| p != pointer) {
            log::debug!("ignoring pointer {} while another press is active", pointer);
            return Vec::new();
        }

        if menu_locked {
            self.end(timers);
            return vec![Signal::DismissLockedMenu];
        }

        // a fresh session never shares its timer with a previous one
        self.end(timers);

        let timer = timers.arm(LONG_PRESS);
        self.press = Press::Charging {
            pointer,
            session: PressSession {
                start: now,
                origin: point,
            },
            timer,
        };
        log::debug!("press started at {:?}, timer {}", point, timer);
        vec![Signal::OpenChargingMenu(point)]
    }

    pub fn timer_elapsed(&mut self, id: TimerId) -> Vec<Signal> {
        match self.press {
            Press::Charging {
                pointer,
                session,
                timer,
            } if timer == id => {
                log::debug!("long press reached, locking menu");
                self.press = Press::Locked { pointer, session };
                vec![Signal::LockMenu]
            }
            _ => {
                log::trace!("stale timer {} ignored", id);
                Vec::new()
            }
        }
    }

    pub fn pointer_up(
        &mut self,
        pointer: PointerId,
        point: Point,
        now: Instant,
        timers: &mut dyn Timers,
    ) -> Vec<Signal> {
        if self.active_pointer() != Some(pointer) {
            return Vec::new();
        }
        self.release(point, now, timers)
    }

    /// Leaving the surface ends the press as if it had been released.
    pub fn pointer_leave(
        &mut self,
        point: Point,
        now: Instant,
        timers: &mut dyn Timers,
    ) -> Vec<Signal> {
        self.release(point, now, timers)
    }

    fn release(&mut self, point: Point, now: Instant, timers: &mut dyn Timers) -> Vec<Signal> {
        match std::mem::replace(&mut self.press, Press::Idle) {
            Press::Idle => Vec::new(),
            Press::Locked { .. } => Vec::new(),
            Press::Charging { session, timer, .. } => {
                timers.cancel(timer);
                let mut signals = vec![Signal::CloseChargingMenu];
                if now.saturating_duration_since(session.start) < QUICK_TAP {
                    signals.push(Signal::SpawnRipple(point));
                }
                signals
            }
        }
    }

    fn end(&mut self, timers: &mut dyn Timers) {
        if let Press::Charging { timer, .. } = std::mem::replace(&mut self.press, Press::Idle) {
            timers.cancel(timer);
        }
    }
}

/// Manually driven timers for tests and headless hosts.
#[derive(Debug, Default)]
pub struct ManualTimers {
    next: u64,
    armed: Vec<(TimerId, Duration)>,
    pub cancelled: Vec<TimerId>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed(&self) -> impl Iterator<Item = TimerId> + '_ {
        self.armed.iter().map(|(id, _)| *id)
    }

    /// Removes and returns every armed timer due within `elapsed`.
    pub fn due(&mut self, elapsed: Duration) -> Vec<TimerId> {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.armed.drain(..).partition(|(_, d)| *d <= elapsed);
        self.armed = pending;
        due.into_iter().map(|(id, _)| id).collect()
    }
}

impl Timers for ManualTimers {
    fn arm(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next);
        self.next += 1;
        self.armed.push((id, delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.armed.retain(|(armed, _)| *armed != id);
        self.cancelled.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Point = Point { x: 500.0, y: 500.0 };

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_quick_tap_spawns_one_ripple() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut g = GestureController::new();

        let down = g.pointer_down(PointerId::TOUCH, P, t0, false, &mut timers);
        assert_eq!(down, vec![Signal::OpenChargingMenu(P)]);

        let up = g.pointer_up(PointerId::TOUCH, P, t0 + ms(80), &mut timers);
        assert_eq!(up, vec![Signal::CloseChargingMenu, Signal::SpawnRipple(P)]);
        assert_eq!(timers.armed().count(), 0);
    }

    #[test]
    fn test_failed_long_press_has_no_ripple() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut g = GestureController::new();

        g.pointer_down(PointerId::TOUCH, P, t0, false, &mut timers);
        let up = g.pointer_up(PointerId::TOUCH, P, t0 + ms(900), &mut timers);
        assert_eq!(up, vec![Signal::CloseChargingMenu]);
        assert!(timers.due(ms(5000)).is_empty());
    }

    #[test]
    fn test_hold_locks_exactly_once() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut g = GestureController::new();

        g.pointer_down(PointerId::TOUCH, P, t0, false, &mut timers);
        assert!(timers.due(ms(1499)).is_empty());
        let due = timers.due(LONG_PRESS);
        assert_eq!(due.len(), 1);

        assert_eq!(g.timer_elapsed(due[0]), vec![Signal::LockMenu]);
        assert!(g.timer_elapsed(due[0]).is_empty());

        // release after locking is inert
        assert!(g.pointer_up(PointerId::TOUCH, P, t0 + ms(1600), &mut timers).is_empty());
    }

    #[test]
    fn test_second_press_gets_its_own_timer() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut g = GestureController::new();

        g.pointer_down(PointerId::TOUCH, P, t0, false, &mut timers);
        let first = timers.armed().next().unwrap();
        g.pointer_up(PointerId::TOUCH, P, t0 + ms(300), &mut timers);
        assert_eq!(timers.cancelled, vec![first]);

        g.pointer_down(PointerId::TOUCH, P, t0 + ms(400), false, &mut timers);
        let second = timers.armed().next().unwrap();
        assert_ne!(first, second);
        assert!(g.timer_elapsed(first).is_empty());
        assert_eq!(g.timer_elapsed(second), vec![Signal::LockMenu]);
    }

    #[test]
    fn test_repeated_down_cancels_previous_timer() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut g = GestureController::new();

        g.pointer_down(PointerId::MOUSE, P, t0, false, &mut timers);
        g.pointer_down(PointerId::MOUSE, P, t0 + ms(10), false, &mut timers);
        assert_eq!(timers.armed().count(), 1);
        assert_eq!(timers.cancelled.len(), 1);
    }

    #[test]
    fn test_locked_menu_down_dismisses() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut g = GestureController::new();

        let signals = g.pointer_down(PointerId::TOUCH, P, t0, true, &mut timers);
        assert_eq!(signals, vec![Signal::DismissLockedMenu]);
        assert!(g.session().is_none());
        assert_eq!(timers.armed().count(), 0);
    }

    #[test]
    fn test_second_pointer_ignored() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut g = GestureController::new();

        g.pointer_down(PointerId::TOUCH, P, t0, false, &mut timers);
        let other = Point::new(10.0, 10.0);
        assert!(g.pointer_down(PointerId::MOUSE, other, t0, false, &mut timers).is_empty());
        assert!(g.pointer_up(PointerId::MOUSE, other, t0 + ms(50), &mut timers).is_empty());
        assert_eq!(g.session().map(|s| s.origin), Some(P));
    }

    #[test]
    fn test_stray_up_and_leave_are_noops() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut g = GestureController::new();

        assert!(g.pointer_up(PointerId::TOUCH, P, t0, &mut timers).is_empty());
        assert!(g.pointer_leave(P, t0, &mut timers).is_empty());
    }

    #[test]
    fn test_leave_behaves_like_up() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut g = GestureController::new();

        g.pointer_down(PointerId::TOUCH, P, t0, false, &mut timers);
        let signals = g.pointer_leave(P, t0 + ms(50), &mut timers);
        assert_eq!(signals, vec![Signal::CloseChargingMenu, Signal::SpawnRipple(P)]);
        assert!(!g.is_charging());
        assert_eq!(timers.armed().count(), 0);
    }
}
