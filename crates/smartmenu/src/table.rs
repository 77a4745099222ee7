//! The touch surface: routes pointer events to whatever is under them.

use crate::capture::{CaptureSlot, CaptureTarget, PointerId};
use crate::catalog::{self, ItemId};
use crate::effects::{EffectId, EffectSpawner};
use crate::gesture::{GestureController, LONG_PRESS, Signal, TimerId, Timers};
use crate::geometry::{Point, Viewport};
use crate::menu::{Level, MenuState};
use std::time::{Duration, Instant};

pub const HAPTIC_PULSE: Duration = Duration::from_millis(50);
/// Radius of the invisible grab area around the anchor.
pub const HANDLE_RADIUS: f64 = 64.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    VolumeClose,
    VolumeTrack,
    Item(ItemId),
    DetailAction(usize),
    DetailStage,
    Handle,
    Surface,
}

/// What the host has to do after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Response {
    pub should_redraw: bool,
    pub haptic: Option<Duration>,
}

impl Response {
    fn redraw() -> Self {
        Self {
            should_redraw: true,
            haptic: None,
        }
    }

    fn merge(self, other: Response) -> Self {
        Self {
            should_redraw: self.should_redraw || other.should_redraw,
            haptic: self.haptic.or(other.haptic),
        }
    }
}

#[derive(Debug)]
pub struct SmartTable {
    gesture: GestureController,
    menu: MenuState,
    effects: EffectSpawner,
    capture: CaptureSlot,
    /// Tap target pressed but not yet released.
    pressed: Option<(PointerId, Hit)>,
    charge_indicator: Option<EffectId>,
    last_point: Point,
}

impl SmartTable {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            gesture: GestureController::new(),
            menu: MenuState::new(viewport),
            effects: EffectSpawner::new(),
            capture: CaptureSlot::default(),
            pressed: None,
            charge_indicator: None,
            last_point: Point::default(),
        }
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn effects(&self) -> &EffectSpawner {
        &self.effects
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Response {
        self.menu.set_viewport(viewport);
        Response::redraw()
    }

    pub fn hit_test(&self, p: Point) -> Hit {
        let menu = &self.menu;
        if !menu.locked() {
            return Hit::Surface;
        }
        let anchor = menu.anchor();

        if menu.level() == Some(Level::Volume) {
            let arc = menu.volume_arc();
            if arc.hits_close_button(p) {
                return Hit::VolumeClose;
            }
            if arc.hits_track(p) {
                return Hit::VolumeTrack;
            }
        }

        if menu.items_interactive()
            && let Some(item) = catalog::items().find(|item| {
                let placement = menu.placement(item.id.index());
                p.distance_to(anchor + placement.offset) <= placement.radius()
            })
        {
            return Hit::Item(item.id);
        }

        if let Some(panel) = menu.detail_panel() {
            if let Some(i) = panel.action_at(p) {
                return Hit::DetailAction(i);
            }
            if panel.stage.contains(p) {
                return Hit::DetailStage;
            }
        }

        if p.distance_to(anchor) <= HANDLE_RADIUS {
            return Hit::Handle;
        }

        Hit::Surface
    }

    pub fn pointer_down(
        &mut self,
        pointer: PointerId,
        p: Point,
        now: Instant,
        timers: &mut dyn Timers,
    ) -> Response {
        self.last_point = p;
        if self.capture.is_held() || self.pressed.is_some_and(|(id, _)| id != pointer) {
            log::debug!("pointer {} ignored, another pointer owns the table", pointer);
            return Response::default();
        }

        match self.hit_test(p) {
            hit @ (Hit::Item(_) | Hit::VolumeClose) => {
                self.pressed = Some((pointer, hit));
                Response::default()
            }
            Hit::DetailAction(i) => {
                log::info!("detail action {} pressed (no device attached)", i);
                Response::default()
            }
            Hit::Handle | Hit::DetailStage => {
                // the handle swallows the press even where the anchor is fixed
                if self.menu.can_drag()
                    && self.capture.acquire(pointer, CaptureTarget::MenuHandle)
                {
                    self.menu.drag_start(p);
                }
                Response::default()
            }
            Hit::VolumeTrack => {
                if self.capture.acquire(pointer, CaptureTarget::VolumeTrack) {
                    self.update_volume(p);
                }
                Response::redraw()
            }
            Hit::Surface => {
                let signals =
                    self.gesture
                        .pointer_down(pointer, p, now, self.menu.locked(), timers);
                self.apply(signals, now)
            }
        }
    }

    pub fn pointer_move(&mut self, pointer: PointerId, p: Point) -> Response {
        self.last_point = p;
        match self.capture.target_for(pointer) {
            Some(CaptureTarget::MenuHandle) => {
                self.menu.drag_move(p);
                Response::redraw()
            }
            Some(CaptureTarget::VolumeTrack) => {
                self.update_volume(p);
                Response::redraw()
            }
            None => Response::default(),
        }
    }

    pub fn pointer_up(
        &mut self,
        pointer: PointerId,
        p: Point,
        now: Instant,
        timers: &mut dyn Timers,
    ) -> Response {
        self.last_point = p;
        let mut response = Response::default();

        if self.capture.target_for(pointer).is_some() {
            let released = self.capture.take();
            let target = released.as_ref().map(|c| c.target());
            response = response.merge(self.finish_capture(target));
        }

        if let Some((owner, target)) = self.pressed
            && owner == pointer
        {
            self.pressed = None;
            if self.hit_test(p) == target {
                response = response.merge(self.tap(target));
            }
        }

        let signals = self.gesture.pointer_up(pointer, p, now, timers);
        response.merge(self.apply(signals, now))
    }

    /// The pointer left the surface: every in-flight interaction ends here.
    pub fn pointer_leave(&mut self, now: Instant, timers: &mut dyn Timers) -> Response {
        let released = self.capture.take();
        let response = self.finish_capture(released.as_ref().map(|c| c.target()));
        self.pressed = None;

        let signals = self.gesture.pointer_leave(self.last_point, now, timers);
        response.merge(self.apply(signals, now))
    }

    pub fn timer_elapsed(&mut self, id: TimerId, now: Instant) -> Response {
        let signals = self.gesture.timer_elapsed(id);
        self.apply(signals, now)
    }

    /// Closes the menu from outside the pointer flow (e.g. a key press).
    pub fn close(&mut self, now: Instant, timers: &mut dyn Timers) -> Response {
        let response = self.pointer_leave(now, timers);
        if self.menu.dismiss() {
            return Response::redraw();
        }
        response
    }

    /// Expires finished effects. Returns true while something is animating.
    pub fn tick(&mut self, now: Instant) -> bool {
        let removed = self.effects.expire(now);
        removed > 0 || self.is_animating(now)
    }

    /// Live effects or the item entrance. An idle open menu needs no frames.
    pub fn is_animating(&self, now: Instant) -> bool {
        !self.effects.is_empty() || self.menu.is_entering(now)
    }

    fn finish_capture(&mut self, target: Option<CaptureTarget>) -> Response {
        match target {
            Some(CaptureTarget::MenuHandle) => {
                self.menu.drag_end();
                Response::redraw()
            }
            Some(CaptureTarget::VolumeTrack) => Response::redraw(),
            None => Response::default(),
        }
    }

    fn update_volume(&mut self, p: Point) {
        let value = self.menu.volume_arc().value_at(p);
        self.menu.set_volume(value);
    }

    fn tap(&mut self, target: Hit) -> Response {
        let changed = match target {
            Hit::Item(id) => self.menu.tap_item(id),
            Hit::VolumeClose => self.menu.close_level(),
            _ => false,
        };
        Response {
            should_redraw: changed,
            haptic: None,
        }
    }

    fn apply(&mut self, signals: Vec<Signal>, now: Instant) -> Response {
        signals
            .into_iter()
            .map(|signal| self.apply_one(signal, now))
            .fold(Response::default(), Response::merge)
    }

    fn apply_one(&mut self, signal: Signal, now: Instant) -> Response {
        log::trace!("signal {:?}", signal);
        match signal {
            Signal::OpenChargingMenu(p) => {
                self.menu.begin_charging(p, now);
                self.clear_charge_indicator();
                self.charge_indicator =
                    Some(self.effects.spawn_charge_indicator(p, LONG_PRESS, now));
                Response::redraw()
            }
            Signal::LockMenu => {
                self.clear_charge_indicator();
                if !self.menu.lock() {
                    return Response::redraw();
                }
                self.effects.spawn_success_burst(self.menu.anchor(), now);
                Response {
                    should_redraw: true,
                    haptic: Some(HAPTIC_PULSE),
                }
            }
            Signal::CloseChargingMenu => {
                self.clear_charge_indicator();
                self.menu.cancel();
                Response::redraw()
            }
            Signal::DismissLockedMenu => {
                self.menu.dismiss();
                Response::redraw()
            }
            Signal::SpawnRipple(p) => {
                self.effects.spawn_ripple(p, now);
                Response::redraw()
            }
        }
    }

    fn clear_charge_indicator(&mut self) {
        if let Some(id) = self.charge_indicator.take() {
            self.effects.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;
    use crate::geometry::polar_offset;
    use crate::gesture::ManualTimers;
    use crate::menu::Phase;

    const VIEW: Viewport = Viewport {
        width: 1920.0,
        height: 1080.0,
    };
    const TOUCH: PointerId = PointerId::TOUCH;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn ripples(table: &SmartTable) -> usize {
        table
            .effects()
            .count(|k| matches!(k, EffectKind::Ripple))
    }

    fn bursts(table: &SmartTable) -> usize {
        table
            .effects()
            .count(|k| matches!(k, EffectKind::SuccessBurst))
    }

    fn charges(table: &SmartTable) -> usize {
        table
            .effects()
            .count(|k| matches!(k, EffectKind::ChargeIndicator { .. }))
    }

    /// Holds at `p` until the long press fires and releases.
    fn open_locked(table: &mut SmartTable, timers: &mut ManualTimers, p: Point, t0: Instant) {
        table.pointer_down(TOUCH, p, t0, timers);
        for id in timers.due(LONG_PRESS) {
            table.timer_elapsed(id, t0 + LONG_PRESS);
        }
        table.pointer_up(TOUCH, p, t0 + ms(1600), timers);
        assert_eq!(table.menu().phase(), Phase::Locked(Level::Radial));
    }

    fn item_point(table: &SmartTable, id: ItemId) -> Point {
        table.menu().anchor() + table.menu().placement(id.index()).offset
    }

    #[test]
    fn test_hold_locks_with_burst_and_haptics() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        let p = Point::new(500.0, 500.0);

        table.pointer_down(TOUCH, p, t0, &mut timers);
        assert_eq!(table.menu().phase(), Phase::Charging);
        assert_eq!(charges(&table), 1);

        let due = timers.due(ms(1600));
        assert_eq!(due.len(), 1);
        let response = table.timer_elapsed(due[0], t0 + ms(1500));

        assert_eq!(table.menu().phase(), Phase::Locked(Level::Radial));
        assert_eq!(response.haptic, Some(HAPTIC_PULSE));
        assert_eq!(bursts(&table), 1);
        assert_eq!(charges(&table), 0);
        let burst = table
            .effects()
            .sample(t0 + ms(1600))
            .into_iter()
            .next()
            .map(|l| l.center);
        assert_eq!(burst, Some(p));
    }

    #[test]
    fn test_quick_tap_ripples_without_lock() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        let p = Point::new(500.0, 500.0);

        table.pointer_down(TOUCH, p, t0, &mut timers);
        table.pointer_up(TOUCH, p, t0 + ms(80), &mut timers);

        assert_eq!(ripples(&table), 1);
        assert_eq!(charges(&table), 0);
        assert_eq!(table.menu().phase(), Phase::Closed);
        assert!(timers.due(ms(10_000)).is_empty());
    }

    #[test]
    fn test_outside_tap_dismisses_locked_menu() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        open_locked(&mut table, &mut timers, Point::new(960.0, 540.0), t0);

        let far = Point::new(100.0, 900.0);
        table.pointer_down(TOUCH, far, t0 + ms(3000), &mut timers);
        assert_eq!(table.menu().phase(), Phase::Closed);
        table.pointer_up(TOUCH, far, t0 + ms(3050), &mut timers);
        // the dismissing tap does not start a new press or ripple
        assert_eq!(table.menu().phase(), Phase::Closed);
        assert_eq!(ripples(&table), 0);
        assert_eq!(timers.armed().count(), 0);
    }

    #[test]
    fn test_item_tap_opens_detail_and_clamps() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        open_locked(&mut table, &mut timers, Point::new(250.0, 700.0), t0);

        let car = item_point(&table, ItemId::Car);
        assert_eq!(table.hit_test(car), Hit::Item(ItemId::Car));
        table.pointer_down(TOUCH, car, t0 + ms(2000), &mut timers);
        table.pointer_up(TOUCH, car, t0 + ms(2050), &mut timers);

        assert_eq!(table.menu().active_item(), Some(ItemId::Car));
        assert_eq!(table.menu().anchor(), Point::new(340.0, 700.0));
    }

    #[test]
    fn test_item_press_released_elsewhere_does_nothing() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        open_locked(&mut table, &mut timers, Point::new(960.0, 540.0), t0);

        let seat = item_point(&table, ItemId::Seat);
        table.pointer_down(TOUCH, seat, t0 + ms(2000), &mut timers);
        table.pointer_up(TOUCH, Point::new(5.0, 5.0), t0 + ms(2050), &mut timers);
        assert_eq!(table.menu().phase(), Phase::Locked(Level::Radial));
    }

    #[test]
    fn test_volume_drag_and_close() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        open_locked(&mut table, &mut timers, Point::new(960.0, 540.0), t0);

        let volume = item_point(&table, ItemId::Volume);
        table.pointer_down(TOUCH, volume, t0 + ms(2000), &mut timers);
        table.pointer_up(TOUCH, volume, t0 + ms(2050), &mut timers);
        assert_eq!(table.menu().phase(), Phase::Locked(Level::Volume));

        let arc = table.menu().volume_arc();
        // the close button sits where the volume item was
        assert_eq!(table.hit_test(volume), Hit::VolumeClose);

        let start = arc.knob_center(0.6);
        table.pointer_down(TOUCH, start, t0 + ms(3000), &mut timers);
        // the captured pointer keeps driving the value outside the track
        table.pointer_move(TOUCH, arc.center + polar_offset(arc.end + 10.0, 400.0));
        assert_eq!(table.menu().volume_level(), Some(1.0));
        table.pointer_move(TOUCH, Point::new(arc.center.x - 900.0, arc.center.y + 1.0));
        assert_eq!(table.menu().volume_level(), Some(0.0));
        table.pointer_up(TOUCH, start, t0 + ms(3100), &mut timers);

        // once released, moves no longer change the level
        table.pointer_move(TOUCH, arc.knob_center(1.0));
        assert_eq!(table.menu().volume_level(), Some(0.0));

        let close = arc.close_button_center();
        table.pointer_down(TOUCH, close, t0 + ms(4000), &mut timers);
        table.pointer_up(TOUCH, close, t0 + ms(4050), &mut timers);
        assert_eq!(table.menu().phase(), Phase::Locked(Level::Radial));
    }

    #[test]
    fn test_leave_releases_capture() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        open_locked(&mut table, &mut timers, Point::new(960.0, 540.0), t0);

        let anchor = table.menu().anchor();
        assert_eq!(table.hit_test(anchor), Hit::Handle);
        table.pointer_down(TOUCH, anchor, t0 + ms(2000), &mut timers);
        assert!(table.menu().is_dragging());
        table.pointer_move(TOUCH, Point::new(800.0, 500.0));
        table.pointer_leave(t0 + ms(2100), &mut timers);

        assert!(!table.menu().is_dragging());
        assert_eq!(table.menu().anchor(), Point::new(800.0, 500.0));
        // a later press on the surface is not blocked by a stale capture
        table.pointer_down(TOUCH, Point::new(10.0, 1000.0), t0 + ms(3000), &mut timers);
        assert_eq!(table.menu().phase(), Phase::Closed);
    }

    #[test]
    fn test_handle_drag_does_not_dismiss() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        open_locked(&mut table, &mut timers, Point::new(960.0, 540.0), t0);

        let anchor = table.menu().anchor();
        table.pointer_down(TOUCH, anchor, t0 + ms(2000), &mut timers);
        table.pointer_move(TOUCH, Point::new(1000.0, 600.0));
        table.pointer_up(TOUCH, Point::new(1000.0, 600.0), t0 + ms(2200), &mut timers);

        assert_eq!(table.menu().phase(), Phase::Locked(Level::Radial));
        assert_eq!(table.menu().anchor(), Point::new(1000.0, 600.0));
    }

    #[test]
    fn test_second_pointer_while_dragging_is_ignored() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        open_locked(&mut table, &mut timers, Point::new(960.0, 540.0), t0);

        let anchor = table.menu().anchor();
        table.pointer_down(TOUCH, anchor, t0 + ms(2000), &mut timers);
        table.pointer_down(PointerId::MOUSE, Point::new(5.0, 5.0), t0 + ms(2010), &mut timers);
        assert!(table.menu().locked());
        assert_eq!(timers.armed().count(), 0);
    }

    #[test]
    fn test_release_before_threshold_never_locks() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        let p = Point::new(500.0, 500.0);

        table.pointer_down(TOUCH, p, t0, &mut timers);
        table.pointer_up(TOUCH, p, t0 + ms(1400), &mut timers);
        assert!(timers.due(LONG_PRESS).is_empty());
        assert_eq!(table.menu().phase(), Phase::Closed);
        assert_eq!(ripples(&table), 0);
        // a timer that had already fired in the host is ignored
        assert_eq!(table.timer_elapsed(TimerId::from(0), t0 + LONG_PRESS), Response::default());
        assert_eq!(table.menu().phase(), Phase::Closed);
    }

    #[test]
    fn test_tick_expires_ripples() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        let p = Point::new(500.0, 500.0);

        table.pointer_down(TOUCH, p, t0, &mut timers);
        table.pointer_up(TOUCH, p, t0 + ms(50), &mut timers);
        assert!(table.is_animating(t0 + ms(100)));
        table.tick(t0 + ms(2100));
        assert!(!table.is_animating(t0 + ms(2100)));
    }

    #[test]
    fn test_idle_locked_menu_stops_animating() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        open_locked(&mut table, &mut timers, Point::new(960.0, 540.0), t0);

        assert!(table.is_animating(t0 + ms(1550)));
        let settled = t0 + ms(5000);
        // the burst expires on this frame, the next one has nothing to draw
        assert!(table.tick(settled));
        assert!(!table.tick(settled + ms(16)));
        assert!(table.menu().locked());
        assert!(!table.is_animating(settled));
    }

    #[test]
    fn test_menu_entrance_plays_during_charge() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        table.pointer_down(TOUCH, Point::new(500.0, 500.0), t0, &mut timers);

        let at = t0 + ms(700);
        assert_eq!(table.menu().phase(), Phase::Charging);
        assert!(table.is_animating(at));
        let progress: Vec<f64> = (0..catalog::ITEM_COUNT)
            .map(|i| table.menu().entrance(i, at))
            .collect();
        assert!(progress[0] >= 1.0);
        assert!(progress[2] > 0.0 && progress[2] < 1.0);
        assert_eq!(progress[4], 0.0);

        // items are visible but not tappable before the lock
        let apps = item_point(&table, ItemId::Apps);
        assert_eq!(table.hit_test(apps), Hit::Surface);
    }

    #[test]
    fn test_repeated_press_while_charging_reanchors() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        table.pointer_down(TOUCH, Point::new(500.0, 500.0), t0, &mut timers);

        let second = Point::new(900.0, 300.0);
        table.pointer_down(TOUCH, second, t0 + ms(300), &mut timers);
        assert_eq!(table.menu().phase(), Phase::Charging);
        assert_eq!(table.menu().anchor(), second);
        assert_eq!(charges(&table), 1);
        let indicator = table
            .effects()
            .sample(t0 + ms(600))
            .into_iter()
            .next()
            .map(|l| l.center);
        assert_eq!(indicator, Some(second));

        let due = timers.due(LONG_PRESS);
        assert_eq!(due.len(), 1);
        table.timer_elapsed(due[0], t0 + ms(1800));
        assert_eq!(table.menu().phase(), Phase::Locked(Level::Radial));
        assert_eq!(table.menu().anchor(), second);
        let burst = table
            .effects()
            .sample(t0 + ms(1900))
            .into_iter()
            .next()
            .map(|l| l.center);
        assert_eq!(burst, Some(second));
    }

    #[test]
    fn test_center_tap_in_volume_keeps_menu() {
        let t0 = Instant::now();
        let mut timers = ManualTimers::new();
        let mut table = SmartTable::new(VIEW);
        open_locked(&mut table, &mut timers, Point::new(960.0, 540.0), t0);

        let volume = item_point(&table, ItemId::Volume);
        table.pointer_down(TOUCH, volume, t0 + ms(2000), &mut timers);
        table.pointer_up(TOUCH, volume, t0 + ms(2050), &mut timers);
        assert_eq!(table.menu().phase(), Phase::Locked(Level::Volume));

        let anchor = table.menu().anchor();
        assert_eq!(table.hit_test(anchor), Hit::Handle);
        table.pointer_down(TOUCH, anchor, t0 + ms(3000), &mut timers);
        assert!(!table.menu().is_dragging());
        table.pointer_move(TOUCH, Point::new(700.0, 400.0));
        table.pointer_up(TOUCH, Point::new(700.0, 400.0), t0 + ms(3100), &mut timers);

        assert_eq!(table.menu().phase(), Phase::Locked(Level::Volume));
        assert_eq!(table.menu().anchor(), anchor);
    }
}
