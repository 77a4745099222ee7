//! Menu session state: visibility, lock, active level and drag overlay.

use crate::catalog::{ITEM_COUNT, ItemId};
use crate::geometry::{Point, Rect, Viewport};
use crate::layout::{self, ENTRANCE_WINDOW, ItemPlacement, LayoutConfig};
use crate::volume::{INITIAL_VOLUME, VolumeArc};
use std::time::Instant;

pub const DETAIL_PANEL_WIDTH: f64 = 600.0;
/// How far the detail panel reaches above the anchor.
pub const DETAIL_PANEL_RISE: f64 = 480.0;
/// How far the collapsed item row reaches below the anchor.
pub const DETAIL_ROW_DROP: f64 = 128.0;
pub const CLAMP_PADDING: f64 = 40.0;

/// Gap between the bottom of the panel and the anchor.
pub const DETAIL_PANEL_GAP: f64 = 24.0;
pub const DETAIL_STAGE_HEIGHT: f64 = DETAIL_PANEL_WIDTH * 9.0 / 16.0;
pub const DETAIL_ACTION_SIZE: f64 = 80.0;
pub const DETAIL_ACTION_GAP: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Radial,
    Detail(ItemId),
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Charging,
    Locked(Level),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Pointer position minus anchor at drag start.
    pub grab_offset: Point,
}

/// Projects `anchor` so the detail panel and item row fit inside the
/// viewport with [`CLAMP_PADDING`] on every side. Idempotent.
pub fn bounded_position(anchor: Point, viewport: Viewport) -> Point {
    let half = DETAIL_PANEL_WIDTH / 2.0;
    let clamp = |v: f64, lo: f64, hi: f64| {
        if lo > hi { (lo + hi) / 2.0 } else { v.clamp(lo, hi) }
    };
    Point::new(
        clamp(
            anchor.x,
            CLAMP_PADDING + half,
            viewport.width - CLAMP_PADDING - half,
        ),
        clamp(
            anchor.y,
            CLAMP_PADDING + DETAIL_PANEL_RISE,
            viewport.height - CLAMP_PADDING - DETAIL_ROW_DROP,
        ),
    )
}

/// Footprint of the detail panel drawn above an anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailPanel {
    /// Drag surface showing the item's model.
    pub stage: Rect,
    pub actions: [Point; crate::catalog::DETAIL_ACTION_COUNT],
}

impl DetailPanel {
    pub fn above(anchor: Point) -> Self {
        let bottom = anchor.y - DETAIL_PANEL_GAP;
        let row_y = bottom - DETAIL_ACTION_SIZE / 2.0;
        let stage_bottom = bottom - DETAIL_ACTION_SIZE - DETAIL_PANEL_GAP;
        let stage = Rect::new(
            anchor.x - DETAIL_PANEL_WIDTH / 2.0,
            stage_bottom - DETAIL_STAGE_HEIGHT,
            DETAIL_PANEL_WIDTH,
            DETAIL_STAGE_HEIGHT,
        );
        let pitch = DETAIL_ACTION_SIZE + DETAIL_ACTION_GAP;
        let actions = std::array::from_fn(|i| Point::new(anchor.x + (i as f64 - 1.0) * pitch, row_y));
        Self { stage, actions }
    }

    pub fn action_at(&self, p: Point) -> Option<usize> {
        self.actions
            .iter()
            .position(|c| c.distance_to(p) <= DETAIL_ACTION_SIZE / 2.0)
    }
}

#[derive(Debug)]
pub struct MenuState {
    phase: Phase,
    anchor: Point,
    viewport: Viewport,
    layout: LayoutConfig,
    volume: f64,
    drag: Option<DragSession>,
    opened_at: Option<Instant>,
    visited_level: bool,
}

impl MenuState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            phase: Phase::Closed,
            anchor: Point::default(),
            viewport,
            layout: LayoutConfig::default(),
            volume: INITIAL_VOLUME,
            drag: None,
            opened_at: None,
            visited_level: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn visible(&self) -> bool {
        self.phase != Phase::Closed
    }

    pub fn locked(&self) -> bool {
        matches!(self.phase, Phase::Locked(_))
    }

    pub fn level(&self) -> Option<Level> {
        match self.phase {
            Phase::Locked(level) => Some(level),
            _ => None,
        }
    }

    pub fn active_item(&self) -> Option<ItemId> {
        match self.phase {
            Phase::Locked(Level::Detail(id)) => Some(id),
            Phase::Locked(Level::Volume) => Some(ItemId::Volume),
            _ => None,
        }
    }

    pub fn volume_level(&self) -> Option<f64> {
        (self.active_item() == Some(ItemId::Volume)).then_some(self.volume)
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn volume_arc(&self) -> VolumeArc {
        VolumeArc::new(self.anchor, &self.layout, ITEM_COUNT)
    }

    pub fn detail_panel(&self) -> Option<DetailPanel> {
        matches!(self.phase, Phase::Locked(Level::Detail(_)))
            .then(|| DetailPanel::above(self.anchor))
    }

    /// Whether the centre drag handle is live.
    pub fn can_drag(&self) -> bool {
        matches!(
            self.phase,
            Phase::Locked(Level::Radial) | Phase::Locked(Level::Detail(_))
        )
    }

    pub fn items_interactive(&self) -> bool {
        matches!(
            self.phase,
            Phase::Locked(Level::Radial) | Phase::Locked(Level::Detail(_))
        )
    }

    pub fn placement(&self, index: usize) -> ItemPlacement {
        match self.phase {
            Phase::Locked(Level::Detail(_)) => layout::row_placement(index, ITEM_COUNT),
            _ => layout::radial_placement(&self.layout, index, ITEM_COUNT),
        }
    }

    /// Entrance animation progress for item `index`; 1.0 once settled.
    pub fn entrance(&self, index: usize, now: Instant) -> f64 {
        match self.opened_at {
            Some(opened) if !self.visited_level => {
                let elapsed = now.saturating_duration_since(opened);
                if elapsed >= ENTRANCE_WINDOW {
                    1.0
                } else {
                    layout::entrance_progress(index, elapsed)
                }
            }
            _ => 1.0,
        }
    }

    /// True while items are still flying out from the anchor.
    pub fn is_entering(&self, now: Instant) -> bool {
        self.opened_at.is_some_and(|opened| {
            !self.visited_level && now.saturating_duration_since(opened) < ENTRANCE_WINDOW
        })
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.detail_panel().is_some() && self.drag.is_none() {
            self.anchor = bounded_position(self.anchor, viewport);
        }
        self.relayout();
    }

    fn relayout(&mut self) {
        self.layout = layout::resolve(self.anchor, self.viewport);
    }

    fn move_anchor(&mut self, anchor: Point) {
        self.anchor = anchor;
        self.relayout();
    }

    fn clamp_anchor(&mut self) {
        let bounded = bounded_position(self.anchor, self.viewport);
        if bounded != self.anchor {
            log::debug!("anchor {:?} snapped to {:?}", self.anchor, bounded);
            self.move_anchor(bounded);
        }
    }

    /// Starts (or restarts, from a new press point) the charging phase.
    pub fn begin_charging(&mut self, anchor: Point, now: Instant) -> bool {
        if self.locked() {
            return false;
        }
        self.phase = Phase::Charging;
        self.volume = INITIAL_VOLUME;
        self.drag = None;
        self.opened_at = Some(now);
        self.visited_level = false;
        self.move_anchor(anchor);
        true
    }

    pub fn lock(&mut self) -> bool {
        if self.phase != Phase::Charging {
            return false;
        }
        log::debug!("menu locked at {:?}", self.anchor);
        self.phase = Phase::Locked(Level::Radial);
        true
    }

    pub fn cancel(&mut self) -> bool {
        if self.phase != Phase::Charging {
            return false;
        }
        self.close();
        true
    }

    pub fn dismiss(&mut self) -> bool {
        if !self.locked() {
            return false;
        }
        log::debug!("menu dismissed");
        self.close();
        true
    }

    fn close(&mut self) {
        self.phase = Phase::Closed;
        self.drag = None;
        self.opened_at = None;
    }

    pub fn tap_item(&mut self, id: ItemId) -> bool {
        let next = match self.phase {
            Phase::Locked(Level::Radial) if id.is_volume() => Level::Volume,
            Phase::Locked(Level::Radial) => Level::Detail(id),
            Phase::Locked(Level::Detail(_)) => Level::Radial,
            _ => return false,
        };
        self.enter(next);
        true
    }

    /// The close button of the volume control or the detail panel.
    pub fn close_level(&mut self) -> bool {
        match self.phase {
            Phase::Locked(Level::Detail(_)) | Phase::Locked(Level::Volume) => {
                self.enter(Level::Radial);
                true
            }
            _ => false,
        }
    }

    fn enter(&mut self, level: Level) {
        log::debug!("menu level {:?} -> {:?}", self.level(), level);
        self.phase = Phase::Locked(level);
        if level != Level::Radial {
            self.visited_level = true;
        }
        if level == Level::Volume {
            self.drag = None;
        }
        if matches!(level, Level::Detail(_)) {
            self.clamp_anchor();
        }
    }

    pub fn set_volume(&mut self, value: f64) -> bool {
        if self.phase != Phase::Locked(Level::Volume) {
            return false;
        }
        self.volume = value.clamp(0.0, 1.0);
        true
    }

    pub fn drag_start(&mut self, pointer: Point) -> bool {
        if !self.can_drag() {
            return false;
        }
        self.drag = Some(DragSession {
            grab_offset: pointer - self.anchor,
        });
        true
    }

    pub fn drag_move(&mut self, pointer: Point) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        self.move_anchor(pointer - drag.grab_offset);
        true
    }

    pub fn drag_end(&mut self) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        if self.detail_panel().is_some() {
            self.clamp_anchor();
        }
        true
    }
}
