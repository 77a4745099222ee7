//! Screen-edge aware radial layout.
//!
//! The menu fans its items out along an arc that points away from whichever
//! viewport edge (or corner) the anchor is close to, so no item is clipped.

use crate::effects::Easing;
use crate::geometry::{Point, Viewport, Zone, polar_offset};
use std::time::Duration;

pub const EDGE_THRESHOLD: f64 = 180.0;
pub const MENU_RADIUS: f64 = 160.0;
pub const CORNER_RADIUS: f64 = 220.0;

/// Diameter of a menu item bubble at scale 1.
pub const ITEM_SIZE: f64 = 96.0;

pub const ROW_SPACING: f64 = 80.0;
pub const ROW_OFFSET_Y: f64 = 80.0;
pub const ROW_SCALE: f64 = 0.6;
pub const ROW_OPACITY: f64 = 0.3;

pub const ENTRANCE_STAGGER: Duration = Duration::from_millis(250);
pub const ENTRANCE_DURATION: Duration = Duration::from_millis(1000);
/// After this the items stop replaying their entrance animation.
pub const ENTRANCE_WINDOW: Duration = Duration::from_millis(1600);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub start: f64,
    pub end: f64,
    pub radius: f64,
    pub full_circle: bool,
}

impl LayoutConfig {
    const fn arc(start: f64, end: f64, radius: f64) -> Self {
        Self {
            start,
            end,
            radius,
            full_circle: false,
        }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Angular distance between neighbouring items.
    pub fn step(&self, count: usize) -> f64 {
        if self.full_circle {
            360.0 / count.max(1) as f64
        } else if count > 1 {
            self.span() / (count - 1) as f64
        } else {
            0.0
        }
    }

    pub fn item_angle(&self, index: usize, count: usize) -> f64 {
        self.start + index as f64 * self.step(count)
    }

    /// Offset of item `index` from the anchor.
    pub fn item_offset(&self, index: usize, count: usize) -> Point {
        polar_offset(self.item_angle(index, count), self.radius)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::arc(180.0, 360.0, MENU_RADIUS)
    }
}

/// Computes the arc for a menu anchored at `anchor`. Pure: identical inputs
/// always give identical layouts.
pub fn resolve(anchor: Point, viewport: Viewport) -> LayoutConfig {
    match Zone::classify(anchor, viewport, EDGE_THRESHOLD) {
        Zone::TopLeft => LayoutConfig::arc(0.0, 90.0, CORNER_RADIUS),
        Zone::TopRight => LayoutConfig::arc(90.0, 180.0, CORNER_RADIUS),
        Zone::BottomRight => LayoutConfig::arc(180.0, 270.0, CORNER_RADIUS),
        Zone::BottomLeft => LayoutConfig::arc(270.0, 360.0, CORNER_RADIUS),
        Zone::Top => LayoutConfig::arc(20.0, 160.0, MENU_RADIUS),
        Zone::Bottom => LayoutConfig::arc(200.0, 340.0, MENU_RADIUS),
        Zone::Left => LayoutConfig::arc(-70.0, 70.0, MENU_RADIUS),
        Zone::Right => LayoutConfig::arc(110.0, 250.0, MENU_RADIUS),
        Zone::Center => LayoutConfig::default(),
    }
}

/// Where and how an item bubble is drawn, relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPlacement {
    pub offset: Point,
    pub scale: f64,
    pub opacity: f64,
}

impl ItemPlacement {
    pub fn radius(&self) -> f64 {
        ITEM_SIZE * self.scale / 2.0
    }
}

pub fn radial_placement(layout: &LayoutConfig, index: usize, count: usize) -> ItemPlacement {
    ItemPlacement {
        offset: layout.item_offset(index, count),
        scale: 1.0,
        opacity: 1.0,
    }
}

/// Items collapse into a dimmed row under the anchor while a detail panel is open.
pub fn row_placement(index: usize, count: usize) -> ItemPlacement {
    let center_offset = (count.max(1) - 1) as f64 / 2.0;
    ItemPlacement {
        offset: Point::new((index as f64 - center_offset) * ROW_SPACING, ROW_OFFSET_Y),
        scale: ROW_SCALE,
        opacity: ROW_OPACITY,
    }
}

/// Progress (0..=1, may overshoot) of item `index` flying out from the anchor.
pub fn entrance_progress(index: usize, elapsed: Duration) -> f64 {
    let delay = ENTRANCE_STAGGER * index as u32;
    let Some(local) = elapsed.checked_sub(delay) else {
        return 0.0;
    };
    let t = (local.as_secs_f64() / ENTRANCE_DURATION.as_secs_f64()).min(1.0);
    Easing::EaseOutBack.apply(t)
}
