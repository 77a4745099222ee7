//! Arc-shaped volume slider that replaces the radial items.
//!
//! The track follows the menu arc from the first item up to just short of the
//! last slot, which holds the close button.

use crate::geometry::{ArcPath, Point, normalize_signed_degrees, polar_offset};
use crate::layout::LayoutConfig;

pub const INITIAL_VOLUME: f64 = 0.6;
/// Gap between the end of the track and the close button, in item steps.
pub const CLOSE_GAP_STEPS: f64 = 0.8;
pub const TRACK_WIDTH: f64 = 64.0;
pub const KNOB_RADIUS: f64 = 32.0;
pub const CLOSE_BUTTON_RADIUS: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeArc {
    pub center: Point,
    pub radius: f64,
    pub start: f64,
    pub end: f64,
    pub button_angle: f64,
}

impl VolumeArc {
    pub fn new(center: Point, layout: &LayoutConfig, item_count: usize) -> Self {
        let step = layout.step(item_count);
        Self {
            center,
            radius: layout.radius,
            start: layout.start,
            end: layout.end - step * CLOSE_GAP_STEPS,
            button_angle: layout.end,
        }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn value_at(&self, pointer: Point) -> f64 {
        self.value_for_angle(self.center.angle_to(pointer))
    }

    pub fn value_for_angle(&self, angle: f64) -> f64 {
        let span = self.span();
        if span == 0.0 {
            return 0.0;
        }
        let relative = normalize_signed_degrees(angle - self.start);
        (relative / span).clamp(0.0, 1.0)
    }

    pub fn angle_for(&self, value: f64) -> f64 {
        self.start + self.span() * value.clamp(0.0, 1.0)
    }

    pub fn knob_center(&self, value: f64) -> Point {
        self.center + polar_offset(self.angle_for(value), self.radius)
    }

    pub fn close_button_center(&self) -> Point {
        self.center + polar_offset(self.button_angle, self.radius)
    }

    pub fn hits_close_button(&self, p: Point) -> bool {
        p.distance_to(self.close_button_center()) <= CLOSE_BUTTON_RADIUS
    }

    /// True inside the stroked track, including its round caps.
    pub fn hits_track(&self, p: Point) -> bool {
        let half = TRACK_WIDTH / 2.0;
        let dist = p.distance_to(self.center);
        if (dist - self.radius).abs() > half {
            return false;
        }
        let relative = normalize_signed_degrees(self.center.angle_to(p) - self.start);
        let (lo, hi) = if self.span() >= 0.0 {
            (0.0, self.span())
        } else {
            (self.span(), 0.0)
        };
        if (lo..=hi).contains(&relative) {
            return true;
        }
        [self.start, self.end]
            .iter()
            .any(|&a| p.distance_to(self.center + polar_offset(a, self.radius)) <= half)
    }

    pub fn track(&self) -> ArcPath {
        ArcPath::new(self.center, self.radius, self.start, self.end)
    }

    pub fn filled(&self, value: f64) -> ArcPath {
        ArcPath::new(self.center, self.radius, self.start, self.angle_for(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ITEM_COUNT;
    use crate::geometry::Viewport;
    use crate::layout::resolve;

    fn arcs() -> Vec<VolumeArc> {
        let view = Viewport::new(1920.0, 1080.0);
        [
            (960.0, 540.0),
            (50.0, 50.0),
            (1900.0, 20.0),
            (960.0, 20.0),
            (20.0, 540.0),
            (1900.0, 540.0),
            (960.0, 1060.0),
            (20.0, 1060.0),
        ]
        .into_iter()
        .map(|(x, y)| {
            let anchor = Point::new(x, y);
            VolumeArc::new(anchor, &resolve(anchor, view), ITEM_COUNT)
        })
        .collect()
    }

    fn at_angle(arc: &VolumeArc, angle: f64) -> Point {
        arc.center + polar_offset(angle, arc.radius)
    }

    #[test]
    fn test_endpoints_map_to_zero_and_one() {
        for arc in arcs() {
            assert!(arc.value_at(at_angle(&arc, arc.start)).abs() < 1e-9);
            assert!((arc.value_at(at_angle(&arc, arc.end)) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_value_is_monotonic() {
        for arc in arcs() {
            let mut last = -1.0;
            for i in 0..=50 {
                let angle = arc.start + arc.span() * i as f64 / 50.0;
                let v = arc.value_at(at_angle(&arc, angle));
                assert!(v >= last, "{:?} at {}", arc, angle);
                last = v;
            }
        }
    }

    #[test]
    fn test_outside_span_is_clamped() {
        let arc = arcs()[0];
        assert_eq!(arc.value_at(at_angle(&arc, arc.start - 30.0)), 0.0);
        assert_eq!(arc.value_at(at_angle(&arc, arc.end + 10.0)), 1.0);
    }

    #[test]
    fn test_center_layout_geometry() {
        let arc = arcs()[0];
        // 180..360 across 5 items: 45 degree steps
        assert_eq!(arc.start, 180.0);
        assert_eq!(arc.end, 360.0 - 45.0 * CLOSE_GAP_STEPS);
        assert_eq!(arc.button_angle, 360.0);
    }

    #[test]
    fn test_close_button_is_separate_from_track() {
        for arc in arcs() {
            let button = arc.close_button_center();
            assert!(arc.hits_close_button(button));
            assert!(!arc.hits_track(button));
            assert!(arc.hits_track(arc.knob_center(INITIAL_VOLUME)));
            assert!(!arc.hits_track(arc.center));
        }
    }
}
