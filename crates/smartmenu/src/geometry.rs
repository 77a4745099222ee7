use std::ops::{Add, Sub};
use strum::{Display as StrumDisplay, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Screen-space angle (degrees, y grows downwards) from `self` towards `other`.
    pub fn angle_to(self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Offset of a point at `radius` along `angle_deg`, relative to the origin.
pub fn polar_offset(angle_deg: f64, radius: f64) -> Point {
    let rad = angle_deg.to_radians();
    Point::new(rad.cos() * radius, rad.sin() * radius)
}

/// Wraps an angle into `(-180, 180]`.
pub fn normalize_signed_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// A circular arc between two angles, described the way an SVG `A` command
/// (or a cairo `arc`/`arc_negative` pair) needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    pub center: Point,
    pub radius: f64,
    pub start: f64,
    pub end: f64,
}

impl ArcPath {
    pub fn new(center: Point, radius: f64, start: f64, end: f64) -> Self {
        Self {
            center,
            radius,
            start,
            end,
        }
    }

    pub fn start_point(&self) -> Point {
        self.center + polar_offset(self.start, self.radius)
    }

    pub fn end_point(&self) -> Point {
        self.center + polar_offset(self.end, self.radius)
    }

    pub fn sweeps_positive(&self) -> bool {
        self.end > self.start
    }

    pub fn large_arc(&self) -> bool {
        (self.end - self.start).abs() > 180.0
    }

    pub fn svg_path(&self) -> String {
        let (s, e) = (self.start_point(), self.end_point());
        format!(
            "M {} {} A {} {} 0 {} {} {} {}",
            s.x,
            s.y,
            self.radius,
            self.radius,
            u8::from(self.large_arc()),
            u8::from(self.sweeps_positive()),
            e.x,
            e.y
        )
    }
}

/// Where a point sits relative to the viewport edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, StrumDisplay)]
pub enum Zone {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

impl Zone {
    pub fn classify(p: Point, viewport: Viewport, threshold: f64) -> Self {
        let top = p.y < threshold;
        let bottom = p.y > viewport.height - threshold;
        let left = p.x < threshold;
        let right = p.x > viewport.width - threshold;

        match (top, bottom, left, right) {
            (true, _, true, _) => Self::TopLeft,
            (true, _, _, true) => Self::TopRight,
            (_, true, _, true) => Self::BottomRight,
            (_, true, true, _) => Self::BottomLeft,
            (true, ..) => Self::Top,
            (_, true, ..) => Self::Bottom,
            (_, _, true, _) => Self::Left,
            (_, _, _, true) => Self::Right,
            _ => Self::Center,
        }
    }
}
