//! Gesture and layout core of the smart table kiosk.
//!
//! Everything here is toolkit independent: time is passed in as [`Instant`]s
//! and long-press timers go through the [`gesture::Timers`] trait, so the
//! GTK shell and the tests drive the same code.
//!
//! [`Instant`]: std::time::Instant

pub mod capture;
pub mod catalog;
pub mod effects;
pub mod geometry;
pub mod gesture;
pub mod layout;
pub mod menu;
pub mod table;
pub mod volume;

pub use capture::PointerId;
pub use catalog::ItemId;
pub use geometry::{Point, Viewport};
pub use table::{Response, SmartTable};
