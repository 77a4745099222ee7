pub mod haptics;
pub mod icon;
pub mod runtime;
