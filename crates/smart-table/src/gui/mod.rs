pub mod app;
pub mod background;
pub mod effects;
pub mod menu;
pub mod theme;
pub mod timers;
pub mod window;
