/// Events produced off the GTK thread and forwarded into the app component.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ConfigReload,
}
