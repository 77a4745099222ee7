use crate::config::{KioskConfig, SurfaceLayer};
use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};

const WINDOWED_SIZE: (i32, i32) = (1280, 720);

fn layer(layer: SurfaceLayer) -> Layer {
    match layer {
        SurfaceLayer::Background => Layer::Background,
        SurfaceLayer::Bottom => Layer::Bottom,
        SurfaceLayer::Top => Layer::Top,
        SurfaceLayer::Overlay => Layer::Overlay,
    }
}

pub fn init_layer_shell(window: &gtk::ApplicationWindow, surface_layer: SurfaceLayer) {
    window.init_layer_shell();
    window.set_layer(layer(surface_layer));
    window.set_namespace(Some("smart-table"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(KeyboardMode::OnDemand);
}

/// Covers the output: layer shell when the compositor has it, a fullscreen
/// toplevel otherwise. `windowed` is for development on a desktop.
pub fn init_kiosk(window: &gtk::ApplicationWindow, kiosk: &KioskConfig, windowed: bool) {
    if windowed {
        window.set_default_size(WINDOWED_SIZE.0, WINDOWED_SIZE.1);
        return;
    }

    if kiosk.layer_shell && gtk4_layer_shell::is_supported() {
        init_layer_shell(window, kiosk.layer);
        log::debug!("Using layer shell on the {} layer", kiosk.layer);
        return;
    }

    if kiosk.layer_shell {
        log::warn!("Layer shell is not supported by the compositor");
    }
    if kiosk.fullscreen {
        window.fullscreen();
    } else {
        window.set_default_size(WINDOWED_SIZE.0, WINDOWED_SIZE.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mapping() {
        assert_eq!(layer(SurfaceLayer::Overlay), Layer::Overlay);
        assert_eq!(layer(SurfaceLayer::Top), Layer::Top);
        assert_eq!(layer(SurfaceLayer::Background), Layer::Background);
    }
}
