use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub accent: Srgba<f64>,
    pub glass: Srgba<f64>,
    pub glass_border: Srgba<f64>,
    pub foreground: Srgba<f64>,
    pub panel: Srgba<f64>,
    pub track: Srgba<f64>,
    pub effect: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            accent: Self::lookup_color(
                context,
                "accent_color",
                Srgba::new(0.96, 0.62, 0.04, 1.0),
                None,
            ),
            glass: Self::lookup_color(
                context,
                "smart_table_glass",
                Srgba::new(0.08, 0.06, 0.05, 0.55),
                None,
            ),
            glass_border: Srgba::new(1.0, 1.0, 1.0, 0.18),
            foreground: Self::lookup_color(
                context,
                "smart_table_fg",
                Srgba::new(1.0, 1.0, 1.0, 0.92),
                None,
            ),
            panel: Self::lookup_color(
                context,
                "smart_table_panel",
                Srgba::new(0.05, 0.04, 0.03, 0.7),
                Some(0.7),
            ),
            track: Srgba::new(1.0, 1.0, 1.0, 0.12),
            effect: Srgba::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

/// Sets `color` on the context with its alpha scaled by `opacity`.
pub fn set_source(cr: &cairo::Context, color: Srgba<f64>, opacity: f64) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a * opacity.clamp(0.0, 1.0));
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
@define-color smart_table_glass rgba(20, 15, 12, 0.55);
@define-color smart_table_fg rgba(255, 255, 255, 0.92);
@define-color smart_table_panel rgba(12, 10, 8, 0.7);

.smart-table-window, .smart-table-surface {
    background: none;
    background-color: #1a0f0a;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
