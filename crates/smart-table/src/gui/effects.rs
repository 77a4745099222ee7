use crate::gui::theme::{self, ThemeColors};
use cairo::Context;
use smartmenu::effects::{SampledLayer, Shape};
use std::f64::consts::{FRAC_PI_2, TAU};

pub fn draw(cr: &Context, layers: &[SampledLayer], colors: &ThemeColors) -> Result<(), cairo::Error> {
    for layer in layers {
        draw_layer(cr, layer, colors)?;
    }
    Ok(())
}

fn draw_layer(cr: &Context, layer: &SampledLayer, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let SampledLayer {
        shape,
        center,
        radius,
        visual,
    } = *layer;
    theme::set_source(cr, colors.effect, visual.opacity);
    cr.new_path();

    match shape {
        Shape::Disc => {
            cr.arc(center.x, center.y, radius, 0.0, TAU);
            cr.fill()
        }
        Shape::Ring => {
            cr.set_line_width(visual.stroke.max(0.5));
            cr.arc(center.x, center.y, radius, 0.0, TAU);
            cr.stroke()
        }
        Shape::ProgressRing => {
            let progress = visual.progress.clamp(0.0, 1.0);
            if progress <= 0.0 {
                return Ok(());
            }
            theme::set_source(cr, colors.accent, visual.opacity);
            cr.set_line_width(visual.stroke.max(0.5));
            cr.set_line_cap(cairo::LineCap::Round);
            let start = -FRAC_PI_2;
            cr.arc(center.x, center.y, radius, start, start + TAU * progress);
            cr.stroke()
        }
    }
}
