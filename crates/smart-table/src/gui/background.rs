//! Procedural walnut table top.

use cairo::{Context, LinearGradient, RadialGradient};

const GRAIN_LINES: usize = 140;
const BASE_STOPS: [(f64, (f64, f64, f64)); 4] = [
    (0.0, (0.24, 0.14, 0.09)),
    (0.35, (0.31, 0.19, 0.12)),
    (0.7, (0.22, 0.13, 0.08)),
    (1.0, (0.27, 0.16, 0.10)),
];

/// Deterministic noise in `0..1` so the grain is identical on every frame.
fn noise(seed: usize) -> f64 {
    let x = (seed as f64 * 12.9898).sin() * 43758.5453;
    x - x.floor()
}

pub fn draw(cr: &Context, width: f64, height: f64) -> Result<(), cairo::Error> {
    let base = LinearGradient::new(0.0, 0.0, width, height);
    for (offset, (r, g, b)) in BASE_STOPS {
        base.add_color_stop_rgb(offset, r, g, b);
    }
    cr.set_source(&base)?;
    cr.paint()?;

    draw_grain(cr, width, height)?;
    draw_vignette(cr, width, height)
}

fn draw_grain(cr: &Context, width: f64, height: f64) -> Result<(), cairo::Error> {
    cr.save()?;
    for i in 0..GRAIN_LINES {
        let y = height * i as f64 / GRAIN_LINES as f64 + noise(i) * 6.0;
        let amplitude = 2.0 + noise(i + 1000) * 10.0;
        let wavelength = 300.0 + noise(i + 2000) * 500.0;
        let dark = noise(i + 3000) > 0.5;

        if dark {
            cr.set_source_rgba(0.08, 0.04, 0.02, 0.10 + noise(i + 4000) * 0.12);
        } else {
            cr.set_source_rgba(0.55, 0.36, 0.22, 0.04 + noise(i + 4000) * 0.06);
        }
        cr.set_line_width(0.5 + noise(i + 5000) * 2.0);

        cr.move_to(0.0, y);
        let mut x = 0.0;
        while x < width {
            x += 24.0;
            let wave = (x / wavelength * std::f64::consts::TAU + i as f64).sin();
            cr.line_to(x, y + wave * amplitude);
        }
        cr.stroke()?;
    }
    cr.restore()
}

fn draw_vignette(cr: &Context, width: f64, height: f64) -> Result<(), cairo::Error> {
    let (cx, cy) = (width / 2.0, height / 2.0);
    let outer = cx.hypot(cy);
    let vignette = RadialGradient::new(cx, cy, outer * 0.35, cx, cy, outer);
    vignette.add_color_stop_rgba(0.0, 0.0, 0.0, 0.0, 0.0);
    vignette.add_color_stop_rgba(1.0, 0.0, 0.0, 0.0, 0.55);
    cr.set_source(&vignette)?;
    cr.paint()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_stable_and_bounded() {
        for seed in 0..500 {
            let n = noise(seed);
            assert!((0.0..1.0).contains(&n));
            assert_eq!(n, noise(seed));
        }
    }

    #[test]
    fn test_draws_onto_image_surface() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 320, 200).unwrap();
        let cr = Context::new(&surface).unwrap();
        draw(&cr, 320.0, 200.0).unwrap();
    }
}
