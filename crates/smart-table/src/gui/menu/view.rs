use super::{HINT_FONT_SIZE, ICON_FILL, ItemSkin, LABEL_FONT_SIZE};
use crate::gui::theme::{self, ThemeColors};
use cairo::Context;
use gdk4::prelude::*;
use gdk_pixbuf::Pixbuf;
use smartmenu::catalog::{self, DETAIL_ACTION_COUNT};
use smartmenu::geometry::{ArcPath, Point, Rect};
use smartmenu::layout::ITEM_SIZE;
use smartmenu::menu::{DETAIL_ACTION_SIZE, DetailPanel, Level, MenuState, Phase};
use smartmenu::table::HANDLE_RADIUS;
use smartmenu::volume::{CLOSE_BUTTON_RADIUS, KNOB_RADIUS, TRACK_WIDTH, VolumeArc};
use smartmenu::{ItemId, SmartTable};
use std::f64::consts::TAU;
use std::time::Instant;

const CORNER_DECOR: f64 = 24.0;
const CORNER_RADIUS: f64 = 12.0;

struct ItemRenderer<'a> {
    skin: &'a ItemSkin,
    center: Point,
    radius: f64,
    opacity: f64,
    active: bool,
}

impl ItemRenderer<'_> {
    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        if self.radius <= 0.0 || self.opacity <= 0.0 {
            return Ok(());
        }
        self.draw_bubble(cr, colors)?;
        match &self.skin.pixbuf {
            Some(pixbuf) => self.draw_icon(cr, pixbuf),
            None => draw_centered_text(
                cr,
                &self.skin.label,
                self.center,
                LABEL_FONT_SIZE * self.radius / (ITEM_SIZE / 2.0),
                colors,
                self.opacity,
            ),
        }
    }

    fn draw_bubble(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let fill = if self.active { colors.accent } else { colors.glass };
        theme::set_source(cr, fill, self.opacity);
        cr.new_path();
        cr.arc(self.center.x, self.center.y, self.radius, 0.0, TAU);
        cr.fill_preserve()?;
        theme::set_source(cr, colors.glass_border, self.opacity);
        cr.set_line_width(1.5);
        cr.stroke()
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        let target = self.radius * 2.0 * ICON_FILL;
        let icon_scale = target / pixbuf.width().max(pixbuf.height()).max(1) as f64;
        let (iw, ih) = (
            pixbuf.width() as f64 * icon_scale,
            pixbuf.height() as f64 * icon_scale,
        );

        cr.save()?;
        cr.translate(self.center.x - iw / 2.0, self.center.y - ih / 2.0);
        cr.scale(icon_scale, icon_scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint_with_alpha(self.opacity.clamp(0.0, 1.0))?;
        cr.restore()
    }
}

fn draw_centered_text(
    cr: &Context,
    text: &str,
    at: Point,
    size: f64,
    colors: &ThemeColors,
    opacity: f64,
) -> Result<(), cairo::Error> {
    theme::set_source(cr, colors.foreground, opacity);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(size);
    let ext = cr.text_extents(text)?;
    cr.move_to(
        at.x - ext.width() / 2.0 - ext.x_bearing(),
        at.y - ext.height() / 2.0 - ext.y_bearing(),
    );
    cr.show_text(text)
}

fn path_arc(cr: &Context, arc: &ArcPath) {
    let (start, end) = (arc.start.to_radians(), arc.end.to_radians());
    if arc.sweeps_positive() {
        cr.arc(arc.center.x, arc.center.y, arc.radius, start, end);
    } else {
        cr.arc_negative(arc.center.x, arc.center.y, arc.radius, start, end);
    }
}

fn rounded_rect(cr: &Context, rect: &Rect, r: f64) {
    let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -TAU / 4.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, TAU / 4.0);
    cr.arc(x + r, y + h - r, r, TAU / 4.0, TAU / 2.0);
    cr.arc(x + r, y + r, r, TAU / 2.0, TAU * 0.75);
    cr.close_path();
}

fn draw_items(
    cr: &Context,
    menu: &MenuState,
    skins: &[ItemSkin],
    colors: &ThemeColors,
    now: Instant,
) -> Result<(), cairo::Error> {
    let anchor = menu.anchor();
    let active = menu.active_item();
    for skin in skins {
        let index = skin.id.index();
        let placement = menu.placement(index);
        let progress = menu.entrance(index, now);
        ItemRenderer {
            skin,
            center: anchor + Point::new(placement.offset.x * progress, placement.offset.y * progress),
            radius: placement.radius() * progress.clamp(0.0, 1.2),
            opacity: placement.opacity * progress.clamp(0.0, 1.0),
            active: active == Some(skin.id),
        }
        .draw(cr, colors)?;
    }
    Ok(())
}

fn draw_handle(cr: &Context, anchor: Point, colors: &ThemeColors) -> Result<(), cairo::Error> {
    theme::set_source(cr, colors.glass, 1.0);
    cr.new_path();
    cr.arc(anchor.x, anchor.y, HANDLE_RADIUS / 2.0, 0.0, TAU);
    cr.fill_preserve()?;
    theme::set_source(cr, colors.accent, 0.8);
    cr.set_line_width(2.0);
    cr.stroke()?;

    theme::set_source(cr, colors.accent, 1.0);
    cr.arc(anchor.x, anchor.y, 6.0, 0.0, TAU);
    cr.fill()
}

fn draw_detail_panel(
    cr: &Context,
    panel: &DetailPanel,
    item: ItemId,
    skins: &[ItemSkin],
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let stage = panel.stage;
    theme::set_source(cr, colors.panel, 1.0);
    rounded_rect(cr, &stage, CORNER_RADIUS);
    cr.fill_preserve()?;
    theme::set_source(cr, colors.glass_border, 1.0);
    cr.set_line_width(1.0);
    cr.stroke()?;

    draw_corner_decor(cr, &stage, colors)?;

    let label = skins
        .iter()
        .find(|skin| skin.id == item)
        .map_or(catalog::item(item).label, |skin| skin.label.as_str());
    draw_centered_text(cr, label, stage.center(), LABEL_FONT_SIZE * 2.0, colors, 0.6)?;

    let actions = catalog::detail_actions(item);
    for (center, action) in panel.actions.iter().zip(actions.iter()).take(DETAIL_ACTION_COUNT) {
        theme::set_source(cr, colors.glass, 1.0);
        cr.new_path();
        cr.arc(center.x, center.y, DETAIL_ACTION_SIZE / 2.0, 0.0, TAU);
        cr.fill_preserve()?;
        theme::set_source(cr, colors.glass_border, 1.0);
        cr.stroke()?;
        draw_centered_text(cr, action.label, *center, LABEL_FONT_SIZE * 0.85, colors, 0.9)?;
    }
    Ok(())
}

fn draw_corner_decor(cr: &Context, stage: &Rect, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let inset = 12.0;
    let (l, t) = (stage.x + inset, stage.y + inset);
    let (r, b) = (stage.x + stage.width - inset, stage.y + stage.height - inset);
    theme::set_source(cr, colors.accent, 0.6);
    cr.set_line_width(2.0);
    for (x, y, dx, dy) in [(l, t, 1.0, 1.0), (r, t, -1.0, 1.0), (r, b, -1.0, -1.0), (l, b, 1.0, -1.0)] {
        cr.move_to(x + dx * CORNER_DECOR, y);
        cr.line_to(x, y);
        cr.line_to(x, y + dy * CORNER_DECOR);
    }
    cr.stroke()
}

fn draw_volume(cr: &Context, arc: &VolumeArc, value: f64, colors: &ThemeColors) -> Result<(), cairo::Error> {
    cr.set_line_cap(cairo::LineCap::Round);
    cr.set_line_width(TRACK_WIDTH);

    theme::set_source(cr, colors.track, 1.0);
    cr.new_path();
    path_arc(cr, &arc.track());
    cr.stroke()?;

    if value > 0.0 {
        theme::set_source(cr, colors.accent, 0.85);
        cr.new_path();
        path_arc(cr, &arc.filled(value));
        cr.stroke()?;
    }

    let knob = arc.knob_center(value);
    theme::set_source(cr, colors.foreground, 1.0);
    cr.new_path();
    cr.arc(knob.x, knob.y, KNOB_RADIUS * 0.75, 0.0, TAU);
    cr.fill()?;

    let percent = format!("{:.0}%", value * 100.0);
    draw_centered_text(cr, &percent, arc.center, LABEL_FONT_SIZE * 1.5, colors, 1.0)?;

    draw_close_button(cr, arc.close_button_center(), colors)
}

fn draw_close_button(cr: &Context, center: Point, colors: &ThemeColors) -> Result<(), cairo::Error> {
    theme::set_source(cr, colors.glass, 1.0);
    cr.new_path();
    cr.arc(center.x, center.y, CLOSE_BUTTON_RADIUS, 0.0, TAU);
    cr.fill()?;

    let arm = CLOSE_BUTTON_RADIUS * 0.35;
    theme::set_source(cr, colors.foreground, 1.0);
    cr.set_line_width(3.0);
    cr.set_line_cap(cairo::LineCap::Round);
    cr.move_to(center.x - arm, center.y - arm);
    cr.line_to(center.x + arm, center.y + arm);
    cr.move_to(center.x + arm, center.y - arm);
    cr.line_to(center.x - arm, center.y + arm);
    cr.stroke()
}

/// Draws the menu. While charging the items fly out but the handle stays hidden.
pub fn draw(
    cr: &Context,
    table: &SmartTable,
    skins: &[ItemSkin],
    colors: &ThemeColors,
    now: Instant,
) -> Result<(), cairo::Error> {
    let menu = table.menu();
    let level = match menu.phase() {
        Phase::Closed => return Ok(()),
        Phase::Charging => return draw_items(cr, menu, skins, colors, now),
        Phase::Locked(level) => level,
    };

    match level {
        Level::Volume => {
            let value = menu.volume_level().unwrap_or_default();
            draw_volume(cr, &menu.volume_arc(), value, colors)?;
        }
        Level::Detail(item) => {
            if let Some(panel) = menu.detail_panel() {
                draw_detail_panel(cr, &panel, item, skins, colors)?;
            }
            draw_items(cr, menu, skins, colors, now)?;
        }
        Level::Radial => draw_items(cr, menu, skins, colors, now)?,
    }

    if menu.can_drag() {
        draw_handle(cr, menu.anchor(), colors)?;
    }
    Ok(())
}

pub fn draw_hint(
    cr: &Context,
    text: &str,
    width: f64,
    height: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    draw_centered_text(
        cr,
        text,
        Point::new(width / 2.0, height - 48.0),
        HINT_FONT_SIZE,
        colors,
        0.45,
    )
}
