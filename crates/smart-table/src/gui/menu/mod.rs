pub mod view;

pub use view::draw;

use crate::config::Config;
use crate::sys::icon::{self, IconName};
use gdk_pixbuf::Pixbuf;
use smartmenu::ItemId;
use smartmenu::catalog;

pub const LABEL_FONT_SIZE: f64 = 13.0;
pub const HINT_FONT_SIZE: f64 = 14.0;
/// Fraction of the bubble diameter covered by its icon.
pub const ICON_FILL: f64 = 0.45;

/// How one catalog entry looks on screen.
pub struct ItemSkin {
    pub id: ItemId,
    pub label: String,
    pub pixbuf: Option<Pixbuf>,
}

impl ItemSkin {
    pub fn from_config(id: ItemId, config: &Config) -> Self {
        let overrides = config.item_overrides();
        let icon_name = overrides
            .get(&id)
            .and_then(|item| item.icon.clone())
            .unwrap_or_else(|| IconName::from(catalog::item(id).icon));
        Self {
            id,
            label: config.label_for(id),
            pixbuf: icon::load_icon(&icon_name),
        }
    }
}

/// Skins for every catalog entry, in catalog order.
pub fn skins(config: &Config) -> Vec<ItemSkin> {
    catalog::items()
        .map(|item| ItemSkin::from_config(item.id, config))
        .collect()
}
