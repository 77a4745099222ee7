use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    AsRefStr,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemId {
    Apps,
    Car,
    Seat,
    Table,
    Volume,
}

impl ItemId {
    /// The volume entry opens the arc control instead of a detail panel.
    pub fn is_volume(&self) -> bool {
        matches!(self, Self::Volume)
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub id: ItemId,
    pub label: &'static str,
    pub icon: &'static str,
}

pub const MENU_ITEMS: [MenuItem; 5] = [
    MenuItem {
        id: ItemId::Apps,
        label: "Apps",
        icon: "view-app-grid-symbolic",
    },
    MenuItem {
        id: ItemId::Car,
        label: "Car",
        icon: "emblem-system-symbolic",
    },
    MenuItem {
        id: ItemId::Seat,
        label: "Seat",
        icon: "preferences-desktop-accessibility-symbolic",
    },
    MenuItem {
        id: ItemId::Table,
        label: "Table",
        icon: "view-grid-symbolic",
    },
    MenuItem {
        id: ItemId::Volume,
        label: "Volume",
        icon: "audio-volume-high-symbolic",
    },
];

pub const ITEM_COUNT: usize = MENU_ITEMS.len();

pub fn item(id: ItemId) -> &'static MenuItem {
    &MENU_ITEMS[id.index()]
}

pub fn items() -> impl Iterator<Item = &'static MenuItem> {
    ItemId::iter().map(item)
}

/// Placeholder control shown under a detail panel. Activating one does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailAction {
    pub label: &'static str,
    pub icon: &'static str,
}

const fn action(label: &'static str, icon: &'static str) -> DetailAction {
    DetailAction { label, icon }
}

pub const DETAIL_ACTION_COUNT: usize = 3;

pub fn detail_actions(id: ItemId) -> [DetailAction; DETAIL_ACTION_COUNT] {
    match id {
        ItemId::Seat => [
            action("Heat", "system-shutdown-symbolic"),
            action("Ventilate", "weather-windy-symbolic"),
            action("Massage", "preferences-desktop-accessibility-symbolic"),
        ],
        ItemId::Car => [
            action("Lock", "changes-prevent-symbolic"),
            action("Window", "weather-windy-symbolic"),
            action("Trunk", "emblem-system-symbolic"),
        ],
        _ => [
            action("Adjust", "preferences-system-symbolic"),
            action("Mode", "preferences-system-symbolic"),
            action("Settings", "preferences-system-symbolic"),
        ],
    }
}
