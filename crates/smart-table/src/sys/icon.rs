use derive_more::{AsRef, Deref, Display, From, Into};
use freedesktop_icons::lookup;
use gdk_pixbuf::Pixbuf;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

pub const ICON_SIZE: i32 = 128;

/// Resolves a theme icon name, or an absolute path to an image file.
pub fn find_icon_path(icon_name: &IconName) -> Option<PathBuf> {
    if icon_name.is_blank() {
        return None;
    }

    let path = Path::new(icon_name.as_ref());
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    lookup(icon_name.as_ref())
        .with_size(ICON_SIZE as u16)
        .with_scale(1)
        .find()
}

pub fn load_icon(icon_name: &IconName) -> Option<Pixbuf> {
    let path = find_icon_path(icon_name)?;
    match Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true) {
        Ok(pixbuf) => Some(pixbuf),
        Err(e) => {
            log::warn!("Failed to load icon {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_has_no_path() {
        assert_eq!(find_icon_path(&IconName::from("  ")), None);
    }

    #[test]
    fn test_missing_absolute_path() {
        let name = IconName::new("/nonexistent/smart-table/icon.png");
        assert_eq!(find_icon_path(&name), None);
    }

    #[test]
    fn test_icon_name_deserializes_transparently() {
        let name: IconName = serde_json::from_str("\"audio-volume-high\"").unwrap();
        assert_eq!(*name, "audio-volume-high");
    }
}
