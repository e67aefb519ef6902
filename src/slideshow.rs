//! Session-scoped store for the home view's slideshow.
//!
//! The gallery hands a selection of images to the home view through this
//! store. It lives for the process and is cleared on logout; without a
//! custom selection the slideshow falls back to the full gallery in random
//! order.

use crate::models::ImageRecord;

#[derive(Default)]
pub struct SlideshowStore {
    images: Option<Vec<ImageRecord>>,
}

impl SlideshowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slideshow selection
    pub fn set_images(&mut self, images: Vec<ImageRecord>) {
        self.images = Some(images);
    }

    /// The current selection, if one was made
    pub fn images(&self) -> Option<&[ImageRecord]> {
        self.images.as_deref()
    }

    /// Drop the selection, restoring the default random slideshow
    pub fn clear(&mut self) {
        self.images = None;
    }

    pub fn has_custom_selection(&self) -> bool {
        self.images.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: i64) -> ImageRecord {
        serde_json::from_str(&format!(
            r#"{{"id": {}, "originalFilename": "img{}.jpg"}}"#,
            id, id
        ))
        .unwrap()
    }

    #[test]
    fn test_selection_roundtrip() {
        let mut store = SlideshowStore::new();
        assert!(!store.has_custom_selection());
        assert!(store.images().is_none());

        store.set_images(vec![image(1), image(2)]);
        assert!(store.has_custom_selection());
        assert_eq!(store.images().unwrap().len(), 2);

        store.clear();
        assert!(!store.has_custom_selection());
        assert!(store.images().is_none());
    }
}
