//! Gallery view state

use crate::navigation::NavigationTarget;
use seal_viewer_api::ImageDescriptor;

/// State of the gallery view controller
///
/// The image list is replaced wholesale by each successful query and
/// emptied by a failed one; it is never merged. The cursor is cleared on
/// every replacement so it can never point outside the current list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryState {
    /// Current search key (the seal whose images are being browsed)
    pub seal_id: String,

    /// Images from the most recent successful query, in server order
    pub images: Vec<ImageDescriptor>,

    /// Lightbox cursor: an index into `images`, or `None` when closed
    pub selected: Option<usize>,

    /// Sequence number of the most recently issued query
    ///
    /// A response carrying an older sequence is dropped, so the list
    /// always reflects the last query issued, not the last to resolve.
    pub request_seq: u64,

    /// Navigation decision awaiting the UI shell, if any
    pub pending_navigation: Option<NavigationTarget>,

    /// Message from the most recent failed query, surfaced to the user
    pub last_error: Option<String>,
}

impl GalleryState {
    /// The image under the lightbox cursor, if one is open
    #[must_use]
    pub fn selected_image(&self) -> Option<&ImageDescriptor> {
        self.selected.and_then(|i| self.images.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str) -> ImageDescriptor {
        ImageDescriptor {
            name: name.to_string(),
            url: format!("https://signed/{name}"),
            size: 100,
            last_modified: None,
        }
    }

    #[test]
    fn selected_image_follows_cursor() {
        let state = GalleryState {
            images: vec![descriptor("a.jpg"), descriptor("b.jpg")],
            selected: Some(1),
            ..GalleryState::default()
        };
        assert_eq!(state.selected_image().map(|i| i.name.as_str()), Some("b.jpg"));
    }

    #[test]
    fn selected_image_is_none_when_closed() {
        let state = GalleryState {
            images: vec![descriptor("a.jpg")],
            ..GalleryState::default()
        };
        assert!(state.selected_image().is_none());
    }
}
