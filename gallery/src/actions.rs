//! Gallery actions

use seal_viewer_api::ImageDescriptor;

/// All possible inputs to the gallery reducer
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryAction {
    /// The view became visible; run the auth guard once
    Mounted,

    /// The search key input changed
    SealIdChanged(String),

    /// Submit the current search key
    ///
    /// Re-validates token freshness before any network call, since the
    /// user may have idled past expiry since mount.
    Submit,

    /// A query resolved with a listing
    ///
    /// `seq` ties the response to the query that issued it; a stale
    /// sequence is dropped without touching the list.
    ImagesLoaded {
        /// Sequence number of the originating query
        seq: u64,
        /// The listing, in server order
        images: Vec<ImageDescriptor>,
    },

    /// A query failed
    SearchFailed {
        /// Sequence number of the originating query
        seq: u64,
        /// Human-readable failure message
        error: String,
    },

    /// Open the lightbox on the thumbnail at this index
    Select(usize),

    /// Move the lightbox cursor forward; clamps at the last index
    NextImage,

    /// Move the lightbox cursor backward; clamps at index zero
    PrevImage,

    /// Close the lightbox
    CloseLightbox,

    /// The UI shell performed the pending navigation
    NavigationHandled,
}
