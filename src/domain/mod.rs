pub mod article;
pub mod bookmark;
pub mod video;

pub use article::Article;
pub use bookmark::{Author, BookmarkItem};
pub use video::Video;

/// Server-assigned identifier shared by articles, videos and bookmarks.
pub type ContentId = i64;

/// One unit of content in a paginated feed.
///
/// Identity is the `id`; two items with the same id are the same content
/// even when other fields differ between pages.
pub trait FeedItem: Clone + Send + Sync + 'static {
    fn id(&self) -> ContentId;
    fn title(&self) -> &str;
}
