mod store;

pub use store::{AddOutcome, BookmarkStore, Toggle, BOOKMARKS_KEY, MAX_BOOKMARKS};
