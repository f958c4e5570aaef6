//! # devfeed
//!
//! Client core for the dev.to article and video feeds.
//!
//! ## Architecture
//!
//! ```text
//! ContentClient → Normalizer → FeedController → UI
//!                      BookmarkStore ⇄ KeyValuePersistence
//! ```
//!
//! - [`fetcher`]: HTTP client for paginated content
//! - [`normalizer`]: Converts API responses to domain models
//! - [`feed`]: Paginated feed state with refresh and infinite scroll
//! - [`bookmarks`]: Capacity-bounded saved items
//! - [`store`]: Local key-value persistence
//!
//! ## Quick Start
//!
//! ```bash
//! # Load two pages of articles
//! devfeed articles --pages 2
//!
//! # Bookmark an article from the loaded pages
//! devfeed articles --bookmark 1795123
//!
//! # List bookmarks
//! devfeed bookmarks list
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires controllers to their
/// collaborators: content clients and bookmark persistence.
pub mod app;

/// Capacity-bounded bookmark set.
///
/// - [`BookmarkStore`](bookmarks::BookmarkStore): add, remove, toggle, list
pub mod bookmarks;

/// Command-line interface using clap.
///
/// - `articles [--pages N] [--bookmark ID]` - Show the article feed
/// - `videos [--pages N]` - Show the video feed
/// - `bookmarks list|add|remove` - Manage bookmarks
pub mod cli;

/// Configuration loaded from `~/.config/devfeed/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Article`](domain::Article) and [`Video`](domain::Video): feed items
/// - [`BookmarkItem`](domain::BookmarkItem): a saved article reference
pub mod domain;

/// Paginated feed controller.
pub mod feed;

/// Content fetching.
///
/// - [`ContentClient`](fetcher::ContentClient): Async trait for page fetching
/// - [`HttpContentClient`](fetcher::http_client::HttpContentClient): reqwest-based implementation
pub mod fetcher;

/// dev.to API response decoding.
pub mod normalizer;

/// Key-value persistence.
///
/// - [`KeyValuePersistence`](store::KeyValuePersistence): storage trait
/// - [`SqliteKv`](store::SqliteKv): SQLite implementation
/// - [`MemoryKv`](store::MemoryKv): in-process implementation
pub mod store;
