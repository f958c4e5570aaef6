use crate::app::{AppContext, DevfeedError, Result};
use crate::bookmarks::{AddOutcome, Toggle};
use crate::domain::{BookmarkItem, ContentId, FeedItem};
use crate::feed::{FeedController, FetchOutcome};

pub const FEED_REFRESHED: &str = "Feed refreshed";
pub const BOOKMARK_ADDED: &str = "Bookmark saved";
pub const BOOKMARK_REMOVED: &str = "Bookmark removed";
pub const BOOKMARK_MAX_ERR: &str = "Maximum number of bookmarks reached";
pub const BOOKMARK_COMMON_ERR: &str = "Error while saving bookmark";
pub const NO_BOOKMARKS: &str = "It's void out there.....";

/// User-facing text for a failed bookmark mutation.
pub fn bookmark_error_message(err: &DevfeedError) -> &'static str {
    match err {
        DevfeedError::CapacityExceeded { .. } => BOOKMARK_MAX_ERR,
        _ => BOOKMARK_COMMON_ERR,
    }
}

/// Refresh, then keep loading until `pages` pages are in or a page adds nothing.
pub async fn load_pages<I: FeedItem>(feed: &FeedController<I>, pages: u32) -> Result<()> {
    feed.refresh().await?;
    println!("{}", FEED_REFRESHED);

    for _ in 1..pages {
        if let FetchOutcome::Applied { added: 0 } = feed.load_next().await? {
            break;
        }
    }

    Ok(())
}

pub async fn show_articles(
    ctx: &AppContext,
    pages: u32,
    bookmark: Option<ContentId>,
) -> Result<()> {
    let feed = ctx.article_feed();
    load_pages(&feed, pages).await?;

    let state = feed.snapshot();
    let mut bookmarks = ctx.bookmarks()?;

    for article in &state.items {
        let marker = if bookmarks.has(article.id) { "*" } else { " " };
        println!("{} [{}] {}", marker, article.id, article.title);
        println!(
            "      {} · {}  {}",
            article.author.name,
            article.readable_publish_date,
            article.display_tags()
        );
        println!("      {}", article.url);
    }
    println!("{} articles (page {})", state.items.len(), state.page);

    if let Some(id) = bookmark {
        let article = state
            .items
            .iter()
            .find(|a| a.id == id)
            .ok_or(DevfeedError::ItemNotFound(id))?;

        match bookmarks.toggle(article.to_bookmark()) {
            Ok(Toggle::Added) => println!("{}", BOOKMARK_ADDED),
            Ok(Toggle::Removed) => println!("{}", BOOKMARK_REMOVED),
            Err(e) => {
                eprintln!("{}: {}", bookmark_error_message(&e), e);
                return Err(e);
            }
        }
    }

    Ok(())
}

pub async fn show_videos(ctx: &AppContext, pages: u32) -> Result<()> {
    let feed = ctx.video_feed();
    load_pages(&feed, pages).await?;

    let state = feed.snapshot();
    for video in &state.items {
        println!("[{}] {} ({})", video.id, video.title, video.duration);
        println!("      {}  {}", video.author_name, video.url);
    }
    println!("{} videos (page {})", state.items.len(), state.page);

    Ok(())
}

pub fn list_bookmarks(ctx: &AppContext) -> Result<()> {
    let bookmarks = ctx.bookmarks()?;

    if bookmarks.is_empty() {
        println!("{}", NO_BOOKMARKS);
        return Ok(());
    }

    for item in bookmarks.list() {
        println!("[{}] {} by {}", item.id, item.title, item.author.name);
        println!("      {}", item.url);
    }
    println!("{}/{} bookmarks", bookmarks.len(), bookmarks.capacity());

    Ok(())
}

pub fn add_bookmark(ctx: &AppContext, item: BookmarkItem) -> Result<()> {
    let mut bookmarks = ctx.bookmarks()?;
    let id = item.id;

    match bookmarks.add(item) {
        Ok(AddOutcome::Added) => println!("{}", BOOKMARK_ADDED),
        Ok(AddOutcome::AlreadyPresent) => println!("Already bookmarked: {}", id),
        Err(e) => {
            eprintln!("{}: {}", bookmark_error_message(&e), e);
            return Err(e);
        }
    }

    Ok(())
}

pub fn toggle_bookmark(ctx: &AppContext, item: BookmarkItem) -> Result<Toggle> {
    let mut bookmarks = ctx.bookmarks()?;

    match bookmarks.toggle(item) {
        Ok(toggle) => {
            match toggle {
                Toggle::Added => println!("{}", BOOKMARK_ADDED),
                Toggle::Removed => println!("{}", BOOKMARK_REMOVED),
            }
            Ok(toggle)
        }
        Err(e) => {
            eprintln!("{}: {}", bookmark_error_message(&e), e);
            Err(e)
        }
    }
}

pub fn remove_bookmark(ctx: &AppContext, id: ContentId) -> Result<()> {
    let mut bookmarks = ctx.bookmarks()?;

    if bookmarks.remove(id)? {
        println!("{}", BOOKMARK_REMOVED);
    } else {
        println!("No bookmark with id {}", id);
    }

    Ok(())
}
