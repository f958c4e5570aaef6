use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Author, BookmarkItem, ContentId, FeedItem};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ContentId,
    pub title: String,
    pub description: String,
    pub readable_publish_date: String,
    pub published_at: Option<DateTime<Utc>>,
    pub cover_image: Option<String>,
    pub url: String,
    pub author: Author,
    pub tags: Vec<String>,
}

impl Article {
    /// Tags rendered the way the feed card shows them (`#rust #async`).
    pub fn display_tags(&self) -> String {
        self.tags
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_bookmark(&self) -> BookmarkItem {
        BookmarkItem {
            id: self.id,
            title: self.title.clone(),
            url: self.url.clone(),
            author: self.author.clone(),
        }
    }
}

impl FeedItem for Article {
    fn id(&self) -> ContentId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}
