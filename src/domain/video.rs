use serde::{Deserialize, Serialize};

use crate::domain::{ContentId, FeedItem};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: ContentId,
    pub title: String,
    /// Display duration as reported by the API, e.g. `"03:24"`.
    pub duration: String,
    pub cover_image: String,
    pub author_name: String,
    pub url: String,
    /// Playable stream URL.
    pub source: String,
}

impl FeedItem for Video {
    fn id(&self) -> ContentId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}
