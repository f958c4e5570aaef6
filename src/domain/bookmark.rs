use serde::{Deserialize, Serialize};

use crate::domain::ContentId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    pub image_uri: String,
}

/// A saved reference to an article. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkItem {
    pub id: ContentId,
    pub title: String,
    pub url: String,
    pub author: Author,
}
