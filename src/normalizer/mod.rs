use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::app::Result;
use crate::domain::{Article, Author, ContentId, Video};

/// Host prepended to a video's relative `path`.
pub const DEV_TO_HOST: &str = "https://dev.to";

#[derive(Debug, Deserialize)]
struct ApiUser {
    name: String,
    #[serde(default)]
    profile_image_90: String,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    id: ContentId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    readable_publish_date: String,
    published_at: Option<DateTime<Utc>>,
    cover_image: Option<String>,
    canonical_url: String,
    user: ApiUser,
    #[serde(default)]
    tag_list: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiVideoUser {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiVideo {
    id: ContentId,
    title: String,
    path: String,
    #[serde(default)]
    video_duration_in_minutes: String,
    #[serde(default)]
    cloudinary_video_url: String,
    #[serde(default)]
    video_source_url: String,
    user: ApiVideoUser,
}

impl From<ApiArticle> for Article {
    fn from(api: ApiArticle) -> Self {
        Self {
            id: api.id,
            title: api.title,
            description: api.description,
            readable_publish_date: api.readable_publish_date,
            published_at: api.published_at,
            cover_image: api.cover_image.filter(|c| !c.is_empty()),
            url: api.canonical_url,
            author: Author {
                name: api.user.name,
                image_uri: api.user.profile_image_90,
            },
            tags: api.tag_list,
        }
    }
}

impl From<ApiVideo> for Video {
    fn from(api: ApiVideo) -> Self {
        Self {
            id: api.id,
            title: api.title,
            duration: api.video_duration_in_minutes,
            cover_image: api.cloudinary_video_url,
            author_name: api.user.name,
            url: format!("{}{}", DEV_TO_HOST, api.path),
            source: api.video_source_url,
        }
    }
}

/// Decodes a dev.to list response body into domain items.
///
/// Implemented per item kind so the HTTP client can stay generic over the
/// kind it fetches.
pub trait Normalize: Sized {
    fn normalize(body: &[u8]) -> Result<Vec<Self>>;
}

impl Normalize for Article {
    fn normalize(body: &[u8]) -> Result<Vec<Self>> {
        let items: Vec<ApiArticle> = serde_json::from_slice(body)?;
        Ok(items.into_iter().map(Article::from).collect())
    }
}

impl Normalize for Video {
    fn normalize(body: &[u8]) -> Result<Vec<Self>> {
        let items: Vec<ApiVideo> = serde_json::from_slice(body)?;
        Ok(items.into_iter().map(Video::from).collect())
    }
}
