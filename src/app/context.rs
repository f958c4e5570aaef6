use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{DevfeedError, Result};
use crate::bookmarks::BookmarkStore;
use crate::config::Config;
use crate::domain::{Article, Video};
use crate::feed::FeedController;
use crate::fetcher::http_client::HttpContentClient;
use crate::fetcher::ContentClient;
use crate::store::{KeyValuePersistence, MemoryKv, SqliteKv};

/// Composition root: builds controllers with their collaborators injected.
pub struct AppContext {
    pub config: Config,
    pub articles: Arc<dyn ContentClient<Article> + Send + Sync>,
    pub videos: Arc<dyn ContentClient<Video> + Send + Sync>,
    pub persistence: Arc<dyn KeyValuePersistence + Send + Sync>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = match config.bookmarks.database.clone() {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let persistence: Arc<dyn KeyValuePersistence + Send + Sync> =
            Arc::new(SqliteKv::new(&db_path)?);
        Self::with_persistence(config, persistence)
    }

    /// Context whose bookmarks live only for the lifetime of the process.
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::with_persistence(config, Arc::new(MemoryKv::new()))
    }

    fn with_persistence(
        config: Config,
        persistence: Arc<dyn KeyValuePersistence + Send + Sync>,
    ) -> Result<Self> {
        let articles: Arc<dyn ContentClient<Article> + Send + Sync> =
            Arc::new(HttpContentClient::<Article>::new(&config.api)?);
        let videos: Arc<dyn ContentClient<Video> + Send + Sync> =
            Arc::new(HttpContentClient::<Video>::new(&config.api)?);

        Ok(Self {
            config,
            articles,
            videos,
            persistence,
        })
    }

    pub fn article_feed(&self) -> FeedController<Article> {
        FeedController::new(self.articles.clone(), self.config.api.page_size)
    }

    pub fn video_feed(&self) -> FeedController<Video> {
        FeedController::new(self.videos.clone(), self.config.api.page_size)
    }

    pub fn bookmarks(&self) -> Result<BookmarkStore> {
        BookmarkStore::load(self.persistence.clone())
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| DevfeedError::Config("Could not find data directory".into()))?;
        let devfeed_dir = data_dir.join("devfeed");
        std::fs::create_dir_all(&devfeed_dir)?;
        Ok(devfeed_dir.join("devfeed.db"))
    }
}
