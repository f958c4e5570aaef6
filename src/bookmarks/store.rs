use std::collections::HashSet;
use std::sync::Arc;

use crate::app::{BookmarkOp, DevfeedError, Result};
use crate::domain::{BookmarkItem, ContentId};
use crate::store::KeyValuePersistence;

pub const MAX_BOOKMARKS: usize = 100;

/// Key under which the whole bookmark list is stored.
pub const BOOKMARKS_KEY: &str = "bookmarks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Capacity-bounded, insertion-ordered bookmarks mirrored to local storage.
///
/// Every mutation rewrites the full list under [`BOOKMARKS_KEY`] before it
/// returns. If that write fails the in-memory list is left as it was.
pub struct BookmarkStore {
    persistence: Arc<dyn KeyValuePersistence + Send + Sync>,
    entries: Vec<BookmarkItem>,
    capacity: usize,
}

impl BookmarkStore {
    pub fn load(persistence: Arc<dyn KeyValuePersistence + Send + Sync>) -> Result<Self> {
        Self::load_with_capacity(persistence, MAX_BOOKMARKS)
    }

    /// Stored lists longer than `capacity` are kept whole; adds fail until
    /// enough entries are removed.
    fn load_with_capacity(
        persistence: Arc<dyn KeyValuePersistence + Send + Sync>,
        capacity: usize,
    ) -> Result<Self> {
        let mut entries = match persistence.read(BOOKMARKS_KEY)? {
            Some(blob) => serde_json::from_slice::<Vec<BookmarkItem>>(&blob)
                .map_err(|e| DevfeedError::CorruptBookmarks(e.to_string()))?,
            None => Vec::new(),
        };

        let mut seen = HashSet::new();
        entries.retain(|entry| seen.insert(entry.id));

        if entries.len() > capacity {
            tracing::warn!(
                "Stored bookmarks exceed capacity ({} > {}), new bookmarks are refused",
                entries.len(),
                capacity
            );
        }

        tracing::debug!("Loaded {} bookmarks", entries.len());

        Ok(Self {
            persistence,
            entries,
            capacity,
        })
    }

    pub fn add(&mut self, item: BookmarkItem) -> Result<AddOutcome> {
        if self.has(item.id) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        if self.entries.len() >= self.capacity {
            return Err(DevfeedError::CapacityExceeded {
                id: item.id,
                capacity: self.capacity,
            });
        }

        let id = item.id;
        self.entries.push(item);

        if let Err(e) = self.persist() {
            self.entries.pop();
            return Err(persist_failed(BookmarkOp::Add, id, e));
        }

        tracing::info!("Bookmarked {} ({}/{})", id, self.entries.len(), self.capacity);
        Ok(AddOutcome::Added)
    }

    /// Remove the bookmark for `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: ContentId) -> Result<bool> {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        let removed = self.entries.remove(index);

        if let Err(e) = self.persist() {
            self.entries.insert(index, removed);
            return Err(persist_failed(BookmarkOp::Remove, id, e));
        }

        tracing::info!("Removed bookmark {}", id);
        Ok(true)
    }

    pub fn toggle(&mut self, item: BookmarkItem) -> Result<Toggle> {
        if self.remove(item.id)? {
            Ok(Toggle::Removed)
        } else {
            self.add(item)?;
            Ok(Toggle::Added)
        }
    }

    pub fn list(&self) -> &[BookmarkItem] {
        &self.entries
    }

    pub fn has(&self, id: ContentId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn persist(&self) -> Result<()> {
        let blob = serde_json::to_vec(&self.entries)?;
        self.persistence.write(BOOKMARKS_KEY, &blob)
    }
}

fn persist_failed(op: BookmarkOp, id: ContentId, source: DevfeedError) -> DevfeedError {
    tracing::warn!("Failed to persist bookmarks after {} of {}: {}", op, id, source);
    DevfeedError::BookmarkPersistFailed {
        op,
        id,
        source: Box::new(source),
    }
}
