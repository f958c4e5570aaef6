use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::app::{DevfeedError, FetchKind, Result};
use crate::domain::{ContentId, FeedItem};
use crate::feed::Liveness;
use crate::fetcher::ContentClient;

/// Read-only view of a feed for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState<I> {
    /// Page-then-server order, no two items share an id.
    pub items: Vec<I>,
    /// 1-based cursor of the last applied page.
    pub page: u32,
    pub loading: bool,
    pub refreshing: bool,
}

impl<I> Default for FeedState<I> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            loading: false,
            refreshing: false,
        }
    }
}

/// What a fetch operation did to the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was applied; `added` counts items that were new.
    Applied { added: usize },
    /// Another request of a guarded kind was outstanding. No request was issued.
    Busy,
    /// The owner tore the controller down before the response arrived.
    Discarded,
}

struct Inner<I> {
    state: FeedState<I>,
    seen: HashSet<ContentId>,
}

impl<I: FeedItem> Inner<I> {
    fn is_busy(&self) -> bool {
        self.state.loading || self.state.refreshing
    }

    fn append(&mut self, items: Vec<I>) -> usize {
        let before = self.state.items.len();
        for item in items {
            if self.seen.insert(item.id()) {
                self.state.items.push(item);
            } else {
                tracing::debug!("Skipping duplicate item {} ({})", item.id(), item.title());
            }
        }
        self.state.items.len() - before
    }

    fn replace(&mut self, items: Vec<I>) {
        self.state.items.clear();
        self.seen.clear();
        self.append(items);
    }
}

/// Clears a guard flag if the operation holding it never completes.
///
/// Dropping a `fetch_page`/`load_next`/`refresh` future mid-request would
/// otherwise leave `loading` or `refreshing` set for good.
struct InFlight<'a, I: FeedItem> {
    controller: &'a FeedController<I>,
    kind: FetchKind,
    armed: bool,
}

impl<'a, I: FeedItem> InFlight<'a, I> {
    fn new(controller: &'a FeedController<I>, kind: FetchKind) -> Self {
        Self {
            controller,
            kind,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<I: FeedItem> Drop for InFlight<'_, I> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::debug!("Abandoned {} request, releasing guard", self.kind);
        let mut inner = self.controller.lock();
        match self.kind {
            FetchKind::Page => inner.state.loading = false,
            FetchKind::Refresh => inner.state.refreshing = false,
        }
    }
}

/// Owns the paginated fetch state of one content list.
///
/// `loading` guards [`fetch_page`](Self::fetch_page) and
/// [`load_next`](Self::load_next), `refreshing` guards
/// [`refresh`](Self::refresh). Each guard is checked and set before the
/// request is issued, so a second call while one is outstanding returns
/// [`FetchOutcome::Busy`] instead of queueing. A call whose future is
/// dropped before completing releases its guard.
pub struct FeedController<I> {
    client: Arc<dyn ContentClient<I> + Send + Sync>,
    page_size: u32,
    inner: Mutex<Inner<I>>,
    liveness: Liveness,
}

impl<I: FeedItem> FeedController<I> {
    pub fn new(client: Arc<dyn ContentClient<I> + Send + Sync>, page_size: u32) -> Self {
        Self::with_liveness(client, page_size, Liveness::new())
    }

    /// Build a controller whose completions are gated on a caller-owned token.
    pub fn with_liveness(
        client: Arc<dyn ContentClient<I> + Send + Sync>,
        page_size: u32,
        liveness: Liveness,
    ) -> Self {
        Self {
            client,
            page_size,
            inner: Mutex::new(Inner {
                state: FeedState::default(),
                seen: HashSet::new(),
            }),
            liveness,
        }
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn snapshot(&self) -> FeedState<I> {
        self.lock().state.clone()
    }

    pub fn page(&self) -> u32 {
        self.lock().state.page
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().state.refreshing
    }

    /// Fetch `page` and append its unseen items.
    pub async fn fetch_page(&self, page: u32) -> Result<FetchOutcome> {
        if page == 0 {
            return Err(DevfeedError::InvalidPage(page));
        }

        {
            let mut inner = self.lock();
            if inner.is_busy() {
                tracing::debug!("Skipping page {}: request already in flight", page);
                return Ok(FetchOutcome::Busy);
            }
            inner.state.loading = true;
        }

        self.complete_page(page).await
    }

    /// Fetch the page after the current cursor. No-op while loading.
    pub async fn load_next(&self) -> Result<FetchOutcome> {
        let page = {
            let mut inner = self.lock();
            if inner.is_busy() {
                tracing::debug!("Skipping next page: request already in flight");
                return Ok(FetchOutcome::Busy);
            }
            let current = inner.state.page;
            let next = current
                .checked_add(1)
                .ok_or(DevfeedError::PageOverflow(current))?;
            inner.state.loading = true;
            next
        };

        self.complete_page(page).await
    }

    /// Refetch page 1 and replace the accumulated items with it.
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        {
            let mut inner = self.lock();
            if inner.is_busy() {
                tracing::debug!("Skipping refresh: request already in flight");
                return Ok(FetchOutcome::Busy);
            }
            inner.state.refreshing = true;
        }
        let mut in_flight = InFlight::new(self, FetchKind::Refresh);

        let result = self.client.fetch(1, self.page_size).await;
        in_flight.disarm();

        if !self.liveness.is_alive() {
            tracing::debug!("Dropping refresh response for torn down feed");
            return Ok(FetchOutcome::Discarded);
        }

        let mut inner = self.lock();
        inner.state.refreshing = false;

        match result {
            Ok(items) => {
                inner.replace(items);
                inner.state.page = 1;
                let count = inner.state.items.len();
                tracing::info!("Feed refreshed with {} items", count);
                Ok(FetchOutcome::Applied { added: count })
            }
            Err(e) => {
                tracing::warn!("Refresh failed: {}", e);
                Err(DevfeedError::FetchFailed {
                    kind: FetchKind::Refresh,
                    page: 1,
                    source: Box::new(e),
                })
            }
        }
    }

    /// Runs with `loading` already set by the caller.
    async fn complete_page(&self, page: u32) -> Result<FetchOutcome> {
        let mut in_flight = InFlight::new(self, FetchKind::Page);

        let result = self.client.fetch(page, self.page_size).await;
        in_flight.disarm();

        if !self.liveness.is_alive() {
            tracing::debug!("Dropping page {} response for torn down feed", page);
            return Ok(FetchOutcome::Discarded);
        }

        let mut inner = self.lock();
        inner.state.loading = false;

        match result {
            Ok(items) => {
                let added = inner.append(items);
                inner.state.page = page;
                tracing::info!("Added {} new items from page {}", added, page);
                Ok(FetchOutcome::Applied { added })
            }
            Err(e) => {
                tracing::warn!("Failed to load page {}: {}", page, e);
                Err(DevfeedError::FetchFailed {
                    kind: FetchKind::Page,
                    page,
                    source: Box::new(e),
                })
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<I>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: ContentId,
        title: String,
    }

    impl FeedItem for Entry {
        fn id(&self) -> ContentId {
            self.id
        }

        fn title(&self) -> &str {
            &self.title
        }
    }

    fn entries(ids: &[ContentId]) -> Vec<Entry> {
        ids.iter()
            .map(|&id| Entry {
                id,
                title: format!("Entry {}", id),
            })
            .collect()
    }

    fn ids(state: &FeedState<Entry>) -> Vec<ContentId> {
        state.items.iter().map(|e| e.id).collect()
    }

    /// Answers each page from a queue of canned responses; unknown pages are empty.
    #[derive(Default)]
    struct ScriptedClient {
        pages: Mutex<HashMap<u32, VecDeque<Result<Vec<Entry>>>>>,
        calls: Mutex<Vec<u32>>,
    }

    impl ScriptedClient {
        fn respond(&self, page: u32, ids: &[ContentId]) {
            self.pages
                .lock()
                .unwrap()
                .entry(page)
                .or_default()
                .push_back(Ok(entries(ids)));
        }

        fn fail(&self, page: u32) {
            self.pages
                .lock()
                .unwrap()
                .entry(page)
                .or_default()
                .push_back(Err(DevfeedError::Server {
                    status: 503,
                    url: format!("https://dev.to/api/articles?page={}", page),
                }));
        }

        fn calls(&self) -> Vec<u32> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentClient<Entry> for ScriptedClient {
        async fn fetch(&self, page: u32, _page_size: u32) -> Result<Vec<Entry>> {
            self.calls.lock().unwrap().push(page);
            self.pages
                .lock()
                .unwrap()
                .get_mut(&page)
                .and_then(|queue| queue.pop_front())
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    /// Holds every request until the test releases it.
    struct GatedClient {
        entered: Notify,
        release: Notify,
        calls: AtomicUsize,
        response: Vec<Entry>,
    }

    impl GatedClient {
        fn new(ids: &[ContentId]) -> Self {
            Self {
                entered: Notify::new(),
                release: Notify::new(),
                calls: AtomicUsize::new(0),
                response: entries(ids),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentClient<Entry> for GatedClient {
        async fn fetch(&self, _page: u32, _page_size: u32) -> Result<Vec<Entry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Ok(self.response.clone())
        }
    }

    #[test]
    fn test_initial_state() {
        let controller = FeedController::<Entry>::new(Arc::new(ScriptedClient::default()), 10);
        let state = controller.snapshot();
        assert!(state.items.is_empty());
        assert_eq!(state.page, 1);
        assert!(!state.loading);
        assert!(!state.refreshing);
    }

    #[tokio::test]
    async fn test_pages_accumulate_in_order() {
        let client = Arc::new(ScriptedClient::default());
        client.respond(1, &[1, 2, 3]);
        client.respond(2, &[4, 5]);
        client.respond(3, &[6]);
        let controller = FeedController::<Entry>::new(client.clone(), 10);

        controller.fetch_page(1).await.unwrap();
        controller.load_next().await.unwrap();
        controller.load_next().await.unwrap();

        let state = controller.snapshot();
        assert_eq!(ids(&state), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(state.page, 3);
        assert!(!state.loading);
        assert_eq!(client.calls(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_overlapping_pages_are_deduplicated() {
        let client = Arc::new(ScriptedClient::default());
        client.respond(1, &[1, 2]);
        client.respond(2, &[2, 3]);
        let controller = FeedController::<Entry>::new(client, 10);

        assert_eq!(
            controller.fetch_page(1).await.unwrap(),
            FetchOutcome::Applied { added: 2 }
        );
        assert_eq!(
            controller.fetch_page(2).await.unwrap(),
            FetchOutcome::Applied { added: 1 }
        );

        assert_eq!(ids(&controller.snapshot()), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_duplicates_within_one_page_keep_first() {
        let client = Arc::new(ScriptedClient::default());
        client.respond(1, &[7, 8, 7]);
        let controller = FeedController::<Entry>::new(client, 10);

        controller.fetch_page(1).await.unwrap();

        assert_eq!(ids(&controller.snapshot()), vec![7, 8]);
    }

    #[tokio::test]
    async fn test_page_zero_rejected() {
        let client = Arc::new(ScriptedClient::default());
        let controller = FeedController::<Entry>::new(client.clone(), 10);

        let result = controller.fetch_page(0).await;

        assert!(matches!(result, Err(DevfeedError::InvalidPage(0))));
        assert!(client.calls().is_empty());
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_failed_page_leaves_state_intact() {
        let client = Arc::new(ScriptedClient::default());
        client.respond(1, &[1, 2]);
        client.fail(2);
        let controller = FeedController::<Entry>::new(client, 10);
        controller.fetch_page(1).await.unwrap();

        let err = controller.load_next().await.unwrap_err();

        assert!(matches!(
            err,
            DevfeedError::FetchFailed {
                kind: FetchKind::Page,
                page: 2,
                ..
            }
        ));
        let state = controller.snapshot();
        assert_eq!(ids(&state), vec![1, 2]);
        assert_eq!(state.page, 1);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let client = Arc::new(ScriptedClient::default());
        client.fail(1);
        client.respond(1, &[1]);
        let controller = FeedController::<Entry>::new(client, 10);

        assert_err!(controller.fetch_page(1).await);
        let outcome = assert_ok!(controller.fetch_page(1).await);
        assert_eq!(outcome, FetchOutcome::Applied { added: 1 });
    }

    #[tokio::test]
    async fn test_empty_page_still_advances_cursor() {
        let client = Arc::new(ScriptedClient::default());
        client.respond(1, &[1]);
        let controller = FeedController::<Entry>::new(client, 10);
        controller.fetch_page(1).await.unwrap();

        let outcome = controller.load_next().await.unwrap();

        assert_eq!(outcome, FetchOutcome::Applied { added: 0 });
        assert_eq!(controller.page(), 2);
    }

    #[tokio::test]
    async fn test_refresh_replaces_items() {
        let client = Arc::new(ScriptedClient::default());
        client.respond(1, &[1, 2]);
        client.respond(2, &[3, 4]);
        client.respond(1, &[9, 1]);
        let controller = FeedController::<Entry>::new(client, 10);
        controller.fetch_page(1).await.unwrap();
        controller.load_next().await.unwrap();

        let outcome = controller.refresh().await.unwrap();

        assert_eq!(outcome, FetchOutcome::Applied { added: 2 });
        let state = controller.snapshot();
        assert_eq!(ids(&state), vec![9, 1]);
        assert_eq!(state.page, 1);
        assert!(!state.refreshing);
    }

    #[tokio::test]
    async fn test_load_next_after_refresh_starts_at_page_two() {
        let client = Arc::new(ScriptedClient::default());
        client.respond(1, &[1]);
        client.respond(2, &[2]);
        client.respond(3, &[3]);
        client.respond(1, &[1]);
        client.respond(2, &[2]);
        let controller = FeedController::<Entry>::new(client.clone(), 10);
        controller.fetch_page(1).await.unwrap();
        controller.load_next().await.unwrap();
        controller.load_next().await.unwrap();

        controller.refresh().await.unwrap();
        controller.load_next().await.unwrap();

        assert_eq!(ids(&controller.snapshot()), vec![1, 2]);
        assert_eq!(client.calls(), vec![1, 2, 3, 1, 2]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_items() {
        let client = Arc::new(ScriptedClient::default());
        client.respond(1, &[1, 2]);
        client.respond(2, &[3]);
        client.fail(1);
        let controller = FeedController::<Entry>::new(client, 10);
        controller.fetch_page(1).await.unwrap();
        controller.load_next().await.unwrap();

        let err = controller.refresh().await.unwrap_err();

        assert!(matches!(
            err,
            DevfeedError::FetchFailed {
                kind: FetchKind::Refresh,
                page: 1,
                ..
            }
        ));
        let state = controller.snapshot();
        assert_eq!(ids(&state), vec![1, 2, 3]);
        assert_eq!(state.page, 2);
        assert!(!state.refreshing);
    }

    #[tokio::test]
    async fn test_load_next_while_loading_is_noop() {
        let client = Arc::new(GatedClient::new(&[1, 2]));
        let controller = Arc::new(FeedController::<Entry>::new(client.clone(), 10));

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.load_next().await })
        };
        client.entered.notified().await;
        assert!(controller.is_loading());
        let before = controller.snapshot();

        assert_eq!(controller.load_next().await.unwrap(), FetchOutcome::Busy);
        assert_eq!(controller.fetch_page(5).await.unwrap(), FetchOutcome::Busy);
        assert_eq!(controller.snapshot(), before);
        assert_eq!(client.calls(), 1);

        client.release.notify_one();
        let outcome = pending.await.unwrap().unwrap();

        assert_eq!(outcome, FetchOutcome::Applied { added: 2 });
        assert_eq!(controller.page(), 2);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_refresh_while_refreshing_is_noop() {
        let client = Arc::new(GatedClient::new(&[1]));
        let controller = Arc::new(FeedController::<Entry>::new(client.clone(), 10));

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.refresh().await })
        };
        client.entered.notified().await;
        assert!(controller.is_refreshing());

        assert_eq!(controller.refresh().await.unwrap(), FetchOutcome::Busy);
        assert_eq!(controller.load_next().await.unwrap(), FetchOutcome::Busy);
        assert!(!controller.is_loading());
        assert_eq!(client.calls(), 1);

        client.release.notify_one();
        assert_eq!(
            pending.await.unwrap().unwrap(),
            FetchOutcome::Applied { added: 1 }
        );
    }

    #[tokio::test]
    async fn test_refresh_while_loading_is_noop() {
        let client = Arc::new(GatedClient::new(&[1]));
        let controller = Arc::new(FeedController::<Entry>::new(client.clone(), 10));

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.fetch_page(1).await })
        };
        client.entered.notified().await;

        assert_eq!(controller.refresh().await.unwrap(), FetchOutcome::Busy);
        assert!(!controller.is_refreshing());

        client.release.notify_one();
        pending.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_completion_after_teardown_is_discarded() {
        let client = Arc::new(GatedClient::new(&[1, 2, 3]));
        let liveness = Liveness::new();
        let controller = Arc::new(FeedController::<Entry>::with_liveness(
            client.clone(),
            10,
            liveness.clone(),
        ));

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.fetch_page(1).await })
        };
        client.entered.notified().await;

        liveness.teardown();
        client.release.notify_one();

        assert_eq!(pending.await.unwrap().unwrap(), FetchOutcome::Discarded);
        assert!(controller.snapshot().items.is_empty());
        assert!(!controller.liveness().is_alive());
    }

    #[tokio::test]
    async fn test_abandoned_load_releases_guard() {
        let client = Arc::new(GatedClient::new(&[1, 2]));
        let controller = FeedController::<Entry>::new(client.clone(), 10);

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), controller.load_next()).await;

        assert!(timed_out.is_err());
        assert!(!controller.is_loading());
        assert_eq!(controller.page(), 1);

        client.release.notify_one();
        let outcome = controller.load_next().await.unwrap();

        assert_eq!(outcome, FetchOutcome::Applied { added: 2 });
        assert_eq!(client.calls(), 2);
        assert_eq!(controller.page(), 2);
    }

    #[tokio::test]
    async fn test_abandoned_refresh_releases_guard() {
        let client = Arc::new(GatedClient::new(&[4]));
        let controller = FeedController::<Entry>::new(client.clone(), 10);

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), controller.refresh()).await;

        assert!(timed_out.is_err());
        assert!(!controller.is_refreshing());

        client.release.notify_one();
        assert_eq!(
            controller.refresh().await.unwrap(),
            FetchOutcome::Applied { added: 1 }
        );
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_load_next_past_last_page_number_fails() {
        let client = Arc::new(ScriptedClient::default());
        client.respond(u32::MAX, &[1]);
        let controller = FeedController::<Entry>::new(client.clone(), 10);
        controller.fetch_page(u32::MAX).await.unwrap();

        let result = controller.load_next().await;

        assert!(matches!(result, Err(DevfeedError::PageOverflow(u32::MAX))));
        assert!(!controller.is_loading());
        assert_eq!(controller.page(), u32::MAX);
        assert_eq!(client.calls(), vec![u32::MAX]);
    }

    #[tokio::test]
    async fn test_item_count_is_sum_of_disjoint_pages() {
        let client = Arc::new(ScriptedClient::default());
        let pages: Vec<Vec<ContentId>> = vec![
            (1..=10).collect(),
            (11..=20).collect(),
            (21..=24).collect(),
            Vec::new(),
            (25..=30).collect(),
        ];
        for (i, page_ids) in pages.iter().enumerate() {
            client.respond(i as u32 + 1, page_ids);
        }
        let controller = FeedController::<Entry>::new(client, 10);

        controller.fetch_page(1).await.unwrap();
        for _ in 1..pages.len() {
            controller.load_next().await.unwrap();
        }

        let state = controller.snapshot();
        let expected: usize = pages.iter().map(Vec::len).sum();
        assert_eq!(state.items.len(), expected);
        let unique: HashSet<_> = ids(&state).into_iter().collect();
        assert_eq!(unique.len(), expected);
        assert_eq!(state.page, 5);
    }
}
