pub mod http_client;

use async_trait::async_trait;

use crate::app::Result;

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Source of paginated content.
///
/// `page` is 1-based. Implementations return items in server order and
/// report transport or server failures as errors without retrying.
#[async_trait]
pub trait ContentClient<I>: Send + Sync {
    async fn fetch(&self, page: u32, page_size: u32) -> Result<Vec<I>>;
}
