//! Paginated feed state for pull-to-refresh and infinite scroll.
//!
//! ```text
//! UI list → FeedController → ContentClient
//!                 ↓
//!             FeedState (read-only snapshots for rendering)
//! ```

mod controller;
mod liveness;

pub use controller::{FeedController, FeedState, FetchOutcome};
pub use liveness::Liveness;
