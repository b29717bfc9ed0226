//! In-memory icon cache
//!
//! This module holds decoded condition icons keyed by URL for the lifetime of
//! the process. Entries are never evicted or invalidated: an icon URL is
//! treated as naming immutable content. The cache also tracks which URLs are
//! currently downloading so that concurrent rows showing the same icon trigger
//! a single request.

mod icon;
mod manager;

pub use icon::{fetch_icon, Icon, IconError, ThumbnailCell};
pub use manager::{IconCache, IconClaim};
