//! FilterSync Navigation
//!
//! Keeps the page address and the filter state in step:
//! - Commit: FilterState → query string → pushed history entry (no reload)
//! - Back/forward: address → FilterState → controls reset and reapplied
//!
//! The browser side is abstracted as `AddressBar`; `MemoryHistory` is an
//! in-memory session history implementing it.

mod address;
mod error;
mod history;
mod snapshot;
mod synchronizer;

pub use address::{AddressBar, NavigationListener};
pub use error::NavigationError;
pub use history::{HistoryEntry, MemoryHistory};
pub use snapshot::AddressSnapshot;
pub use synchronizer::NavigationSynchronizer;

pub type Result<T> = std::result::Result<T, NavigationError>;
