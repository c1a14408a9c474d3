//! Host address contract
//!
//! Read the current address, push a new one into history without reloading,
//! and get told when the user moves back or forward.

use std::sync::Arc;

use filtersync_form::SubscriptionId;
use url::Url;

use crate::Result;

/// Called after a back/forward navigation changed the current address
pub type NavigationListener = Arc<dyn Fn() + Send + Sync>;

pub trait AddressBar: Send + Sync {
    fn current(&self) -> Result<Url>;

    /// Add `url` as the newest history entry. Must not reload the page and
    /// must not notify navigation listeners.
    fn push(&self, url: &Url) -> Result<()>;

    fn on_navigate(&self, listener: NavigationListener) -> SubscriptionId;

    fn unsubscribe(&self, subscription: SubscriptionId) -> bool;
}
