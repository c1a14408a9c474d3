//! Address snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use filtersync_codec::QueryString;

/// The address as last read, with its query already decoded.
/// Replaced whole on every refresh, never patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressSnapshot {
    pub url: Url,
    pub query: QueryString,
    pub captured_at: DateTime<Utc>,
}

impl AddressSnapshot {
    pub fn capture(url: Url) -> Self {
        let query = QueryString::from_url(&url);
        Self {
            url,
            query,
            captured_at: Utc::now(),
        }
    }
}
