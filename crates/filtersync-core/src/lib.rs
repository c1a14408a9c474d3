//! FilterSync Core
//!
//! Keeps a form's filter controls and the page address in sync, both ways.
//! User changes a control → filter state updated → new address pushed.
//! User goes back/forward → address parsed → controls reset and reapplied.

mod config;
mod error;
mod sync;

pub use config::Config;
pub use error::CoreError;
pub use sync::FilterSync;

// Re-export core components
pub use filtersync_codec::{QueryEdit, QueryString};
pub use filtersync_form::{
    ControlId, ControlReading, ControlValue, FormBinding, FormContainer, FormError, MemoryForm,
    OptionState,
};
pub use filtersync_model::{classify, ControlCategory, ControlKind, FilterState, FilterUpdate};
pub use filtersync_navigation::{
    AddressBar, AddressSnapshot, HistoryEntry, MemoryHistory, NavigationError,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
