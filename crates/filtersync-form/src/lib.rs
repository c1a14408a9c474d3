//! FilterSync Form
//!
//! Everything that touches controls:
//! - `FormContainer`: what the host page must provide for one form-like container
//! - `FormBinding`: read/write the control(s) registered under a filter name
//! - `apply_state` / `derive_update`: FilterState → controls, control event → FilterUpdate
//! - `MemoryForm`: in-memory container, built in code or from HTML markup

mod applier;
mod binding;
mod container;
mod error;
mod memory;

pub use applier::{apply_state, derive_update};
pub use binding::{ControlReading, ControlValue, FormBinding};
pub use container::{ChangeListener, ControlId, FormContainer, OptionState, SubscriptionId};
pub use error::FormError;
pub use memory::MemoryForm;

pub type Result<T> = std::result::Result<T, FormError>;
