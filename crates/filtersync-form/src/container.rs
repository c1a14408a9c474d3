//! Host container contract
//!
//! The bound container looks up descendant controls by filter name and can
//! restore every descendant to its default. Controls expose their kind, a
//! readable/writable value, option or checked state, and change notification.
//! Writes made through this trait are programmatic and must not notify
//! change listeners.

use std::sync::Arc;

use filtersync_model::ControlKind;
use uuid::Uuid;

use crate::Result;

/// Handle of one control inside a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub usize);

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub type SubscriptionId = Uuid;

/// Called with the control whose value the user changed
pub type ChangeListener = Arc<dyn Fn(ControlId) + Send + Sync>;

/// One `<option>` of a select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionState {
    pub value: String,
    pub selected: bool,
}

pub trait FormContainer: Send + Sync {
    /// Every filter name carried by a control, in document order, without duplicates
    fn filter_names(&self) -> Vec<String>;

    /// Controls whose filter attribute equals `name` exactly (group members included)
    fn controls_named(&self, name: &str) -> Vec<ControlId>;

    fn control_name(&self, id: ControlId) -> Result<String>;

    fn control_kind(&self, id: ControlId) -> Result<ControlKind>;

    fn value(&self, id: ControlId) -> Result<String>;

    fn set_value(&self, id: ControlId, value: &str) -> Result<()>;

    /// Options of a select, in control order. Empty for anything else.
    fn options(&self, id: ControlId) -> Result<Vec<OptionState>>;

    fn set_option_selected(&self, id: ControlId, index: usize, selected: bool) -> Result<()>;

    fn is_checked(&self, id: ControlId) -> Result<bool>;

    fn set_checked(&self, id: ControlId, checked: bool) -> Result<()>;

    /// Restore every control to its default value
    fn reset(&self) -> Result<()>;

    fn on_change(&self, id: ControlId, listener: ChangeListener) -> Result<SubscriptionId>;

    fn unsubscribe(&self, subscription: SubscriptionId) -> bool;
}
