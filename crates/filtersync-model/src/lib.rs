//! FilterSync Model
//!
//! The data shared by every other crate:
//! - `FilterState`: filter name → ordered, non-empty token list
//! - `ControlCategory`: the five ways a control can hold a filter value
//! - `classify`: maps a control's kind to its category

mod category;
mod state;

pub use category::{classify, ControlCategory, ControlKind};
pub use state::{FilterState, FilterUpdate};
