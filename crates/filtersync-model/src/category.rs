//! Control classification
//!
//! ```text
//! select[multiple]                         → multi-select
//! select                                   → single-value
//! input[type=select-one|color|range|
//!             date|month|week|time]        → single-value
//! input[type=radio]                        → exclusive-group
//! input[type=checkbox]                     → inclusive-group
//! anything else                            → unsupported
//! ```

use serde::{Deserialize, Serialize};

/// The kind-determining attributes of a control, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "element")]
pub enum ControlKind {
    /// `<select>`, with or without the `multiple` attribute
    Select { multiple: bool },
    /// `<input>` with its declared `type` (lowercased)
    Input { input_type: String },
    /// Any other element carrying the filter attribute
    Other { tag: String },
}

impl ControlKind {
    pub fn select(multiple: bool) -> Self {
        ControlKind::Select { multiple }
    }

    pub fn input(input_type: &str) -> Self {
        ControlKind::Input {
            input_type: input_type.trim().to_lowercase(),
        }
    }

    pub fn other(tag: &str) -> Self {
        ControlKind::Other {
            tag: tag.to_lowercase(),
        }
    }

    pub fn category(&self) -> ControlCategory {
        classify(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlCategory {
    /// One current value (single select, date, color, ...)
    SingleValue,
    /// A select whose options may be selected together
    MultiSelect,
    /// Radio-like: one member of the group checked at a time
    ExclusiveGroup,
    /// Checkbox-like: any number of members checked
    InclusiveGroup,
    /// Not something a filter can be bound to
    Unsupported,
}

impl ControlCategory {
    /// Whether the control's members are separate elements sharing one name
    pub fn is_group(&self) -> bool {
        matches!(
            self,
            ControlCategory::ExclusiveGroup | ControlCategory::InclusiveGroup
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlCategory::SingleValue => "single-value",
            ControlCategory::MultiSelect => "multi-select",
            ControlCategory::ExclusiveGroup => "exclusive-group",
            ControlCategory::InclusiveGroup => "inclusive-group",
            ControlCategory::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for ControlCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a control by its kind. Recomputed on every call, never cached.
pub fn classify(kind: &ControlKind) -> ControlCategory {
    match kind {
        ControlKind::Select { multiple: true } => ControlCategory::MultiSelect,
        ControlKind::Select { multiple: false } => ControlCategory::SingleValue,
        ControlKind::Input { input_type } => match input_type.as_str() {
            "select-one" | "color" | "range" | "date" | "month" | "week" | "time" => {
                ControlCategory::SingleValue
            }
            "radio" => ControlCategory::ExclusiveGroup,
            "checkbox" => ControlCategory::InclusiveGroup,
            _ => ControlCategory::Unsupported,
        },
        ControlKind::Other { .. } => ControlCategory::Unsupported,
    }
}
