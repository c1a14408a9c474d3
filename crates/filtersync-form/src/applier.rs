//! State application
//!
//! `apply_state` pushes a whole `FilterState` into the controls.
//! `derive_update` turns one control change into the matching `FilterUpdate`.

use filtersync_model::{FilterState, FilterUpdate};

use crate::binding::{ControlReading, ControlValue, FormBinding};
use crate::container::FormContainer;

/// Write every entry of `state` into its control(s).
///
/// Names absent from `state` are not cleared; reset the container first
/// when the controls must match `state` exactly.
pub fn apply_state<F: FormContainer>(binding: &FormBinding<F>, state: &FilterState) {
    for (name, tokens) in state.iter() {
        binding.write_control(name, tokens);
    }
}

/// Compute how a control change alters `current`.
pub fn derive_update(reading: &ControlReading, current: &FilterState) -> FilterUpdate {
    let name = reading.name.clone();

    match &reading.value {
        ControlValue::Single(value) if value.is_empty() => FilterUpdate::Remove { name },
        ControlValue::Single(value) => FilterUpdate::Set {
            name,
            tokens: vec![value.clone()],
        },
        ControlValue::Selected(values) => FilterUpdate::Set {
            name,
            tokens: values.clone(),
        },
        ControlValue::Toggle { value, checked } => {
            merge_toggle(name, value, *checked, current.get(&reading.name))
        }
        ControlValue::Unsupported => {
            tracing::warn!(
                name = %reading.name,
                control = %reading.id,
                "Unsupported control changed, filter state unchanged"
            );
            FilterUpdate::Unchanged
        }
    }
}

/// Merge one inclusive-group member into the tokens already stored for it.
/// Appends are not deduplicated.
fn merge_toggle(
    name: String,
    value: &str,
    checked: bool,
    existing: Option<&[String]>,
) -> FilterUpdate {
    match existing {
        // Nothing stored yet, so the event can only be a check
        None => FilterUpdate::Set {
            name,
            tokens: vec![value.to_string()],
        },
        Some(tokens) if checked => {
            let mut tokens = tokens.to_vec();
            tokens.push(value.to_string());
            FilterUpdate::Set { name, tokens }
        }
        Some(tokens) if tokens.len() > 1 => {
            let remaining: Vec<String> = tokens
                .iter()
                .filter(|token| token.as_str() != value)
                .cloned()
                .collect();
            if remaining.is_empty() {
                FilterUpdate::Remove { name }
            } else {
                FilterUpdate::Set {
                    name,
                    tokens: remaining,
                }
            }
        }
        Some(_) => FilterUpdate::Remove { name },
    }
}
