//! Form binding
//!
//! Associates filter names with the controls of one container and reads or
//! writes them according to their `ControlCategory`.

use filtersync_model::{classify, ControlCategory};

use crate::container::{ControlId, FormContainer};
use crate::Result;

/// Current value of a control, shaped by its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlValue {
    /// Single-value controls and the checked member of an exclusive group
    Single(String),
    /// Values of every selected option, in option order
    Selected(Vec<String>),
    /// One member of an inclusive group
    Toggle { value: String, checked: bool },
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlReading {
    pub id: ControlId,
    pub name: String,
    pub category: ControlCategory,
    pub value: ControlValue,
}

pub struct FormBinding<F> {
    form: F,
}

impl<F: FormContainer> FormBinding<F> {
    pub fn new(form: F) -> Self {
        Self { form }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// Registered filter names, in document order
    pub fn names(&self) -> Vec<String> {
        self.form.filter_names()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        !self.form.controls_named(name).is_empty()
    }

    /// Every control carrying a filter name
    pub fn controls(&self) -> Vec<ControlId> {
        self.names()
            .iter()
            .flat_map(|name| self.form.controls_named(name))
            .collect()
    }

    /// Write `tokens` into the control(s) named `name`.
    ///
    /// Single-value controls take only the first token. Multi-selects and
    /// inclusive groups only ever gain selections here; options or members
    /// not named by a token keep their current state.
    pub fn write_control(&self, name: &str, tokens: &[String]) {
        let controls = self.form.controls_named(name);
        let Some(&first) = controls.first() else {
            return;
        };
        let Some(token) = tokens.first() else {
            return;
        };

        let kind = match self.form.control_kind(first) {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Failed to read control kind");
                return;
            }
        };

        let result = match classify(&kind) {
            ControlCategory::SingleValue => self.form.set_value(first, token),
            ControlCategory::MultiSelect => self.select_options(first, tokens),
            ControlCategory::ExclusiveGroup => self.check_members(&controls, &tokens[..1]),
            ControlCategory::InclusiveGroup => self.check_members(&controls, tokens),
            ControlCategory::Unsupported => {
                tracing::warn!(name = %name, kind = ?kind, "Unsupported control, skipping write");
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::warn!(name = %name, error = %e, "Failed to write control");
        }
    }

    fn select_options(&self, select: ControlId, tokens: &[String]) -> Result<()> {
        for (index, option) in self.form.options(select)?.iter().enumerate() {
            if tokens.contains(&option.value) {
                self.form.set_option_selected(select, index, true)?;
            }
        }
        Ok(())
    }

    fn check_members(&self, members: &[ControlId], tokens: &[String]) -> Result<()> {
        for token in tokens {
            for &member in members {
                if self.form.value(member)? == *token {
                    self.form.set_checked(member, true)?;
                }
            }
        }
        Ok(())
    }

    /// Read the control a change event came from
    pub fn read_control(&self, id: ControlId) -> Result<ControlReading> {
        let name = self.form.control_name(id)?;
        let kind = self.form.control_kind(id)?;
        let category = classify(&kind);

        let value = match category {
            ControlCategory::SingleValue | ControlCategory::ExclusiveGroup => {
                ControlValue::Single(self.form.value(id)?)
            }
            ControlCategory::MultiSelect => ControlValue::Selected(
                self.form
                    .options(id)?
                    .into_iter()
                    .filter(|option| option.selected)
                    .map(|option| option.value)
                    .collect(),
            ),
            ControlCategory::InclusiveGroup => ControlValue::Toggle {
                value: self.form.value(id)?,
                checked: self.form.is_checked(id)?,
            },
            ControlCategory::Unsupported => ControlValue::Unsupported,
        };

        Ok(ControlReading {
            id,
            name,
            category,
            value,
        })
    }

    /// Restore every control in the container to its default
    pub fn reset(&self) -> Result<()> {
        self.form.reset()
    }
}
