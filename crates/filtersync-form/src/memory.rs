//! In-memory form container
//!
//! A shared-handle control tree with the DOM behaviour the binding relies on:
//! defaults restored on reset, one checked radio per group, one selected
//! option per single select, and change notification only for simulated user
//! interaction (`user_input`, `user_select`, `user_check`).

use parking_lot::RwLock;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use uuid::Uuid;

use filtersync_model::{ControlCategory, ControlKind};

use crate::container::{ChangeListener, ControlId, FormContainer, OptionState, SubscriptionId};
use crate::error::FormError;
use crate::Result;

#[derive(Debug, Clone)]
struct OptionNode {
    value: String,
    selected: bool,
    default_selected: bool,
}

#[derive(Debug, Clone)]
struct ControlNode {
    name: String,
    kind: ControlKind,
    value: String,
    default_value: String,
    checked: bool,
    default_checked: bool,
    options: Vec<OptionNode>,
}

impl ControlNode {
    fn is_radio(&self) -> bool {
        self.kind.category() == ControlCategory::ExclusiveGroup
    }

    fn is_checkable(&self) -> bool {
        self.kind.category().is_group()
    }

    fn is_single_select(&self) -> bool {
        matches!(self.kind, ControlKind::Select { multiple: false })
    }

    /// A select reports its first selected option, or `""` when none is
    fn current_value(&self) -> String {
        match self.kind {
            ControlKind::Select { .. } => self
                .options
                .iter()
                .find(|o| o.selected)
                .map(|o| o.value.clone())
                .unwrap_or_default(),
            _ => self.value.clone(),
        }
    }

    fn reset(&mut self) {
        self.value = self.default_value.clone();
        self.checked = self.default_checked;
        for option in &mut self.options {
            option.selected = option.default_selected;
        }
    }
}

struct Subscription {
    id: SubscriptionId,
    control: ControlId,
    listener: ChangeListener,
}

#[derive(Default)]
pub struct MemoryForm {
    controls: Arc<RwLock<Vec<ControlNode>>>,
    subscriptions: Arc<RwLock<Vec<Subscription>>>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from markup.
    ///
    /// The first element matching `form_selector` is the container; every
    /// descendant carrying `filter_attribute` becomes a control named by that
    /// attribute's value. `value`, `checked` and `selected` attributes become
    /// the defaults restored by `reset`.
    pub fn from_html(html: &str, form_selector: &str, filter_attribute: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let form_sel = parse_selector(form_selector)?;
        let control_sel = parse_selector(&format!("[{}]", filter_attribute))?;
        let option_sel = parse_selector("option")?;

        let root = document
            .select(&form_sel)
            .next()
            .ok_or_else(|| FormError::Markup(format!("no element matches '{}'", form_selector)))?;

        let form = Self::new();
        for element in root.select(&control_sel) {
            let name = element.value().attr(filter_attribute).unwrap_or_default();
            let node = control_from_element(&element, name, &option_sel);
            form.push(node);
        }

        tracing::debug!(
            controls = form.controls.read().len(),
            "Built in-memory form from markup"
        );

        Ok(form)
    }

    /// Add a `<select>` with one option per value. A single select starts
    /// on its first option, a multiple one with nothing selected.
    pub fn add_select(&self, name: &str, multiple: bool, options: &[&str]) -> ControlId {
        self.push(ControlNode {
            name: name.to_string(),
            kind: ControlKind::select(multiple),
            value: String::new(),
            default_value: String::new(),
            checked: false,
            default_checked: false,
            options: options
                .iter()
                .map(|value| OptionNode {
                    value: value.to_string(),
                    selected: false,
                    default_selected: false,
                })
                .collect(),
        })
    }

    pub fn add_input(&self, name: &str, input_type: &str, value: &str) -> ControlId {
        self.push(ControlNode {
            name: name.to_string(),
            kind: ControlKind::input(input_type),
            value: value.to_string(),
            default_value: value.to_string(),
            checked: false,
            default_checked: false,
            options: Vec::new(),
        })
    }

    pub fn add_checkbox(&self, name: &str, value: &str) -> ControlId {
        self.add_input(name, "checkbox", value)
    }

    pub fn add_radio(&self, name: &str, value: &str) -> ControlId {
        self.add_input(name, "radio", value)
    }

    fn push(&self, mut node: ControlNode) -> ControlId {
        // A single select without a `selected` option starts on its first one
        if node.is_single_select() && !node.options.iter().any(|o| o.selected) {
            if let Some(first) = node.options.first_mut() {
                first.selected = true;
                first.default_selected = true;
            }
        }

        let mut controls = self.controls.write();
        let id = ControlId(controls.len());
        let radio_checked = node.is_radio() && node.checked;
        let name = node.name.clone();
        controls.push(node);
        if radio_checked {
            uncheck_radio_siblings(&mut controls, id, &name, true);
        }
        id
    }

    fn with_control<T>(&self, id: ControlId, f: impl FnOnce(&ControlNode) -> T) -> Result<T> {
        self.controls
            .read()
            .get(id.0)
            .map(f)
            .ok_or(FormError::UnknownControl(id))
    }

    /// Values of the selected options of a select
    pub fn selected_values(&self, id: ControlId) -> Result<Vec<String>> {
        self.with_control(id, |node| {
            node.options
                .iter()
                .filter(|o| o.selected)
                .map(|o| o.value.clone())
                .collect()
        })
    }

    /// Number of live change subscriptions across all controls
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Simulate the user typing or picking a value, then notify listeners
    pub fn user_input(&self, id: ControlId, value: &str) -> Result<()> {
        self.set_value(id, value)?;
        self.dispatch_change(id);
        Ok(())
    }

    /// Simulate the user choosing exactly `values` in a select
    pub fn user_select(&self, id: ControlId, values: &[&str]) -> Result<()> {
        {
            let mut controls = self.controls.write();
            let node = controls.get_mut(id.0).ok_or(FormError::UnknownControl(id))?;
            let single = node.is_single_select();
            let mut chosen = false;
            for option in &mut node.options {
                let wanted = values.contains(&option.value.as_str());
                // A single select keeps only the first match
                option.selected = wanted && !(single && chosen);
                chosen |= option.selected;
            }
        }
        self.dispatch_change(id);
        Ok(())
    }

    /// Simulate the user clicking a checkbox or radio into `checked`
    pub fn user_check(&self, id: ControlId, checked: bool) -> Result<()> {
        self.set_checked(id, checked)?;
        self.dispatch_change(id);
        Ok(())
    }

    fn dispatch_change(&self, id: ControlId) {
        let listeners: Vec<ChangeListener> = self
            .subscriptions
            .read()
            .iter()
            .filter(|s| s.control == id)
            .map(|s| Arc::clone(&s.listener))
            .collect();

        for listener in listeners {
            listener(id);
        }
    }
}

impl Clone for MemoryForm {
    fn clone(&self) -> Self {
        Self {
            controls: Arc::clone(&self.controls),
            subscriptions: Arc::clone(&self.subscriptions),
        }
    }
}

impl FormContainer for MemoryForm {
    fn filter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for node in self.controls.read().iter() {
            if !names.contains(&node.name) {
                names.push(node.name.clone());
            }
        }
        names
    }

    fn controls_named(&self, name: &str) -> Vec<ControlId> {
        self.controls
            .read()
            .iter()
            .enumerate()
            .filter(|(_, node)| node.name == name)
            .map(|(index, _)| ControlId(index))
            .collect()
    }

    fn control_name(&self, id: ControlId) -> Result<String> {
        self.with_control(id, |node| node.name.clone())
    }

    fn control_kind(&self, id: ControlId) -> Result<ControlKind> {
        self.with_control(id, |node| node.kind.clone())
    }

    fn value(&self, id: ControlId) -> Result<String> {
        self.with_control(id, ControlNode::current_value)
    }

    fn set_value(&self, id: ControlId, value: &str) -> Result<()> {
        let mut controls = self.controls.write();
        let node = controls.get_mut(id.0).ok_or(FormError::UnknownControl(id))?;

        if matches!(node.kind, ControlKind::Select { .. }) {
            // Selects the first matching option, deselects the rest
            let mut found = false;
            for option in &mut node.options {
                option.selected = !found && option.value == value;
                found |= option.selected;
            }
        } else {
            node.value = value.to_string();
        }

        Ok(())
    }

    fn options(&self, id: ControlId) -> Result<Vec<OptionState>> {
        self.with_control(id, |node| {
            node.options
                .iter()
                .map(|o| OptionState {
                    value: o.value.clone(),
                    selected: o.selected,
                })
                .collect()
        })
    }

    fn set_option_selected(&self, id: ControlId, index: usize, selected: bool) -> Result<()> {
        let mut controls = self.controls.write();
        let node = controls.get_mut(id.0).ok_or(FormError::UnknownControl(id))?;
        if index >= node.options.len() {
            return Err(FormError::OptionOutOfRange { control: id, index });
        }

        if selected && node.is_single_select() {
            for option in &mut node.options {
                option.selected = false;
            }
        }
        node.options[index].selected = selected;

        Ok(())
    }

    fn is_checked(&self, id: ControlId) -> Result<bool> {
        self.with_control(id, |node| node.checked)
    }

    fn set_checked(&self, id: ControlId, checked: bool) -> Result<()> {
        let mut controls = self.controls.write();
        let node = controls.get_mut(id.0).ok_or(FormError::UnknownControl(id))?;
        if !node.is_checkable() {
            return Err(FormError::NotCheckable(id));
        }

        node.checked = checked;
        if checked && node.is_radio() {
            let name = node.name.clone();
            uncheck_radio_siblings(&mut controls, id, &name, false);
        }

        Ok(())
    }

    fn reset(&self) -> Result<()> {
        for node in self.controls.write().iter_mut() {
            node.reset();
        }
        Ok(())
    }

    fn on_change(&self, id: ControlId, listener: ChangeListener) -> Result<SubscriptionId> {
        self.with_control(id, |_| ())?;

        let subscription = Uuid::new_v4();
        self.subscriptions.write().push(Subscription {
            id: subscription,
            control: id,
            listener,
        });
        Ok(subscription)
    }

    fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != subscription);
        subscriptions.len() != before
    }
}

fn uncheck_radio_siblings(controls: &mut [ControlNode], id: ControlId, name: &str, defaults: bool) {
    for (index, node) in controls.iter_mut().enumerate() {
        if index != id.0 && node.is_radio() && node.name == name {
            node.checked = false;
            if defaults {
                node.default_checked = false;
            }
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|_| FormError::Markup(format!("invalid selector '{}'", selector)))
}

fn control_from_element(element: &ElementRef<'_>, name: &str, option_sel: &Selector) -> ControlNode {
    let attrs = element.value();
    let tag = attrs.name();

    let (kind, value, checked, mut options) = match tag {
        "select" => {
            let options: Vec<OptionNode> = element
                .select(option_sel)
                .map(|option| {
                    let value = option
                        .value()
                        .attr("value")
                        .map(str::to_string)
                        .unwrap_or_else(|| option.text().collect::<String>().trim().to_string());
                    let selected = option.value().attr("selected").is_some();
                    OptionNode {
                        value,
                        selected,
                        default_selected: selected,
                    }
                })
                .collect();
            let multiple = attrs.attr("multiple").is_some();
            (ControlKind::select(multiple), String::new(), false, options)
        }
        "input" => {
            let kind = ControlKind::input(attrs.attr("type").unwrap_or("text"));
            let fallback = if kind.category().is_group() { "on" } else { "" };
            let value = attrs.attr("value").unwrap_or(fallback).to_string();
            let checked = attrs.attr("checked").is_some();
            (kind, value, checked, Vec::new())
        }
        other => (
            ControlKind::other(other),
            element.text().collect::<String>(),
            false,
            Vec::new(),
        ),
    };

    // A single select keeps its last `selected` option
    if kind == ControlKind::select(false) {
        if let Some(last) = options.iter().rposition(|o| o.selected) {
            for (index, option) in options.iter_mut().enumerate() {
                option.selected = index == last;
                option.default_selected = index == last;
            }
        }
    }

    ControlNode {
        name: name.to_string(),
        kind,
        default_value: value.clone(),
        value,
        checked,
        default_checked: checked,
        options,
    }
}
