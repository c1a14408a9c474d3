//! Filter/address synchronization facade
//!
//! One `FilterSync` per form. It owns the form binding and the navigation
//! synchronizer; listeners installed by `initialize` hold only a weak
//! reference, and dropping the last handle unsubscribes them from the hosts.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use url::Url;

use filtersync_form::{
    apply_state, derive_update, ChangeListener, ControlId, FormBinding, FormContainer, MemoryForm,
    SubscriptionId,
};
use filtersync_model::{FilterState, FilterUpdate};
use filtersync_navigation::{AddressBar, NavigationListener, NavigationSynchronizer};

use crate::config::Config;
use crate::Result;

struct Inner<F: FormContainer, A: AddressBar> {
    binding: FormBinding<F>,
    navigation: NavigationSynchronizer<A>,
    initialized: bool,
    change_subscriptions: Vec<SubscriptionId>,
    navigation_subscription: Option<SubscriptionId>,
}

impl<F: FormContainer, A: AddressBar> Drop for Inner<F, A> {
    fn drop(&mut self) {
        for subscription in self.change_subscriptions.drain(..) {
            self.binding.form().unsubscribe(subscription);
        }
        if let Some(subscription) = self.navigation_subscription.take() {
            self.navigation.address().unsubscribe(subscription);
        }
    }
}

pub struct FilterSync<F: FormContainer, A: AddressBar> {
    inner: Arc<Mutex<Inner<F, A>>>,
}

impl<F, A> FilterSync<F, A>
where
    F: FormContainer + 'static,
    A: AddressBar + 'static,
{
    pub fn new(form: F, address: A) -> Result<Self> {
        let navigation = NavigationSynchronizer::new(address)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                binding: FormBinding::new(form),
                navigation,
                initialized: false,
                change_subscriptions: Vec::new(),
                navigation_subscription: None,
            })),
        })
    }

    /// Apply the filters in the current address to the controls, then start
    /// listening for control changes and back/forward navigation.
    ///
    /// Meant to be called once per form; later calls only log a warning.
    pub fn initialize(&self) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if inner.initialized {
            tracing::warn!("FilterSync already initialized, ignoring");
            return Ok(());
        }

        Self::reapply(inner)?;

        let controls = inner.binding.controls();
        for &id in &controls {
            let weak = Arc::downgrade(&self.inner);
            let listener: ChangeListener = Arc::new(move |changed: ControlId| {
                Self::dispatch(&weak, |inner| Self::apply_change(inner, changed));
            });
            let subscription = inner.binding.form().on_change(id, listener)?;
            inner.change_subscriptions.push(subscription);
        }

        let weak = Arc::downgrade(&self.inner);
        let listener: NavigationListener = Arc::new(move || {
            Self::dispatch(&weak, Self::apply_navigation);
        });
        inner.navigation_subscription = Some(inner.navigation.address().on_navigate(listener));

        inner.initialized = true;
        tracing::info!(
            controls = controls.len(),
            filters = inner.navigation.state().len(),
            "FilterSync initialized"
        );

        Ok(())
    }

    /// Re-read the address and write its filters into the controls again
    pub fn refresh(&self) -> Result<()> {
        let mut guard = self.inner.lock();
        Self::reapply(&mut guard)
    }

    /// Remove every filter from the address and put every control back to
    /// its default. The two halves run independently; the first error is
    /// returned after both have been attempted.
    pub fn reset(&self) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let cleared = inner.navigation.clear(&inner.binding);
        if let Err(e) = &cleared {
            tracing::warn!(error = %e, "Failed to clear filters from address");
        }

        let reset = inner.binding.reset();
        if let Err(e) = &reset {
            tracing::warn!(error = %e, "Failed to reset controls");
        }

        let url = cleared?;
        reset?;
        tracing::info!(url = %url, "Filters reset");
        Ok(())
    }

    /// Push the current filter state onto `address`, absolute or relative
    /// to the current one
    pub fn commit(&self, address: &str) -> Result<Url> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let target = inner.navigation.snapshot().url.join(address)?;
        let state = inner.navigation.state().clone();
        Ok(inner.navigation.commit(&target, state, &inner.binding)?)
    }

    pub fn current_state(&self) -> FilterState {
        self.inner.lock().navigation.state().clone()
    }

    fn dispatch(
        weak: &Weak<Mutex<Inner<F, A>>>,
        handler: impl FnOnce(&mut Inner<F, A>) -> Result<()>,
    ) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let mut guard = inner.lock();
        if let Err(e) = handler(&mut *guard) {
            tracing::warn!(error = %e, "Filter sync handler failed");
        }
    }

    fn reapply(inner: &mut Inner<F, A>) -> Result<()> {
        inner.navigation.refresh_snapshot()?;
        let state = inner.navigation.parse_state(&inner.binding);
        apply_state(&inner.binding, &state);
        inner.navigation.set_state(state);
        Ok(())
    }

    fn apply_change(inner: &mut Inner<F, A>, id: ControlId) -> Result<()> {
        let reading = inner.binding.read_control(id)?;
        let update = derive_update(&reading, inner.navigation.state());
        if update == FilterUpdate::Unchanged {
            return Ok(());
        }

        tracing::debug!(name = %reading.name, category = %reading.category, "Control changed");

        let mut state = inner.navigation.state().clone();
        state.apply(update);
        let target = inner.navigation.snapshot().url.clone();
        inner.navigation.commit(&target, state, &inner.binding)?;
        Ok(())
    }

    fn apply_navigation(inner: &mut Inner<F, A>) -> Result<()> {
        inner
            .navigation
            .handle_history_navigation(&inner.binding)?;
        Ok(())
    }
}

impl<A> FilterSync<MemoryForm, A>
where
    A: AddressBar + 'static,
{
    /// Bind to an in-memory form built from `html` as described by `config`
    pub fn from_html(html: &str, address: A, config: &Config) -> Result<Self> {
        config.validate()?;
        let form = MemoryForm::from_html(html, &config.form_selector, &config.filter_attribute)?;
        Self::new(form, address)
    }
}

impl<F: FormContainer, A: AddressBar> Clone for FilterSync<F, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use filtersync_navigation::{MemoryHistory, NavigationError, NavigationListener};

    /// Address bar whose history refuses new entries
    struct FrozenAddress(MemoryHistory);

    impl AddressBar for FrozenAddress {
        fn current(&self) -> filtersync_navigation::Result<Url> {
            self.0.current()
        }

        fn push(&self, _url: &Url) -> filtersync_navigation::Result<()> {
            Err(NavigationError::AddressUnavailable("history is frozen".into()))
        }

        fn on_navigate(&self, listener: NavigationListener) -> SubscriptionId {
            self.0.on_navigate(listener)
        }

        fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
            self.0.unsubscribe(subscription)
        }
    }

    const SHOP: &str = r#"
        <form id="filters">
          <input type="checkbox" name="color" value="red">
          <input type="checkbox" name="color" value="blue">
          <input type="checkbox" name="size" value="s">
          <input type="checkbox" name="size" value="m">
          <select name="sort">
            <option value="">Relevance</option>
            <option value="price">Price</option>
          </select>
          <select name="tags" multiple>
            <option value="a">A</option>
            <option value="b">B</option>
            <option value="c">C</option>
          </select>
          <input type="text" name="q" value="">
        </form>
    "#;

    fn shop(start: &str) -> (FilterSync<MemoryForm, MemoryHistory>, MemoryForm, MemoryHistory) {
        let history = MemoryHistory::new(start).unwrap();
        let form = MemoryForm::from_html(SHOP, "#filters", "name").unwrap();
        let sync = FilterSync::new(form.clone(), history.clone()).unwrap();
        (sync, form, history)
    }

    fn control(form: &MemoryForm, name: &str, index: usize) -> ControlId {
        form.controls_named(name)[index]
    }

    fn current(history: &MemoryHistory) -> String {
        history.current().unwrap().to_string()
    }

    #[test]
    fn test_initialize_applies_address() {
        let (sync, form, _) = shop("https://shop.example/items?color=blue&sort=price&utm_source=x");
        sync.initialize().unwrap();

        assert!(!form.is_checked(control(&form, "color", 0)).unwrap());
        assert!(form.is_checked(control(&form, "color", 1)).unwrap());
        assert_eq!(form.value(control(&form, "sort", 0)).unwrap(), "price");

        let state = sync.current_state();
        assert_eq!(state.len(), 2);
        assert!(!state.contains("utm_source"));
    }

    #[test]
    fn test_navigation_scenario() {
        let (sync, form, history) = shop("https://shop.example/items?color=red");
        sync.initialize().unwrap();
        let red = control(&form, "color", 0);
        let size_m = control(&form, "size", 1);
        assert!(form.is_checked(red).unwrap());

        form.user_check(size_m, true).unwrap();
        assert_eq!(
            current(&history),
            "https://shop.example/items?color=red&size=m"
        );
        assert_eq!(sync.current_state().get("size").unwrap(), ["m"]);

        assert!(history.back());
        assert_eq!(current(&history), "https://shop.example/items?color=red");
        assert!(form.is_checked(red).unwrap());
        assert!(!form.is_checked(size_m).unwrap());
        assert!(!sync.current_state().contains("size"));

        assert!(history.forward());
        assert!(form.is_checked(size_m).unwrap());
    }

    #[test]
    fn test_checkbox_merge_through_events() {
        let (sync, form, history) = shop("https://shop.example/items");
        sync.initialize().unwrap();
        let red = control(&form, "color", 0);
        let blue = control(&form, "color", 1);

        form.user_check(red, true).unwrap();
        form.user_check(blue, true).unwrap();
        assert_eq!(current(&history), "https://shop.example/items?color=red+blue");

        form.user_check(blue, false).unwrap();
        assert_eq!(current(&history), "https://shop.example/items?color=red");

        form.user_check(red, false).unwrap();
        assert_eq!(current(&history), "https://shop.example/items");
        assert!(sync.current_state().is_empty());
    }

    #[test]
    fn test_select_changes() {
        let (sync, form, history) = shop("https://shop.example/items?tags=b");
        sync.initialize().unwrap();
        let sort = control(&form, "sort", 0);
        let tags = control(&form, "tags", 0);

        form.user_select(tags, &["a", "c"]).unwrap();
        assert_eq!(sync.current_state().get("tags").unwrap(), ["a", "c"]);

        form.user_input(sort, "price").unwrap();
        assert_eq!(
            current(&history),
            "https://shop.example/items?tags=a+c&sort=price"
        );

        form.user_input(sort, "").unwrap();
        assert!(!sync.current_state().contains("sort"));
        assert_eq!(current(&history), "https://shop.example/items?tags=a+c");
    }

    #[test]
    fn test_unsupported_change_leaves_address() {
        let (sync, form, history) = shop("https://shop.example/items?color=red");
        sync.initialize().unwrap();

        form.user_input(control(&form, "q", 0), "boots").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(sync.current_state().get("color").unwrap(), ["red"]);
    }

    #[test]
    fn test_initialize_twice_installs_once() {
        let (sync, form, history) = shop("https://shop.example/items");
        sync.initialize().unwrap();
        sync.initialize().unwrap();

        form.user_check(control(&form, "color", 0), true).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(sync.current_state().get("color").unwrap(), ["red"]);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let (sync, form, _) = shop("https://shop.example/items?color=red&tags=a+c");
        sync.initialize().unwrap();
        let tags = control(&form, "tags", 0);

        sync.refresh().unwrap();
        let first = (
            form.is_checked(control(&form, "color", 0)).unwrap(),
            form.selected_values(tags).unwrap(),
        );
        sync.refresh().unwrap();
        let second = (
            form.is_checked(control(&form, "color", 0)).unwrap(),
            form.selected_values(tags).unwrap(),
        );
        assert_eq!(first, second);
        assert_eq!(first.1, ["a", "c"]);
    }

    #[test]
    fn test_reset_clears_address_and_controls() {
        let (sync, form, history) = shop("https://shop.example/items?page=2&color=red&size=s+m");
        sync.initialize().unwrap();
        assert!(form.is_checked(control(&form, "size", 1)).unwrap());

        sync.reset().unwrap();
        assert_eq!(current(&history), "https://shop.example/items?page=2");
        assert!(!form.is_checked(control(&form, "color", 0)).unwrap());
        assert!(!form.is_checked(control(&form, "size", 1)).unwrap());
        assert!(sync.current_state().is_empty());
    }

    #[test]
    fn test_commit_to_address() {
        let (sync, _, history) = shop("https://shop.example/items?color=red");
        sync.initialize().unwrap();

        let url = sync.commit("/sale").unwrap();
        assert_eq!(url.as_str(), "https://shop.example/sale?color=red");
        assert_eq!(current(&history), "https://shop.example/sale?color=red");

        assert!(sync.commit("http://[bad").is_err());
    }

    #[test]
    fn test_dropped_sync_stops_listening() {
        let (sync, form, history) = shop("https://shop.example/items");
        sync.initialize().unwrap();
        drop(sync);

        form.user_check(control(&form, "color", 0), true).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_dropped_sync_unsubscribes() {
        let history = MemoryHistory::new("https://shop.example/items").unwrap();
        let form = MemoryForm::from_html(SHOP, "#filters", "name").unwrap();

        for _ in 0..3 {
            let sync = FilterSync::new(form.clone(), history.clone()).unwrap();
            sync.initialize().unwrap();
            let clone = sync.clone();
            assert!(form.subscription_count() > 0);
            assert_eq!(history.listener_count(), 1);
            drop(sync);
            assert_eq!(history.listener_count(), 1);
            drop(clone);
        }

        assert_eq!(form.subscription_count(), 0);
        assert_eq!(history.listener_count(), 0);
    }

    #[test]
    fn test_reset_resets_controls_when_address_fails() {
        let history = MemoryHistory::new("https://shop.example/items?color=red").unwrap();
        let form = MemoryForm::from_html(SHOP, "#filters", "name").unwrap();
        let sync = FilterSync::new(form.clone(), FrozenAddress(history.clone())).unwrap();
        sync.initialize().unwrap();
        let red = control(&form, "color", 0);
        assert!(form.is_checked(red).unwrap());

        assert!(matches!(
            sync.reset(),
            Err(CoreError::Navigation(NavigationError::AddressUnavailable(_)))
        ));
        assert!(!form.is_checked(red).unwrap());
        assert_eq!(current(&history), "https://shop.example/items?color=red");
    }

    #[test]
    fn test_from_html_with_config() {
        let html = r#"
            <div class="facets">
              <input type="radio" data-filter="size" value="s">
              <input type="radio" data-filter="size" value="m">
            </div>
        "#;
        let history = MemoryHistory::new("https://shop.example/?size=m").unwrap();
        let config = Config::new("data-filter", ".facets");
        let sync = FilterSync::from_html(html, history, &config).unwrap();
        sync.initialize().unwrap();
        assert_eq!(sync.current_state().get("size").unwrap(), ["m"]);

        let history = MemoryHistory::new("https://shop.example/").unwrap();
        let bad = Config::new("", "form");
        assert!(FilterSync::from_html(html, history, &bad).is_err());
    }
}
