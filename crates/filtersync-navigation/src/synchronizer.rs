//! Navigation synchronizer
//!
//! Sole owner of the address snapshot and of the filter state derived from it.
//! Every change to the visible address goes through `commit`.

use url::Url;

use filtersync_codec as codec;
use filtersync_form::{apply_state, FormBinding, FormContainer};
use filtersync_model::FilterState;

use crate::address::AddressBar;
use crate::snapshot::AddressSnapshot;
use crate::Result;

pub struct NavigationSynchronizer<A> {
    address: A,
    snapshot: AddressSnapshot,
    state: FilterState,
}

impl<A: AddressBar> NavigationSynchronizer<A> {
    /// Take the first snapshot from the live address
    pub fn new(address: A) -> Result<Self> {
        let snapshot = AddressSnapshot::capture(address.current()?);
        Ok(Self {
            address,
            snapshot,
            state: FilterState::new(),
        })
    }

    pub fn address(&self) -> &A {
        &self.address
    }

    pub fn snapshot(&self) -> &AddressSnapshot {
        &self.snapshot
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn set_state(&mut self, state: FilterState) {
        self.state = state;
    }

    /// Re-read the live address. Replaces the previous snapshot entirely.
    pub fn refresh_snapshot(&mut self) -> Result<()> {
        self.snapshot = AddressSnapshot::capture(self.address.current()?);
        Ok(())
    }

    /// Filter state encoded in the current snapshot, restricted to the
    /// names registered in `binding`
    pub fn parse_state<F: FormContainer>(&self, binding: &FormBinding<F>) -> FilterState {
        codec::parse(&self.snapshot.query, |name| binding.is_registered(name))
    }

    /// Encode `state` into the query string, push `target` with that query
    /// as a new history entry, then refresh the snapshot.
    ///
    /// Every registered filter name is set or removed; other parameters of
    /// the current query are kept.
    pub fn commit<F: FormContainer>(
        &mut self,
        target: &Url,
        state: FilterState,
        binding: &FormBinding<F>,
    ) -> Result<Url> {
        let names = binding.names();
        let mut query = self.snapshot.query.clone();
        for edit in codec::serialize(&state, names.iter().map(String::as_str)) {
            query.apply(&edit);
        }

        let url = query.apply_to(target);
        self.address.push(&url)?;
        tracing::info!(url = %url, filters = state.len(), "Committed filters to address");

        self.state = state;
        self.refresh_snapshot()?;
        Ok(url)
    }

    /// Commit an empty state: drops every registered name from the address
    pub fn clear<F: FormContainer>(&mut self, binding: &FormBinding<F>) -> Result<Url> {
        let target = self.snapshot.url.clone();
        self.commit(&target, FilterState::new(), binding)
    }

    /// Back/forward happened: re-read the address, reset every control and
    /// apply exactly the state the new address encodes.
    pub fn handle_history_navigation<F: FormContainer>(
        &mut self,
        binding: &FormBinding<F>,
    ) -> Result<()> {
        self.refresh_snapshot()?;

        if let Err(e) = binding.reset() {
            tracing::warn!(error = %e, "Failed to reset controls after navigation");
        }

        let state = self.parse_state(binding);
        apply_state(binding, &state);
        tracing::debug!(
            url = %self.snapshot.url,
            filters = state.len(),
            "Reapplied filters after history navigation"
        );

        self.state = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;
    use filtersync_form::MemoryForm;

    fn setup(start: &str) -> (MemoryHistory, MemoryForm, FormBinding<MemoryForm>) {
        let history = MemoryHistory::new(start).unwrap();
        let form = MemoryForm::new();
        form.add_checkbox("color", "red");
        form.add_checkbox("color", "blue");
        form.add_radio("size", "s");
        form.add_radio("size", "m");
        let binding = FormBinding::new(form.clone());
        (history, form, binding)
    }

    #[test]
    fn test_parse_state_ignores_foreign_params() {
        let (history, _, binding) = setup("https://shop.example/items?color=red+blue&page=2");
        let sync = NavigationSynchronizer::new(history).unwrap();

        let state = sync.parse_state(&binding);
        assert_eq!(state.len(), 1);
        assert_eq!(state.get("color").unwrap(), ["red", "blue"]);
    }

    #[test]
    fn test_commit_pushes_and_refreshes() {
        let (history, _, binding) = setup("https://shop.example/items?page=2&color=blue");
        let mut sync = NavigationSynchronizer::new(history.clone()).unwrap();

        let state: FilterState = vec![("size", vec!["m"])].into_iter().collect();
        let target = sync.snapshot().url.clone();
        let url = sync.commit(&target, state.clone(), &binding).unwrap();

        assert_eq!(url.as_str(), "https://shop.example/items?page=2&size=m");
        assert_eq!(history.len(), 2);
        assert_eq!(sync.snapshot().url, url);
        assert_eq!(sync.snapshot().query.get("size"), Some("m"));
        assert_eq!(sync.state(), &state);
    }

    #[test]
    fn test_commit_to_other_target() {
        let (history, _, binding) = setup("https://shop.example/items?color=red");
        let mut sync = NavigationSynchronizer::new(history).unwrap();

        let target = Url::parse("https://shop.example/sale?stale=1").unwrap();
        let state = sync.parse_state(&binding);
        let url = sync.commit(&target, state, &binding).unwrap();
        assert_eq!(url.as_str(), "https://shop.example/sale?color=red");
    }

    #[test]
    fn test_clear_removes_registered_names_only() {
        let (history, _, binding) = setup("https://shop.example/items?color=red&q=boots&size=m");
        let mut sync = NavigationSynchronizer::new(history).unwrap();

        let url = sync.clear(&binding).unwrap();
        assert_eq!(url.as_str(), "https://shop.example/items?q=boots");
        assert!(sync.state().is_empty());
    }

    #[test]
    fn test_history_navigation_resets_then_applies() {
        let (history, form, binding) = setup("https://shop.example/items?color=red");
        let mut sync = NavigationSynchronizer::new(history.clone()).unwrap();
        let size_m = form.controls_named("size")[1];
        let red = form.controls_named("color")[0];

        form.set_checked(size_m, true).unwrap();
        history
            .push(&Url::parse("https://shop.example/items?color=red&size=m").unwrap())
            .unwrap();
        history.back();

        sync.handle_history_navigation(&binding).unwrap();
        assert!(form.is_checked(red).unwrap());
        assert!(!form.is_checked(size_m).unwrap());
        assert_eq!(sync.state().get("color").unwrap(), ["red"]);
        assert!(!sync.state().contains("size"));
    }
}
