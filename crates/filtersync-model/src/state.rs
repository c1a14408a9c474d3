//! Filter state
//!
//! A flat mapping from filter name to the tokens currently selected for it.
//! A name that is present always has at least one token.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    entries: BTreeMap<String, Vec<String>>,
}

/// The change one control event makes to a `FilterState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    /// Replace the tokens for `name`
    Set { name: String, tokens: Vec<String> },
    /// Drop `name` from the state
    Remove { name: String },
    /// Nothing to change (unsupported control)
    Unchanged,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Replace the tokens for `name`. An empty token list removes the entry.
    pub fn set<N, I, T>(&mut self, name: N, tokens: I)
    where
        N: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let name = name.into();
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        if tokens.is_empty() {
            self.entries.remove(&name);
        } else {
            self.entries.insert(name, tokens);
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries.remove(name)
    }

    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Set { name, tokens } => self.set(name, tokens),
            FilterUpdate::Remove { name } => {
                self.remove(&name);
            }
            FilterUpdate::Unchanged => {}
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, tokens)| (name.as_str(), tokens.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N, T> FromIterator<(N, Vec<T>)> for FilterState
where
    N: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, Vec<T>)>>(iter: I) -> Self {
        let mut state = FilterState::new();
        for (name, tokens) in iter {
            state.set(name, tokens);
        }
        state
    }
}
