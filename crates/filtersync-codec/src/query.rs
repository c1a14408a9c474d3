//! Ordered query parameter list

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

/// One set-or-remove operation on a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEdit {
    Set { name: String, value: String },
    Remove { name: String },
}

/// Decoded query parameters in address order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a form-encoded query, with or without the leading `?`
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    pub fn from_url(url: &Url) -> Self {
        let pairs = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Value of the last occurrence of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// Set `name` to `value`, keeping the position of its first occurrence
    /// and dropping any later duplicates. New names are appended.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.pairs.iter().position(|(k, _)| k == name) {
            Some(first) => {
                self.pairs[first].1 = value.to_string();
                let mut index = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = index <= first || k != name;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.pairs.retain(|(k, _)| k != name);
    }

    pub fn apply(&mut self, edit: &QueryEdit) {
        match edit {
            QueryEdit::Set { name, value } => self.set(name, value),
            QueryEdit::Remove { name } => self.remove(name),
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Form-encoded query without the leading `?`, or `None` when empty
    pub fn to_query(&self) -> Option<String> {
        if self.pairs.is_empty() {
            return None;
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        Some(serializer.finish())
    }

    /// `base` with its query replaced by this one (fragment kept)
    pub fn apply_to(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_query(self.to_query().as_deref());
        url
    }
}

impl std::fmt::Display for QueryString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_query().unwrap_or_default())
    }
}
