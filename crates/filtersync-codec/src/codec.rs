//! Filter state ⇄ query string

use filtersync_model::FilterState;

use crate::query::{QueryEdit, QueryString};

/// Separator between tokens of one filter inside a single parameter value
pub const TOKEN_SEPARATOR: char = ' ';

/// Split a serialized token set. Empty tokens are dropped.
pub fn split_tokens(value: &str) -> Vec<String> {
    value
        .split(TOKEN_SEPARATOR)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_tokens<T: AsRef<str>>(tokens: &[T]) -> String {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build a `FilterState` from query parameters.
///
/// Parameters for which `is_registered` returns false are stale or foreign
/// and are dropped. When a name repeats, the last occurrence wins.
pub fn parse<F>(query: &QueryString, is_registered: F) -> FilterState
where
    F: Fn(&str) -> bool,
{
    let mut state = FilterState::new();
    if query.is_empty() {
        return state;
    }

    for (name, value) in query.pairs() {
        if !is_registered(name) {
            tracing::trace!(name = %name, "Dropping unregistered query parameter");
            continue;
        }
        state.set(name, split_tokens(value));
    }

    state
}

/// Query edit for one filter: set when there are tokens, remove otherwise.
pub fn serialize_one<T: AsRef<str>>(name: &str, tokens: &[T]) -> QueryEdit {
    let value = join_tokens(tokens);
    if value.is_empty() {
        QueryEdit::Remove {
            name: name.to_string(),
        }
    } else {
        QueryEdit::Set {
            name: name.to_string(),
            value,
        }
    }
}

/// One edit per registered filter name, in the order given.
pub fn serialize<'a, I>(state: &FilterState, names: I) -> Vec<QueryEdit>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(|name| match state.get(name) {
            Some(tokens) => serialize_one(name, tokens),
            None => serialize_one::<String>(name, &[]),
        })
        .collect()
}
