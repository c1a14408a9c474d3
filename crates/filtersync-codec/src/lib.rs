//! FilterSync Codec
//!
//! Converts between a page's query string and a `FilterState`.
//!
//! Wire format: one parameter per filter name, its tokens joined by a single
//! space (`color=red+blue` once form-encoded). Parameters whose name is not a
//! registered filter are dropped on parse and left untouched on write.

mod codec;
mod query;

pub use codec::{join_tokens, parse, serialize, serialize_one, split_tokens, TOKEN_SEPARATOR};
pub use query::{QueryEdit, QueryString};
