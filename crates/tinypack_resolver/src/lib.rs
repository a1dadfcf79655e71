// Resolves import specifiers to concrete files: extension inference,
// directory index fallback and node_modules package lookup.

mod package_json;
mod resolver;

pub use crate::resolver::{ResolveError, ResolveReturn, Resolver};
