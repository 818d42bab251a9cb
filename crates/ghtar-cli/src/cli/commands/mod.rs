//! CLI command handlers.

mod fetch;

pub use fetch::run_fetch;

#[cfg(test)]
pub(crate) use fetch::fetch_with;
