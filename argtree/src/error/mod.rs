//! Error types produced while building, parsing, binding and dispatching.

mod types;

pub use types::{BindError, BoxError, CliError, CliResult, ConfigurationError, Stage};

#[cfg(test)]
mod tests;
