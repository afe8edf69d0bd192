//! Translation of help text keys.
//!
//! Keyed-collection entries describe themselves with translation keys of the
//! form `<help prefix>.<key>`. The application's [`Localizer`] resolves them
//! when help is built; unresolved keys are shown verbatim.

use std::collections::BTreeMap;

/// Looks up translated strings by identifier.
pub trait Localizer: Send + Sync {
    /// Translation for `id`, if any.
    fn lookup(&self, id: &str) -> Option<String>;

    /// Translation for `id`, or `fallback` when none exists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argtree::help::{Localizer, NoOpLocalizer};
    ///
    /// assert_eq!(NoOpLocalizer.message("plugins.sync", "fallback"), "fallback");
    /// ```
    fn message(&self, id: &str, fallback: &str) -> String {
        self.lookup(id).unwrap_or_else(|| fallback.to_owned())
    }
}

/// Localizer that never translates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpLocalizer;

impl Localizer for NoOpLocalizer {
    fn lookup(&self, _id: &str) -> Option<String> {
        None
    }
}

/// Localizer backed by an in-memory catalogue.
///
/// # Examples
///
/// ```rust
/// use argtree::help::{Localizer, MapLocalizer};
///
/// let catalogue = MapLocalizer::new().with("plugins.sync", "Synchronise remotes");
/// assert_eq!(catalogue.lookup("plugins.sync").as_deref(), Some("Synchronise remotes"));
/// assert_eq!(catalogue.message("plugins.push", "plugins.push"), "plugins.push");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapLocalizer {
    messages: BTreeMap<String, String>,
}

impl MapLocalizer {
    /// Creates an empty catalogue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: BTreeMap::new(),
        }
    }

    /// Returns the catalogue with `id` translated as `text`.
    #[must_use]
    pub fn with(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.messages.insert(id.into(), text.into());
        self
    }
}

impl Localizer for MapLocalizer {
    fn lookup(&self, id: &str) -> Option<String> {
        self.messages.get(id).cloned()
    }
}
