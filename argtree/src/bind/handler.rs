//! Caller-registered conversion overrides, keyed by flag name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::Value;
use crate::error::BindError;

type HandlerFn = dyn Fn(&str, &mut dyn Value) -> Result<(), BindError> + Send + Sync;

/// Replaces default conversion for one flag.
///
/// The handler receives the raw string and the destination; it decides
/// whether and how to store the value.
///
/// # Examples
///
/// ```rust
/// use argtree::BindError;
/// use argtree::bind::Handler;
///
/// // Accept only even integers.
/// let even = Handler::new(|raw, value| {
///     let n: i64 = raw.parse().map_err(|_| BindError::InvalidInteger { value: raw.to_owned() })?;
///     if n % 2 != 0 {
///         return Err(BindError::custom(format!("{n} is odd")));
///     }
///     value.bind(raw)
/// });
/// # let _ = even;
/// ```
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Wraps a conversion closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &mut dyn Value) -> Result<(), BindError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Runs the handler.
    ///
    /// # Errors
    ///
    /// Propagates whatever the handler returns.
    pub fn apply(&self, raw: &str, value: &mut dyn Value) -> Result<(), BindError> {
        (self.0)(raw, value)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// Builds a handler accepting only the listed values.
///
/// Accepted values are bound with the destination's default conversion;
/// anything else fails with [`BindError::InvalidChoice`].
///
/// # Examples
///
/// ```rust
/// use argtree::BindError;
/// use argtree::bind::choice;
///
/// let format = choice(["json", "yaml"]);
/// let mut out = String::new();
/// assert!(format.apply("json", &mut out).is_ok());
/// assert!(matches!(
///     format.apply("xml", &mut out),
///     Err(BindError::InvalidChoice { .. })
/// ));
/// ```
pub fn choice<I, S>(choices: I) -> Handler
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allowed: Vec<String> = choices.into_iter().map(Into::into).collect();
    Handler::new(move |raw, value| {
        if allowed.iter().any(|candidate| candidate == raw) {
            value.bind(raw)
        } else {
            Err(BindError::InvalidChoice {
                value: raw.to_owned(),
                choices: allowed.clone(),
            })
        }
    })
}

/// Registry of handlers by flag name.
#[derive(Debug, Clone, Default)]
pub struct Handlers {
    by_flag: BTreeMap<String, Handler>,
}

impl Handlers {
    /// Registers `handler` for `flag`, replacing any previous one.
    pub fn insert(&mut self, flag: impl Into<String>, handler: Handler) {
        self.by_flag.insert(flag.into(), handler);
    }

    /// Handler registered for `flag`.
    #[must_use]
    pub fn get(&self, flag: &str) -> Option<&Handler> {
        self.by_flag.get(flag)
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_flag.is_empty()
    }
}
