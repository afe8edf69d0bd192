//! Guards for mutating process environment variables in tests.
//!
//! Every mutation takes a global re-entrant lock and returns a guard that
//! restores the previous value on drop. Guards for the same key restore in
//! LIFO order. Hold [`lock`] or an [`EnvScope`] when a test reads the
//! environment across several steps.
//!
//! # Examples
//!
//! ```
//! use argtree_test_helpers::env;
//!
//! let _guard = env::set_var("ARGTREE_DOC_KEY", "value");
//! assert_eq!(std::env::var("ARGTREE_DOC_KEY").as_deref(), Ok("value"));
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_LOCK: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Restores one variable to its prior state when dropped.
#[must_use = "dropping restores the prior value"]
pub struct EnvGuard {
    key: String,
    previous: Option<OsString>,
}

impl fmt::Debug for EnvGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvGuard")
            .field("key", &self.key)
            .field("was_set", &self.previous.is_some())
            .finish()
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        let _lock = ENV_LOCK.lock();
        match self.previous.take() {
            // SAFETY: mutations are serialised by `ENV_LOCK`.
            Some(value) => unsafe { env::set_var(&self.key, value) },
            // SAFETY: mutations are serialised by `ENV_LOCK`.
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

fn mutate(key: String, apply: impl FnOnce(&str)) -> EnvGuard {
    let _lock = ENV_LOCK.lock();
    let previous = env::var_os(&key);
    apply(&key);
    EnvGuard { key, previous }
}

/// Sets `key` to `value` until the guard drops.
pub fn set_var(key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvGuard {
    // SAFETY: `mutate` holds `ENV_LOCK` while the closure runs.
    mutate(key.into(), |key| unsafe { env::set_var(key, value.as_ref()) })
}

/// Unsets `key` until the guard drops.
pub fn remove_var(key: impl Into<String>) -> EnvGuard {
    // SAFETY: `mutate` holds `ENV_LOCK` while the closure runs.
    mutate(key.into(), |key| unsafe { env::remove_var(key) })
}

/// Exclusive access to the environment for the guard's lifetime.
#[must_use = "dropping releases the environment lock"]
pub struct EnvLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

/// Takes the environment lock. Re-entrant on the same thread, so the
/// mutation helpers keep working while it is held.
pub fn lock() -> EnvLock {
    EnvLock {
        _guard: ENV_LOCK.lock(),
    }
}

/// A set of guards applied and restored under one held lock.
///
/// Guards drop before the lock is released.
#[must_use = "dropping restores every variable and releases the lock"]
pub struct EnvScope {
    guards: Vec<EnvGuard>,
    _lock: EnvLock,
}

/// Applies each `(key, value)` pair, unsetting keys mapped to `None`.
///
/// # Examples
///
/// ```
/// use argtree_test_helpers::env;
///
/// let _scope = env::scope([("ARGTREE_DOC_A", Some("1")), ("ARGTREE_DOC_B", None)]);
/// assert_eq!(std::env::var("ARGTREE_DOC_A").as_deref(), Ok("1"));
/// assert!(std::env::var("ARGTREE_DOC_B").is_err());
/// ```
pub fn scope<I, K, V>(vars: I) -> EnvScope
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: Into<String>,
    V: AsRef<OsStr>,
{
    let held = lock();
    let guards = vars
        .into_iter()
        .map(|(key, value)| match value {
            Some(value) => set_var(key, value),
            None => remove_var(key),
        })
        .collect();
    EnvScope {
        guards,
        _lock: held,
    }
}

impl EnvScope {
    /// Number of variables the scope restores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether the scope restores nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}
