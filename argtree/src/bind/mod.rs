//! Type-directed conversion of raw strings onto destination fields.
//!
//! Every bindable field type implements [`Value`]. The binder never holds a
//! reference into a command struct beyond a single call: the application
//! resolves a field handle, binds, and lets the borrow go.

mod duration;
mod handler;

use std::time::Duration;

pub use duration::parse_duration;
pub use handler::{Handler, Handlers, choice};

use crate::error::BindError;

/// Shape of a bindable destination, as seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Any string.
    Text,
    /// Base-10 integer.
    Integer,
    /// Decimal floating point.
    Float,
    /// Boolean; present-without-value means `true`.
    Bool,
    /// Duration literal.
    Duration,
    /// List of strings; each bound value is appended.
    List,
}

impl ValueKind {
    /// Whether a flag of this kind needs no explicit value token.
    #[must_use]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Whether values accumulate instead of replacing.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::List)
    }

    /// Placeholder shown in help output.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Text | Self::List => "string",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Duration => "duration",
        }
    }
}

/// A destination field that accepts raw command-line strings.
pub trait Value {
    /// Shape of the destination.
    fn kind(&self) -> ValueKind;

    /// Converts `raw` and stores it.
    ///
    /// # Errors
    ///
    /// Returns the [`BindError`] variant matching the destination kind when
    /// `raw` cannot be converted.
    fn bind(&mut self, raw: &str) -> Result<(), BindError>;

    /// Returns the destination to its absent state before a binding cycle.
    ///
    /// Types without an absent state keep the default no-op.
    fn reset(&mut self) {}
}

impl Value for String {
    fn kind(&self) -> ValueKind {
        ValueKind::Text
    }

    fn bind(&mut self, raw: &str) -> Result<(), BindError> {
        raw.clone_into(self);
        Ok(())
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl Value for Vec<String> {
    fn kind(&self) -> ValueKind {
        ValueKind::List
    }

    fn bind(&mut self, raw: &str) -> Result<(), BindError> {
        self.push(raw.to_owned());
        Ok(())
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl Value for bool {
    fn kind(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn bind(&mut self, raw: &str) -> Result<(), BindError> {
        *self = parse_bool(raw)?;
        Ok(())
    }

    fn reset(&mut self) {
        *self = false;
    }
}

impl Value for Duration {
    fn kind(&self) -> ValueKind {
        ValueKind::Duration
    }

    fn bind(&mut self, raw: &str) -> Result<(), BindError> {
        *self = parse_duration(raw)?;
        Ok(())
    }

    fn reset(&mut self) {
        *self = Self::ZERO;
    }
}

macro_rules! integer_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Value for $ty {
                fn kind(&self) -> ValueKind {
                    ValueKind::Integer
                }

                fn bind(&mut self, raw: &str) -> Result<(), BindError> {
                    *self = raw.parse().map_err(|_| BindError::InvalidInteger {
                        value: raw.to_owned(),
                    })?;
                    Ok(())
                }

                fn reset(&mut self) {
                    *self = 0;
                }
            }
        )*
    };
}

integer_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Value for $ty {
                fn kind(&self) -> ValueKind {
                    ValueKind::Float
                }

                fn bind(&mut self, raw: &str) -> Result<(), BindError> {
                    *self = raw.parse().map_err(|_| BindError::InvalidFloat {
                        value: raw.to_owned(),
                    })?;
                    Ok(())
                }

                fn reset(&mut self) {
                    *self = 0.0;
                }
            }
        )*
    };
}

float_value!(f32, f64);

impl<T: Value + Default> Value for Option<T> {
    fn kind(&self) -> ValueKind {
        self.as_ref()
            .map_or_else(|| T::default().kind(), Value::kind)
    }

    fn bind(&mut self, raw: &str) -> Result<(), BindError> {
        self.get_or_insert_with(T::default).bind(raw)
    }

    fn reset(&mut self) {
        *self = None;
    }
}

const TRUTHY: &[&str] = &[
    "1", "t", "T", "true", "TRUE", "True", "yes", "Yes", "YES", "on", "ON",
];
const FALSY: &[&str] = &[
    "0", "f", "F", "false", "FALSE", "False", "no", "No", "NO", "off", "OFF",
];

/// Parses a boolean from the extended truthy/falsy token sets.
///
/// # Errors
///
/// Returns [`BindError::InvalidBoolean`] for any other input.
///
/// # Examples
///
/// ```rust
/// use argtree::bind::parse_bool;
///
/// assert_eq!(parse_bool("yes"), Ok(true));
/// assert_eq!(parse_bool("OFF"), Ok(false));
/// assert!(parse_bool("maybe").is_err());
/// ```
pub fn parse_bool(raw: &str) -> Result<bool, BindError> {
    if TRUTHY.contains(&raw) {
        Ok(true)
    } else if FALSY.contains(&raw) {
        Ok(false)
    } else {
        Err(BindError::InvalidBoolean {
            value: raw.to_owned(),
        })
    }
}

/// Binds `raw` onto `value`, through `handler` when one is registered.
///
/// # Errors
///
/// Propagates the conversion or handler failure.
pub fn bind_value(
    value: &mut dyn Value,
    raw: &str,
    handler: Option<&Handler>,
) -> Result<(), BindError> {
    if let Some(handler) = handler {
        return handler.apply(raw, value);
    }
    value.bind(raw)
}
