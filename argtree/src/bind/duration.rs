//! Duration literals: a sequence of `<number><unit>` terms such as `1h30m`.

use std::time::Duration;

use crate::error::BindError;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Fractional digits beyond this precision cannot contribute a nanosecond.
const MAX_FRACTION_DIGITS: usize = 18;

fn unit_scale(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

fn split_digits(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    input.split_at(end)
}

/// Nanoseconds contributed by `.digits` of one `scale`-sized unit.
fn fraction_nanos(digits: &str, scale: u128) -> Option<u128> {
    let kept = digits.get(..MAX_FRACTION_DIGITS).unwrap_or(digits);
    if kept.is_empty() {
        return Some(0);
    }
    let numerator: u128 = kept.parse().ok()?;
    let exponent = u32::try_from(kept.len()).ok()?;
    let denominator = 10_u128.checked_pow(exponent)?;
    numerator.checked_mul(scale)?.checked_div(denominator)
}

fn parse_terms(mut rest: &str) -> Option<u128> {
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = split_digits(rest);
        let (fraction, after_number) = after_whole
            .strip_prefix('.')
            .map_or(("", after_whole), split_digits);
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        let unit_end = after_number
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_number.len());
        let (unit, next) = after_number.split_at(unit_end);
        let scale = unit_scale(unit)?;

        let whole_value: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        total = total
            .checked_add(whole_value.checked_mul(scale)?)?
            .checked_add(fraction_nanos(fraction, scale)?)?;
        rest = next;
    }
    Some(total)
}

/// Parses a duration literal.
///
/// Accepted units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`; terms may
/// carry a decimal fraction and are summed. A bare `0` is accepted without a
/// unit. A leading `+` is ignored.
///
/// # Errors
///
/// Returns [`BindError::InvalidDuration`] for malformed input, unknown units,
/// negative values, or durations beyond `u64` nanoseconds.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use argtree::bind::parse_duration;
///
/// assert_eq!(parse_duration("1h30m"), Ok(Duration::from_secs(5_400)));
/// assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1_500)));
/// assert!(parse_duration("5 parsecs").is_err());
/// ```
pub fn parse_duration(raw: &str) -> Result<Duration, BindError> {
    let invalid = || BindError::InvalidDuration {
        value: raw.to_owned(),
    };
    let body = raw.strip_prefix('+').unwrap_or(raw);
    if body == "0" {
        return Ok(Duration::ZERO);
    }
    if body.is_empty() {
        return Err(invalid());
    }
    let nanos = parse_terms(body).ok_or_else(invalid)?;
    let nanos = u64::try_from(nanos).map_err(|_| invalid())?;
    Ok(Duration::from_nanos(nanos))
}
