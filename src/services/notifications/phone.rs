//! Canonicalization of citizen phone numbers into WhatsApp targets.

use std::fmt;

use serde::Serialize;

/// Indonesian country calling code every target starts with
pub const COUNTRY_PREFIX: &str = "62";

/// Subscriber digits after `62` for a number that looks dialable
const PLAUSIBLE_SUBSCRIBER_DIGITS: std::ops::RangeInclusive<usize> = 9..=13;

/// A destination accepted by the gateway: `62` followed by digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedAddress(String);

impl NormalizedAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the subscriber part has a realistic length.
    ///
    /// Normalization never rejects input, so `"abc"` still becomes `"62"`;
    /// callers use this to flag such targets in logs.
    pub fn is_plausible(&self) -> bool {
        PLAUSIBLE_SUBSCRIBER_DIGITS.contains(&(self.0.len() - COUNTRY_PREFIX.len()))
    }
}

impl fmt::Display for NormalizedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a free-form phone number.
///
/// 1. keep ASCII digits only
/// 2. a leading `0` (local trunk prefix) is replaced by `62`
/// 3. anything still not starting with `62` gets `62` prepended
///
/// Never fails and is idempotent.
///
/// ```
/// use kelurahan::services::notifications::normalize_phone;
///
/// assert_eq!(normalize_phone("0812-3456-789").as_str(), "628123456789");
/// assert_eq!(normalize_phone("+62 812 3456 789").as_str(), "628123456789");
/// ```
pub fn normalize_phone(raw: &str) -> NormalizedAddress {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    let digits = match digits.strip_prefix('0') {
        Some(rest) => format!("{}{}", COUNTRY_PREFIX, rest),
        None => digits,
    };

    if digits.starts_with(COUNTRY_PREFIX) {
        NormalizedAddress(digits)
    } else {
        NormalizedAddress(format!("{}{}", COUNTRY_PREFIX, digits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_common_spellings_collapse_to_one_target() {
        for raw in ["08123456789", "+628123456789", "8123456789", "628123456789"] {
            assert_eq!(normalize_phone(raw).as_str(), "628123456789", "input {raw}");
        }
    }

    #[test]
    fn test_separators_are_stripped() {
        assert_eq!(normalize_phone("(0812) 3456-7890").as_str(), "6281234567890");
    }

    #[test]
    fn test_garbage_input_still_yields_prefix() {
        let address = normalize_phone("not a number");
        assert_eq!(address.as_str(), "62");
        assert!(!address.is_plausible());
    }

    #[test]
    fn test_only_first_zero_is_replaced() {
        assert_eq!(normalize_phone("00812").as_str(), "620812");
    }

    #[test]
    fn test_non_ascii_digits_are_dropped() {
        assert_eq!(normalize_phone("٠٨١٢3").as_str(), "623");
    }

    #[test]
    fn test_plausibility_bounds() {
        assert!(normalize_phone("0812345678").is_plausible());
        assert!(normalize_phone("08123456789012").is_plausible());
        assert!(!normalize_phone("08123456").is_plausible());
        assert!(!normalize_phone("081234567890123").is_plausible());
    }

    proptest! {
        #[test]
        fn prop_output_is_prefixed_digits(raw in ".{0,40}") {
            let address = normalize_phone(&raw);
            prop_assert!(address.as_str().starts_with(COUNTRY_PREFIX));
            prop_assert!(address.as_str().chars().all(|c| c.is_ascii_digit()));
        }

        #[test]
        fn prop_normalization_is_idempotent(raw in "[-+() 0-9a-z]{0,24}") {
            let once = normalize_phone(&raw);
            let twice = normalize_phone(once.as_str());
            prop_assert_eq!(once, twice);
        }
    }
}
