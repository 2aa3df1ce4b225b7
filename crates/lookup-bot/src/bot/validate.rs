//! Input shape checks, run before any network call

use crate::error::{BotError, Result};
use regex::Regex;
use std::sync::LazyLock;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[0-9]{10}$").unwrap()
});

/// Accept exactly ten ASCII digits
pub fn phone_number(input: &str) -> Result<&str> {
    if PHONE_RE.is_match(input) {
        Ok(input)
    } else {
        Err(BotError::InvalidInput(format!(
            "expected 10 digits, got {} characters",
            input.chars().count()
        )))
    }
}

/// Accept anything that splits into exactly four dot-separated parts.
///
/// Octets are not checked: `a.b.c.d` and `999.1.1.1` both pass and are left
/// for the upstream to reject.
pub fn ip_address(input: &str) -> Result<&str> {
    if input.split('.').count() == 4 {
        Ok(input)
    } else {
        Err(BotError::InvalidInput(format!(
            "expected 4 dot-separated parts in {input:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_accepts_any_ten_digits() {
        for number in ["0000000000", "9876543210", "1234567890", "5555555555"] {
            assert_eq!(phone_number(number).unwrap(), number);
        }
    }

    #[test]
    fn test_phone_rejects() {
        for input in [
            "",
            "987654321",
            "98765432100",
            "98765 43210",
            "+919876543210",
            "98765432a0",
            " 9876543210",
            "9876543210\n",
            "٩٨٧٦٥٤٣٢١٠",
        ] {
            assert!(
                matches!(phone_number(input), Err(BotError::InvalidInput(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_ip_shape_is_loose() {
        for input in ["8.8.8.8", "a.b.c.d", "999.999.999.999", "..."] {
            assert!(ip_address(input).is_ok(), "rejected {input:?}");
        }
    }

    #[test]
    fn test_ip_rejects_wrong_part_count() {
        for input in ["8.8.8", "8.8.8.8.8", "localhost", "", "2001:db8::1"] {
            assert!(ip_address(input).is_err(), "accepted {input:?}");
        }
    }
}
