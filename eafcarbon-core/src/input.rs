//! Coercion of free-form numeric text from input fields.
//!
//! Input fields hand over whatever text the user typed. Coercion never fails:
//! the longest leading decimal number is used, and anything without one
//! becomes 0.
//!
//! | Text | Value |
//! |------|-------|
//! | `"12.5"` | 12.5 |
//! | `" 40 kg"` | 40 |
//! | `"1e3"` | 1000 |
//! | `".5"` | 0.5 |
//! | `""`, `"abc"`, `"-"` | 0 |

use crate::FloatValue;

/// Coerces input text to a finite float, defaulting to 0.
pub fn coerce_numeric(text: &str) -> FloatValue {
    let text = text.trim_start();
    let end = numeric_prefix_len(text.as_bytes());
    match text[..end].parse::<FloatValue>() {
        // Normalises -0 as well as overflow to infinity
        Ok(value) if value.is_finite() && value != 0.0 => value,
        _ => 0.0,
    }
}

/// Length of the longest prefix shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer = digits_from(end);
    end += integer;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if integer > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if integer == 0 && fraction == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_start = end + 1;
        if matches!(bytes.get(exponent_start), Some(b'+' | b'-')) {
            exponent_start += 1;
        }
        let exponent = digits_from(exponent_start.min(bytes.len()));
        if exponent > 0 {
            end = exponent_start + exponent;
        }
    }
    end
}
