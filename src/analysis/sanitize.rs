//! Coercion of untrusted JSON fields into numbers, flags and identifiers.
//!
//! Stored match records are written by a browser script, so the rules here
//! mirror script-style `Number()`, truthiness and `String()` conversions.
//! Nothing in this module fails: invalid input degrades to NaN, `false` or a
//! fallback value.

use serde_json::{Number, Value};

/// Coerce a field to a number the way `Number(value)` does.
///
/// An absent field is NaN, `null` is 0, booleans are 1/0 and strings are
/// parsed after trimming (the empty string is 0).
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => number_value(n),
        Some(Value::String(s)) => parse_numeric_str(s),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [Value::Null] => 0.0,
            [single @ (Value::Number(_) | Value::String(_) | Value::Array(_))] => {
                to_number(Some(single))
            }
            _ => f64::NAN,
        },
        Some(Value::Object(_)) => f64::NAN,
    }
}

/// Numbers are kept as their source text, so out-of-range literals such as
/// `1e400` still arrive here and become infinite.
fn number_value(n: &Number) -> f64 {
    n.as_f64()
        .unwrap_or_else(|| parse_numeric_str(&n.to_string()))
}

fn parse_numeric_str(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.starts_with(['+', '-']) {
            return f64::NAN;
        }
        return u64::from_str_radix(digits, radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    let (negative, body) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if body == "Infinity" {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // Rust also accepts "inf" and "nan", which are not numeric literals here.
    let literal_chars = body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !literal_chars {
        return f64::NAN;
    }

    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Truthiness of a field: `false`, 0, NaN, `""`, `null` and absent are falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => {
            let f = number_value(n);
            f != 0.0 && !f.is_nan()
        }
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Coerce an identifier field to the string it would compare as.
pub fn to_id_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_to_string(number_value(n)),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_id_string(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// Script-style number formatting: shortest round-trip digits, plain
/// notation for decimal exponents in `[-7, 21)`, `1e+21` style beyond that.
pub fn number_to_string(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f < 0.0 { "-Infinity" } else { "Infinity" }.to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }

    let sign = if f < 0.0 { "-" } else { "" };
    // `{:e}` yields the shortest digits that round-trip, e.g. "1.2345e-7".
    let sci = format!("{:e}", f.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp + 1;

    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        format!("{}.{}", &digits[..n as usize], &digits[n as usize..])
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let exp_sign = if n - 1 < 0 { "-" } else { "+" };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", lead, exp_sign, (n - 1).abs())
        } else {
            format!("{}.{}e{}{}", lead, rest, exp_sign, (n - 1).abs())
        }
    };

    format!("{}{}", sign, body)
}

/// Return `v` when finite, otherwise the fallback (or 0 when the fallback is
/// itself falsy).
pub fn safe_num(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else if fallback != 0.0 && !fallback.is_nan() {
        fallback
    } else {
        0.0
    }
}

/// Default-then-clamp: a non-finite `v` becomes `min` (0 when `min` is falsy)
/// and the result is bounded to `[min, max]`.
pub fn clamp(v: f64, min: f64, max: f64) -> f64 {
    let v = safe_num(v, min);
    if v < min {
        min
    } else if v > max {
        max
    } else {
        v
    }
}

/// [`clamp`] applied to a raw record field.
pub fn clamp_field(value: Option<&Value>, min: f64, max: f64) -> f64 {
    clamp(to_number(value), min, max)
}

/// Round to the nearest integer with halves going up.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Format with exactly one decimal place, rounding half-up at the tenths digit.
pub fn fmt1(x: f64) -> String {
    let rounded = round_half_up(x * 10.0) / 10.0;
    format!("{:.1}", rounded + 0.0)
}
