//! Data-value access and output formatting.
//!
//! Dynamic elements pull from the caller's data through dotted paths
//! (`user.profile.email`, `items.0.name`) and turn the resolved value into
//! text either with the plain display rules or through a numeric format
//! specifier (`N2`, `F0`, `D4`, `X8`).

use serde_json::Value;

/// Resolves a dotted path in a data value.
///
/// Supports object keys and numeric array indices. Returns `None` when any
/// segment is missing or the current value cannot be indexed.
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for part in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(arr) => {
                let index: usize = part.parse().ok()?;
                arr.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Turns a data value into output text with no format specifier.
///
/// Strings render bare (no quotes), null renders empty, and composite
/// values fall back to their JSON representation.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// A parsed numeric format specifier.
///
/// The closed set of specifiers the `format` attribute accepts:
///
/// | Specifier | Meaning |
/// |-----------|---------|
/// | `N<d>` | `d` decimal places with thousands grouping (default 2) |
/// | `F<d>` | `d` fixed decimal places, no grouping (default 2) |
/// | `D<d>` | integer, zero-padded to `d` digits |
/// | `X<d>` / `x<d>` | upper/lowercase hexadecimal, zero-padded to `d` digits |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// Grouped decimal: `N2` renders `1234.5` as `1,234.50`.
    Number(usize),
    /// Fixed decimal: `F2` renders `1234.5` as `1234.50`.
    Fixed(usize),
    /// Zero-padded integer: `D4` renders `42` as `0042`.
    Decimal(usize),
    /// Uppercase hex: `X4` renders `255` as `00FF`.
    HexUpper(usize),
    /// Lowercase hex: `x4` renders `255` as `00ff`.
    HexLower(usize),
}

impl NumberFormat {
    /// Parses a format specifier, `None` when unrecognized.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut chars = spec.chars();
        let letter = chars.next()?;
        let digits = chars.as_str();
        if !digits.is_empty() && !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let width = |default: usize| {
            if digits.is_empty() {
                Some(default)
            } else {
                digits.parse().ok()
            }
        };
        match letter {
            'N' | 'n' => Some(NumberFormat::Number(width(2)?)),
            'F' | 'f' => Some(NumberFormat::Fixed(width(2)?)),
            'D' | 'd' => Some(NumberFormat::Decimal(width(1)?)),
            'X' => Some(NumberFormat::HexUpper(width(1)?)),
            'x' => Some(NumberFormat::HexLower(width(1)?)),
            _ => None,
        }
    }

    /// Applies this format to a data value.
    ///
    /// Non-numeric values fall back to the plain display rules; a format
    /// specifier describes how to render a number, not a constraint on the
    /// data.
    pub fn apply(&self, value: &Value) -> String {
        let Value::Number(number) = value else {
            return display(value);
        };
        match *self {
            NumberFormat::Number(places) => match number.as_f64() {
                Some(n) => group_thousands(&format!("{:.*}", places, n)),
                None => number.to_string(),
            },
            NumberFormat::Fixed(places) => match number.as_f64() {
                Some(n) => format!("{:.*}", places, n),
                None => number.to_string(),
            },
            NumberFormat::Decimal(width) => match number.as_i64() {
                Some(n) if n < 0 => format!("-{:0>width$}", n.unsigned_abs(), width = width),
                Some(n) => format!("{:0>width$}", n, width = width),
                None => number.to_string(),
            },
            NumberFormat::HexUpper(width) => match number.as_i64() {
                Some(n) => format!("{:0>width$X}", n, width = width),
                None => number.to_string(),
            },
            NumberFormat::HexLower(width) => match number.as_i64() {
                Some(n) => format!("{:0>width$x}", n, width = width),
                None => number.to_string(),
            },
        }
    }
}

/// Inserts `,` thousands separators into the integer portion of an
/// already-formatted decimal string.
fn group_thousands(formatted: &str) -> String {
    let (number, fraction) = match formatted.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (formatted, None),
    };
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };

    let mut grouped = String::with_capacity(formatted.len() + digits.len() / 3);
    grouped.push_str(sign);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i % 3) == offset % 3 && i >= offset {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = fraction {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
