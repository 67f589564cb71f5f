//! printf-style message formatting
//!
//! Messages throughout the workspace (invariant failures, public error
//! messages, log lines built for humans) use Node's `util.format` directive
//! syntax so that message templates stay readable:
//!
//! | Directive | Conversion |
//! |-----------|------------|
//! | `%s` | string coercion |
//! | `%d` | number coercion |
//! | `%j` | JSON |
//! | `%o` | JSON for arrays, string coercion otherwise |
//! | `%%` | a literal `%` |
//!
//! Arguments are [`serde_json::Value`]s. String coercion follows JavaScript
//! rules, so objects render as `[object Object]` and arrays are comma-joined.
//! Arguments left over after every directive is consumed are appended,
//! separated by spaces.
//!
//! ```
//! use workers_utils_common::util_format;
//!
//! let message = util_format!("Key `%s` must be zero or a power of %d", "3", 2);
//! assert_eq!(message, "Key `3` must be zero or a power of 2");
//! ```

use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
// expect_used: the pattern is a compile-time constant
static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(%?)(%([ojds]))").expect("directive pattern is valid"));

/// Format `fmt` with `args`, see the [module docs](self).
pub fn util_format(fmt: &str, args: &[Value]) -> String {
    let mut queue: VecDeque<Slot> = args.iter().cloned().map(Slot::Json).collect();
    let mut out = fmt.to_string();

    if !queue.is_empty() {
        out = DIRECTIVE
            .replace_all(fmt, |caps: &Captures<'_>| {
                let arg = queue.pop_front().unwrap_or(Slot::Undefined);
                let converted = match &caps[3] {
                    "s" => Slot::Str(arg.coerce_string()),
                    "d" => Slot::Num(arg.coerce_number()),
                    "j" => arg.stringify(),
                    // "o": only arrays get special treatment
                    _ if matches!(arg, Slot::Json(Value::Array(_))) => arg.stringify(),
                    _ => arg,
                };

                if caps[1].is_empty() {
                    converted.coerce_string()
                } else {
                    queue.push_front(converted);
                    caps[0].to_string()
                }
            })
            .into_owned();
    }

    if !queue.is_empty() {
        let rest: Vec<String> = queue.iter().map(Slot::join_string).collect();
        out.push(' ');
        out.push_str(&rest.join(" "));
    }

    out.replace("%%", "%")
}

/// Formats a message from a template and any number of JSON-convertible
/// arguments.
#[macro_export]
macro_rules! util_format {
    ($fmt:expr $(,)?) => {
        $crate::format::util_format($fmt, &[])
    };
    ($fmt:expr, $($arg:expr),+ $(,)?) => {
        $crate::format::util_format($fmt, &[$($crate::__serde_json::json!($arg)),+])
    };
}

/// JavaScript `String(value)` for a JSON value.
pub fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(u)) => u.to_string(),
            _ => js_number_string(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// JavaScript `String(number)`.
#[allow(clippy::float_cmp)]
pub fn js_number_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        // -0 prints as 0
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        js_exponent_string(n)
    } else if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// Exponent form as JavaScript prints it: `1e+21`, `1.5e-7`
fn js_exponent_string(n: f64) -> String {
    let formatted = format!("{n:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{mantissa}e{exp}"),
        Some((mantissa, exp)) => format!("{mantissa}e+{exp}"),
        None => formatted,
    }
}

/// JavaScript `Number(value)` for a JSON value.
pub fn js_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_js_number(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => parse_js_number(&js_string(single)),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

fn parse_js_number(s: &str) -> f64 {
    let trimmed = s.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts "inf" and "nan", JavaScript does not
        _ if trimmed.chars().any(char::is_alphabetic)
            && !trimmed.contains(['e', 'E']) =>
        {
            f64::NAN
        }
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

/// An argument as it moves through the formatter. Conversions can turn a
/// JSON value into a bare string or number, and a missing argument is
/// distinct from `null`.
#[derive(Debug, Clone)]
enum Slot {
    Undefined,
    Json(Value),
    Str(String),
    Num(f64),
}

impl Slot {
    fn coerce_string(&self) -> String {
        match self {
            Self::Undefined => "undefined".to_string(),
            Self::Json(value) => js_string(value),
            Self::Str(s) => s.clone(),
            Self::Num(n) => js_number_string(*n),
        }
    }

    fn coerce_number(&self) -> f64 {
        match self {
            Self::Undefined => f64::NAN,
            Self::Json(value) => js_number(value),
            Self::Str(s) => parse_js_number(s),
            Self::Num(n) => *n,
        }
    }

    fn stringify(&self) -> Self {
        match self {
            Self::Undefined => Self::Undefined,
            Self::Json(value) => Self::Str(value.to_string()),
            Self::Str(s) => Self::Str(Value::String(s.clone()).to_string()),
            Self::Num(n) if n.is_finite() => Self::Str(js_number_string(*n)),
            Self::Num(_) => Self::Str("null".to_string()),
        }
    }

    /// `Array.prototype.join` renders `null` and `undefined` as empty strings.
    fn join_string(&self) -> String {
        match self {
            Self::Undefined | Self::Json(Value::Null) => String::new(),
            other => other.coerce_string(),
        }
    }
}
