/*!
 * Argument and decoded-value sum types
 *
 * `Arg` is the two-arm variant backing a [`crate::request::Request`]'s
 * argument list: plain text, or the reserved placeholder that stands in for
 * one payload segment at encode time. `Value` is the six-arm variant the
 * reply decoder produces.
 */

use smol_str::SmolStr;
use std::fmt;

/// One element of a request's argument list.
///
/// `Placeholder` is a zero-sized variant rather than a reserved string: a
/// caller can legitimately pass any text (including something that looks
/// like a sentinel) as a real argument, so the placeholder must be
/// distinguishable by variant, not by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// A literal argument, already stringified (see the numeric
    /// normalization rules on [`crate::request::Request`]'s shorthand
    /// constructors).
    Text(SmolStr),
    /// Consumes the next CRLF-separated segment of the request's payload
    /// when the request is encoded.
    Placeholder,
}

impl Arg {
    /// Shorthand for `Arg::Text` from anything stringifiable.
    pub fn text(s: impl Into<SmolStr>) -> Self {
        Arg::Text(s.into())
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(SmolStr::from(s))
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Text(SmolStr::from(s))
    }
}

/// The reserved placeholder token, usable directly in argument-list
/// literals, e.g. `vec!["hoge".into(), PLACEHOLDER, "EX".into()]`.
pub const PLACEHOLDER: Arg = Arg::Placeholder;

/// A decoded reply value, produced by [`crate::codec::decode_reply`].
///
/// Mirrors RESP2's five reply shapes plus the recursive array case; decoding
/// is lossy only in that bulk-string bytes are interpreted as UTF-8 on a
/// best-effort basis for the `Text` variant (see `Value::Bytes` for the
/// byte-exact alternative).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A `+`-sigil simple string.
    Text(String),
    /// A `:`-sigil integer.
    Int(i64),
    /// A `$`-sigil bulk string, kept as raw bytes (no UTF-8 assumption).
    Bytes(Vec<u8>),
    /// A null bulk string (`$-1\r\n`) or null array (`*-1\r\n`).
    Null,
    /// A `-`-sigil error reply, carrying the server's message text.
    Error(String),
    /// A `*`-sigil array, decoded element-by-element with these same rules.
    List(Vec<Value>),
}

impl Value {
    /// True for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for `Value::Error`.
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Best-effort conversion to a UTF-8 string view, for callers that don't
    /// care whether the original reply was a simple string or a bulk
    /// string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Value::Null => write!(f, "(nil)"),
            Value::Error(e) => write!(f, "(error) {e}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}
