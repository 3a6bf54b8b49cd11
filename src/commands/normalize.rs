use smol_str::SmolStr;

/// A command value slot that may be supplied as text or as an opaque byte
/// buffer. Shorthand constructors accept `impl Into<Data>` for any slot the
/// spec calls out as accepting either shape (spec.md §4.1): a binary buffer
/// becomes a payload-backed placeholder, text goes directly into the
/// argument list untouched.
#[derive(Debug, Clone)]
pub enum Data {
    Text(SmolStr),
    Bytes(Vec<u8>),
}

impl From<&str> for Data {
    fn from(s: &str) -> Self {
        Data::Text(SmolStr::from(s))
    }
}
impl From<String> for Data {
    fn from(s: String) -> Self {
        Data::Text(SmolStr::from(s))
    }
}
impl From<&String> for Data {
    fn from(s: &String) -> Self {
        Data::Text(SmolStr::from(s.as_str()))
    }
}
impl From<Vec<u8>> for Data {
    fn from(b: Vec<u8>) -> Self {
        Data::Bytes(b)
    }
}
impl From<&[u8]> for Data {
    fn from(b: &[u8]) -> Self {
        Data::Bytes(b.to_vec())
    }
}
impl From<i64> for Data {
    fn from(n: i64) -> Self {
        Data::Text(SmolStr::from(stringify_int(n)))
    }
}
impl From<f64> for Data {
    fn from(n: f64) -> Self {
        Data::Text(SmolStr::from(stringify_float(n)))
    }
}

/// Shortest round-trippable decimal form of an integer: `-5` → `"-5"`.
pub(crate) fn stringify_int(n: i64) -> String {
    n.to_string()
}

/// Shortest round-trippable decimal form of a float, per spec.md §4.1:
/// `0.1` → `"0.1"`, `5000.0` → `"5000"`. Rust's `Display` for `f64` already
/// produces the shortest representation and omits a trailing `.0` for
/// integral values, which matches the rule directly.
pub(crate) fn stringify_float(n: f64) -> String {
    format!("{n}")
}

/// A point in time used where the spec calls for a UNIX timestamp
/// (`EXPIREAT`, `PEXPIREAT`; spec.md §4.1). Constructed from seconds since
/// the epoch; `EXPIREAT` takes it as whole seconds, `PEXPIREAT` takes it
/// scaled by 1000 per the normalization table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnixTime {
    seconds: f64,
}

impl UnixTime {
    pub fn from_unix_seconds(seconds: f64) -> Self {
        UnixTime { seconds }
    }

    pub(crate) fn as_expireat_seconds(&self) -> String {
        stringify_int(self.seconds.round() as i64)
    }

    pub(crate) fn as_pexpireat_units(&self) -> String {
        stringify_int((self.seconds * 1000.0).round() as i64)
    }
}
