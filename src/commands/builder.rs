use smol_str::SmolStr;

use crate::request::Request;
use crate::value::Arg;

use super::normalize::Data;

/// Accumulates a command shorthand's `(command, payload, arguments)` shape
/// as its arguments are assembled, keeping each binary value slot as its own
/// tracked payload segment (see [`Request::with_segments`]) behind the
/// scenes so callers never hand-format placeholder bookkeeping themselves
/// — and so a value's own bytes can safely contain `\r\n` without being
/// mistaken for a segment boundary.
///
/// Mirrors the flattening rule for options objects (spec.md §4.1): an
/// option contributes `KEY, VALUE` in iteration order, a boolean-true
/// option contributes only its key, and a boolean-false option contributes
/// nothing.
pub(crate) struct Builder {
    command: SmolStr,
    segments: Vec<Vec<u8>>,
    arguments: Vec<Arg>,
}

impl Builder {
    pub(crate) fn new(command: &'static str) -> Self {
        Builder {
            command: SmolStr::new(command),
            segments: Vec::new(),
            arguments: Vec::new(),
        }
    }

    /// A plain textual argument.
    pub(crate) fn text(mut self, s: impl Into<SmolStr>) -> Self {
        self.arguments.push(Arg::Text(s.into()));
        self
    }

    /// A value slot that may be text or opaque bytes: text goes straight
    /// into `arguments`, bytes become a placeholder backed by a new payload
    /// segment.
    pub(crate) fn data(mut self, d: impl Into<Data>) -> Self {
        match d.into() {
            Data::Text(s) => self.arguments.push(Arg::Text(s)),
            Data::Bytes(b) => {
                self.arguments.push(Arg::Placeholder);
                self.segments.push(b);
            }
        }
        self
    }

    /// Several value slots in sequence, e.g. `MSET`'s `key value key value…`.
    pub(crate) fn data_seq(mut self, values: impl IntoIterator<Item = impl Into<Data>>) -> Self {
        for v in values {
            self = self.data(v);
        }
        self
    }

    /// A textual argument only if `present`; otherwise contributes nothing.
    /// Used for boolean-true-only option flags (e.g. `SET … NX`).
    pub(crate) fn flag(mut self, key: &'static str, present: bool) -> Self {
        if present {
            self.arguments.push(Arg::text(key));
        }
        self
    }

    /// `KEY VALUE` if `value` is `Some`; nothing if `None`. Used for
    /// optional keyed clauses (e.g. `SCAN … MATCH pattern`).
    pub(crate) fn opt(mut self, key: &'static str, value: Option<impl Into<SmolStr>>) -> Self {
        if let Some(v) = value {
            self.arguments.push(Arg::text(key));
            self.arguments.push(Arg::Text(v.into()));
        }
        self
    }

    /// One `GET pattern` pair per entry, in order — the `SORT` `GET` clause
    /// expansion rule (spec.md §4.1).
    pub(crate) fn repeated(
        mut self,
        key: &'static str,
        values: impl IntoIterator<Item = impl Into<SmolStr>>,
    ) -> Self {
        for v in values {
            self.arguments.push(Arg::text(key));
            self.arguments.push(Arg::Text(v.into()));
        }
        self
    }

    /// A bare textual argument list, all at once (varargs or array input
    /// normalize to the same thing by the time they reach the builder).
    pub(crate) fn texts(mut self, values: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        for v in values {
            self.arguments.push(Arg::text(v));
        }
        self
    }

    pub(crate) fn build(self) -> Request {
        // Segment boundaries are carried through exactly via
        // `Request::with_segments` rather than joined with `\r\n` and left
        // for the encoder to rediscover by scanning — a value's own bytes
        // may legitimately contain `\r\n` (see spec.md §3's "opaque binary
        // data"), and a scan can't tell that apart from a real boundary.
        Request::with_segments(self.command, self.segments, self.arguments)
    }
}
