/*!
 * Request construction
 *
 * A [`Request`] is an immutable description of one command invocation. It
 * carries no I/O and cannot fail to construct; malformed placeholder/payload
 * pairings are only detected by [`crate::codec::encode_request`].
 */

use crate::value::Arg;
use smol_str::SmolStr;
use std::cmp::Ordering;

/// One command invocation, not yet serialized to wire bytes.
///
/// `command` and `arguments` describe the textual shape of the request;
/// `payload` carries opaque binary data the caller doesn't want coerced
/// through text, addressed from `arguments` via [`crate::value::Arg::Placeholder`]
/// tokens (see [`crate::codec::encode_request`] for the substitution rule).
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) command: SmolStr,
    pub(crate) payload: Vec<u8>,
    pub(crate) arguments: Vec<Arg>,
    /// Byte length of each payload segment, in the order placeholders
    /// consume them, when the segment boundaries are known exactly at
    /// construction time (e.g. from [`crate::commands::Builder`], which
    /// never loses track of where one value ends and the next begins).
    ///
    /// `None` means the segments must be rediscovered by scanning `payload`
    /// for literal `\r\n` bytes, per the CRLF-joined convention documented
    /// for [`Request::new`] — the only option when a caller hands this
    /// constructor an already-flattened buffer. That scan mis-splits a
    /// segment whose own binary content happens to contain `\r\n`, so
    /// anything that knows its segment boundaries up front (the builder
    /// path) must carry them through instead of flattening and rescanning.
    pub(crate) segment_lens: Option<Vec<usize>>,
}

impl Request {
    /// Build a request from its canonical `(command, payload, arguments)`
    /// shape. Pure: never fails, never touches I/O.
    ///
    /// `payload`'s segments (if more than one placeholder is present) are
    /// recovered at encode time by splitting on literal `\r\n`, per spec —
    /// this is the only option for a caller supplying an opaque flattened
    /// buffer with no further structure. Command shorthands that know their
    /// segment boundaries up front use [`Request::with_segments`] instead,
    /// which carries the boundaries through exactly and never rescans.
    pub fn new(
        command: impl Into<SmolStr>,
        payload: impl Into<Vec<u8>>,
        arguments: impl IntoIterator<Item = Arg>,
    ) -> Self {
        Request {
            command: command.into(),
            payload: payload.into(),
            arguments: arguments.into_iter().collect(),
            segment_lens: None,
        }
    }

    /// Build a request from explicit payload segments, one per placeholder
    /// token in `arguments`, in order. Unlike [`Request::new`], the segment
    /// boundaries are carried through exactly rather than rediscovered by
    /// scanning for `\r\n`, so a segment's own bytes may contain `\r\n`
    /// without being mis-split.
    pub(crate) fn with_segments(
        command: impl Into<SmolStr>,
        segments: Vec<Vec<u8>>,
        arguments: impl IntoIterator<Item = Arg>,
    ) -> Self {
        let mut payload = Vec::with_capacity(segments.iter().map(Vec::len).sum());
        let mut segment_lens = Vec::with_capacity(segments.len());
        for seg in segments {
            segment_lens.push(seg.len());
            payload.extend_from_slice(&seg);
        }
        Request {
            command: command.into(),
            payload,
            arguments: arguments.into_iter().collect(),
            segment_lens: Some(segment_lens),
        }
    }

    /// The algebraic identity element: empty command, empty payload, empty
    /// arguments. Never sent to a server; exists so `concat` has a neutral
    /// operand (`concat(r, identity()) == r`, `concat(identity(), r) == r`).
    pub fn identity() -> Self {
        Request {
            command: SmolStr::default(),
            payload: Vec::new(),
            arguments: Vec::new(),
            segment_lens: Some(Vec::new()),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn arguments(&self) -> &[Arg] {
        &self.arguments
    }

    /// Explicit payload segment lengths, if known exactly (see
    /// [`Request::with_segments`]); used by [`crate::codec::encode_request`]
    /// in preference to rescanning `payload` for literal `\r\n` bytes.
    pub(crate) fn segment_lens(&self) -> Option<&[usize]> {
        self.segment_lens.as_deref()
    }

    /// Byte-wise concatenation of two requests' payloads. `command` and
    /// `arguments` are taken from `self` (the left operand), matching the
    /// source library's semigroup instance. Explicit segment boundaries
    /// survive the concatenation when both operands have them — the result
    /// is simply `self`'s segments followed by `other`'s.
    pub fn concat(&self, other: &Request) -> Request {
        let mut payload = Vec::with_capacity(self.payload.len() + other.payload.len());
        payload.extend_from_slice(&self.payload);
        payload.extend_from_slice(&other.payload);
        let segment_lens = match (&self.segment_lens, &other.segment_lens) {
            (Some(a), Some(b)) => {
                let mut lens = Vec::with_capacity(a.len() + b.len());
                lens.extend_from_slice(a);
                lens.extend_from_slice(b);
                Some(lens)
            }
            _ => None,
        };
        Request {
            command: self.command.clone(),
            payload,
            arguments: self.arguments.clone(),
            segment_lens,
        }
    }

    /// Functor map over the payload: build a new request whose payload is
    /// `f(self.payload())`, keeping command and arguments unchanged. The
    /// mapping function can rearrange bytes arbitrarily, so any known
    /// segment boundaries can't be assumed to still apply and are dropped;
    /// the encoder falls back to rescanning for `\r\n`.
    pub fn map_payload(&self, f: impl FnOnce(&[u8]) -> Vec<u8>) -> Request {
        Request {
            command: self.command.clone(),
            payload: f(&self.payload),
            arguments: self.arguments.clone(),
            segment_lens: None,
        }
    }

    /// Extend this request's payload with additional bytes, returning a new
    /// request (arguments and command unchanged). Equivalent to
    /// `self.concat(&Request::new("", bytes, []))` but avoids constructing
    /// the intermediate value. The appended bytes aren't one of the
    /// caller's tracked segments, so known segment boundaries are dropped.
    pub fn extend_payload(&self, bytes: &[u8]) -> Request {
        let mut payload = self.payload.clone();
        payload.extend_from_slice(bytes);
        Request {
            command: self.command.clone(),
            payload,
            arguments: self.arguments.clone(),
            segment_lens: None,
        }
    }

    /// Comonadic "extract": the payload this request currently focuses on.
    pub fn extract(&self) -> &[u8] {
        &self.payload
    }
}

/// Equality compares payloads byte-wise only — `command` and `arguments`
/// are deliberately ignored, matching the source library's instance so
/// that requests remain comparable purely by the data they carry.
impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}
impl Eq for Request {}

/// Total order: payload length first, then byte content — again ignoring
/// `command`/`arguments`.
impl PartialOrd for Request {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Request {
    fn cmp(&self, other: &Self) -> Ordering {
        self.payload
            .len()
            .cmp(&other.payload.len())
            .then_with(|| self.payload.cmp(&other.payload))
    }
}
