/*!
 * Server reply values
 *
 * A [`Reply`] holds the exact bytes of one complete server reply plus a
 * success/failure discriminator decided purely from the leading byte(s) —
 * never from parsing the whole thing. See [`crate::codec::read_reply`] for
 * how the raw bytes are assembled off the wire.
 */

/// One complete reply from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Everything except an explicit error reply or a null bulk string.
    Success(Vec<u8>),
    /// A `-`-sigil error reply, a null bulk string (`$-1\r\n`), or a bulk
    /// string whose first body byte is itself an error sigil (a leniency
    /// preserved from the source library's behavior — see
    /// [`Reply::classify`]).
    Failure(Vec<u8>),
}

impl Reply {
    /// Classify and wrap a complete, already-assembled reply buffer.
    ///
    /// This does not re-parse nested arrays; `raw` is assumed to be exactly
    /// what [`crate::codec::read_reply`] assembled, and classification only
    /// inspects the first one or two bytes.
    pub fn classify(raw: Vec<u8>) -> Reply {
        match raw.first() {
            Some(b'-') => Reply::Failure(raw),
            Some(b'$') => {
                // Null bulk (`$-1\r\n`) is Failure per the source library's
                // convention. A bulk string whose first body byte is itself
                // `-` is *also* classified Failure: this over-matches
                // legitimate values that happen to start with a minus sign,
                // but the behavior is preserved deliberately for
                // compatibility (see spec notes on this quirk).
                if raw.starts_with(b"$-1\r\n") {
                    Reply::Failure(raw)
                } else if let Some(body_start) = raw.iter().position(|&b| b == b'\n') {
                    match raw.get(body_start + 1) {
                        Some(b'-') => Reply::Failure(raw),
                        _ => Reply::Success(raw),
                    }
                } else {
                    Reply::Success(raw)
                }
            }
            _ => Reply::Success(raw),
        }
    }

    /// The complete reply bytes exactly as received off the wire.
    pub fn raw(&self) -> &[u8] {
        match self {
            Reply::Success(b) | Reply::Failure(b) => b,
        }
    }

    pub fn into_raw(self) -> Vec<u8> {
        match self {
            Reply::Success(b) | Reply::Failure(b) => b,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Failure(_))
    }
}
