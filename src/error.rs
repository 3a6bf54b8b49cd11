/*!
 * Error taxonomy for the protocol engine
 *
 * Mirrors the kinds enumerated for this engine: malformed requests and
 * protocol violations are programmer/server bugs surfaced as typed errors,
 * while a `-`-sigil server reply is never an error — it travels as
 * [`crate::reply::Reply::Failure`] and is returned, not thrown.
 */

use thiserror::Error;

/// Errors produced by the request encoder, reply decoder, and orchestrator.
///
/// `ServerError` is intentionally absent: a reply beginning with `-` is a
/// valid outcome of a round-trip, not a failure of the engine itself.
#[derive(Debug, Error)]
pub enum Error {
    /// The number of placeholder tokens in a request's arguments does not
    /// match the number of CRLF-separated segments in its payload, or an
    /// empty command name was used where one is forbidden.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The connection reached end-of-stream before a complete reply could
    /// be read. The connection cannot be resynchronized and must be closed.
    #[error("truncated reply: connection closed mid-read")]
    Truncated,

    /// A reply used a sigil or length field the decoder doesn't recognize.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// Underlying stream I/O failed for a reason other than a truncated
    /// reply (e.g. connection reset, a write failing outright).
    #[error("I/O error: {0}")]
    Io(std::io::Error),

    /// A write was attempted on a connection that still has replies pending
    /// from a previous write (see the per-connection state machine).
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    /// Classify a raw I/O error from the connection: end-of-stream in the
    /// middle of a reply is unrecoverable and distinct from every other
    /// I/O failure (see the error taxonomy's `Truncated` vs `IOError`).
    pub(crate) fn from_io(e: std::io::Error) -> Error {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::Truncated
        } else {
            Error::Io(e)
        }
    }
}

/// Convenience alias used throughout the engine's public API.
pub type Result<T> = std::result::Result<T, Error>;
