/*!
 * Server-scoped command shorthands. `FLUSHALL`/`FLUSHDB` are version-gated
 * across source revisions (spec.md §9) — this crate sends whatever bytes
 * the caller asks for and performs no version negotiation, so both are
 * plain shorthands with no feature detection.
 */

use crate::request::Request;

use super::Builder;

pub fn flushall() -> Request {
    Builder::new("FLUSHALL").build()
}

pub fn flushdb() -> Request {
    Builder::new("FLUSHDB").build()
}
