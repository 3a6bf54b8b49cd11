/*!
 * A client-side protocol engine for RESP2, the wire format spoken by
 * Redis-compatible key/value servers.
 *
 * The crate is organized leaves-first, matching the component design: a
 * [`request`] builder produces immutable command descriptions, [`codec`]
 * serializes them to wire bytes and parses a [`reply`] back off a
 * [`connection`], and [`orchestrator`] composes single requests, pipelines,
 * and dependent-step sequences over one connection at a time. [`commands`]
 * holds the command-shorthand surface — pure sugar over
 * [`request::Request::new`], grouped by value type.
 *
 * This crate is not a connection pool, not a cluster client, and does not
 * retry or reconnect.
 */

pub mod codec;
pub mod commands;
pub mod connection;
pub mod error;
pub mod orchestrator;
pub mod reply;
pub mod request;
pub mod value;

pub use codec::{decode_reply, encode_request, read_n_replies, read_reply, reply_to_bytes};
pub use connection::{connect, Connection, ConnectOptions, TcpConnection};
pub use error::{Error, Result};
pub use orchestrator::{execute, execute_pipeline, with_session, Session, Step};
pub use reply::Reply;
pub use request::Request;
pub use value::{Arg, Value, PLACEHOLDER};
