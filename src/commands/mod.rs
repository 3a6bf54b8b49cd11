/*!
 * Command shorthand surface
 *
 * One named constructor per supported server command, grouped the way the
 * wider RESP client ecosystem partitions its command tables (by type
 * family: strings, hashes, lists, sets, sorted sets, plus the
 * generic/connection/server groups that don't belong to any data type).
 *
 * Every shorthand here is pure sugar over [`crate::request::Request::new`]
 * per the normalization rules in the spec: none perform I/O, and producing
 * a [`crate::request::Request`] never fails — a malformed
 * placeholder/payload pairing only surfaces at [`crate::codec::encode_request`]
 * time. The command surface is deliberately open: any command not given a
 * shorthand here can still be sent via `Request::new` directly.
 */

pub mod connection;
pub mod generic;
pub mod hashes;
pub mod lists;
pub mod server;
pub mod sets;
pub mod sorted_sets;
pub mod strings;

mod builder;
mod normalize;

pub use builder::Builder;
pub use generic::ScanOptions;
pub use normalize::{Data, UnixTime};
