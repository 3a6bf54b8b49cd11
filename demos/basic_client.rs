//! Minimal SET/GET round trip against a live RESP2 server, in the same
//! spirit as the teacher crate's own `examples/client.rs`: open a
//! connection, send a couple of commands, print what comes back.

use ignix_proto::commands::strings;
use ignix_proto::{decode_reply, with_session, ConnectOptions};

fn main() -> ignix_proto::Result<()> {
    env_logger::init();

    with_session(&ConnectOptions::default(), |session| {
        let reply = session.execute(&strings::set("hello", "world", Default::default()))?;
        println!("SET -> {:?}", decode_reply(&reply));

        let reply = session.execute(&strings::get("hello"))?;
        println!("GET -> {:?}", decode_reply(&reply));

        Ok(())
    })
}
