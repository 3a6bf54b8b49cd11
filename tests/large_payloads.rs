//! Exercises the codec/orchestrator over a real `TcpStream` with
//! multi-megabyte payloads, the same way the teacher crate's own
//! integration tests drove a live server — but against a tiny in-process
//! loopback reflector instead of an external server binary, since this
//! crate's server is out of scope.

use std::collections::HashMap;
use std::net::{TcpListener, TcpStream};
use std::thread;

use rand::Rng;

use ignix_proto::codec::{decode_reply, encode_request};
use ignix_proto::commands::strings::{self, SetOptions};
use ignix_proto::connection::TcpConnection;
use ignix_proto::value::Value;
use ignix_proto::{execute, Connection};

/// A minimal single-connection SET/GET server: reads one RESP request at a
/// time with the crate's own decoder (a request's wire shape — an array of
/// bulk strings — is exactly a RESP array reply, so [`ignix_proto::codec::read_reply`]
/// parses it unchanged) and replies with hand-built RESP bytes.
fn spawn_reflector() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept loopback connection");
        let mut conn = TcpConnection::from_stream(stream).expect("wrap accepted stream");
        let mut store: HashMap<Vec<u8>, Vec<u8>> = HashMap::new();
        loop {
            let request = match ignix_proto::codec::read_reply(&mut conn) {
                Ok(r) => r,
                Err(_) => return,
            };
            let parts = match decode_reply(&request) {
                Value::List(items) => items,
                _ => return,
            };
            let bytes = |v: &Value| -> Vec<u8> {
                match v {
                    Value::Bytes(b) => b.clone(),
                    Value::Text(s) => s.clone().into_bytes(),
                    _ => Vec::new(),
                }
            };
            let command = String::from_utf8_lossy(&bytes(&parts[0])).to_ascii_uppercase();
            match command.as_str() {
                "SET" => {
                    store.insert(bytes(&parts[1]), bytes(&parts[2]));
                    conn.write_all(b"+OK\r\n").expect("write SET reply");
                }
                "GET" => {
                    match store.get(&bytes(&parts[1])) {
                        Some(v) => {
                            let mut reply = format!("${}\r\n", v.len()).into_bytes();
                            reply.extend_from_slice(v);
                            reply.extend_from_slice(b"\r\n");
                            conn.write_all(&reply).expect("write GET reply");
                        }
                        None => conn.write_all(b"$-1\r\n").expect("write null reply"),
                    }
                }
                _ => return,
            }
        }
    });
    port
}

fn round_trip(size: usize) {
    let port = spawn_reflector();
    let mut conn =
        TcpConnection::from_stream(TcpStream::connect(("127.0.0.1", port)).expect("connect"))
            .expect("wrap client stream");

    // Random rather than a repeated fill byte so a stray `\r\n` landing
    // inside the payload is likely at this size, exercising the guarantee
    // that `strings::set`'s single-value placeholder carries its own exact
    // segment boundary (`Request::with_segments`) instead of being
    // rediscovered by scanning for `\r\n` — a scan would mis-split on any
    // such occurrence and this call would fail.
    let mut data = vec![0u8; size];
    rand::thread_rng().fill(data.as_mut_slice());
    let key = format!("large_{size}");
    let set_req = strings::set(key.as_str(), data.clone(), SetOptions::default());
    // The encoder must not choke on a multi-megabyte payload in one segment.
    assert!(encode_request(&set_req).unwrap().len() > size);

    let reply = execute(&set_req, &mut conn).unwrap();
    assert!(reply.is_success());

    let reply = execute(&strings::get(key.as_str()), &mut conn).unwrap();
    match decode_reply(&reply) {
        Value::Bytes(received) => {
            assert_eq!(received.len(), size);
            assert_eq!(received, data);
        }
        other => panic!("expected a bulk string reply, got {other:?}"),
    }
}

#[test]
fn round_trips_a_100kb_payload() {
    round_trip(100 * 1024);
}

#[test]
fn round_trips_a_1mb_payload() {
    round_trip(1024 * 1024);
}

#[test]
fn round_trips_a_10mb_payload() {
    round_trip(10 * 1024 * 1024);
}
