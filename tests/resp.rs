use ignix_proto::codec::{decode_reply, read_n_replies, reply_to_bytes};
use ignix_proto::connection::MockStream;
use ignix_proto::value::Value;

#[test]
fn reads_a_ping_set_get_reply_sequence() {
    let mut conn = MockStream::with_inbound(
        b"+PONG\r\n+OK\r\n$1\r\n1\r\n".to_vec(),
    );
    let replies = read_n_replies(&mut conn, 3).unwrap();

    assert_eq!(decode_reply(&replies[0]), Value::Text("PONG".to_string()));
    assert_eq!(decode_reply(&replies[1]), Value::Text("OK".to_string()));
    assert_eq!(decode_reply(&replies[2]), Value::Bytes(b"1".to_vec()));
}

#[test]
fn decodes_nested_array_reply_into_a_list() {
    let mut conn = MockStream::with_inbound(b"*2\r\n:42\r\n$4\r\nhoge\r\n".to_vec());
    let reply = ignix_proto::codec::read_reply(&mut conn).unwrap();
    assert_eq!(
        decode_reply(&reply),
        Value::List(vec![Value::Int(42), Value::Text("hoge".to_string())])
    );
    assert_eq!(reply_to_bytes(&reply), b"42\nhoge\n".to_vec());
}
