/*!
 * String-valued key commands.
 */

use smol_str::SmolStr;

use crate::request::Request;

use super::normalize::Data;
use super::Builder;

pub fn get(key: impl Into<SmolStr>) -> Request {
    Builder::new("GET").text(key).build()
}

/// `SET key value [modifiers…]`. `value` accepts either text or an opaque
/// byte buffer (spec.md §4.1); binary values become a payload-backed
/// placeholder so the bytes never get coerced through text.
pub fn set(key: impl Into<SmolStr>, value: impl Into<Data>, opts: SetOptions) -> Request {
    let mut b = Builder::new("SET").text(key).data(value);
    b = match opts.expiry {
        Some(Expiry::Ex(s)) => b.text("EX").text(s.to_string()),
        Some(Expiry::Px(ms)) => b.text("PX").text(ms.to_string()),
        Some(Expiry::ExAt(ts)) => b.text("EXAT").text(ts.to_string()),
        Some(Expiry::PxAt(ts)) => b.text("PXAT").text(ts.to_string()),
        Some(Expiry::KeepTtl) => b.text("KEEPTTL"),
        None => b,
    };
    b = b.flag("NX", opts.nx).flag("XX", opts.xx).flag("GET", opts.get);
    b.build()
}

/// `SET`'s expiry clause: at most one of these is meaningful per call.
#[derive(Debug, Clone, Copy)]
pub enum Expiry {
    Ex(i64),
    Px(i64),
    ExAt(i64),
    PxAt(i64),
    KeepTtl,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SetOptions {
    pub expiry: Option<Expiry>,
    pub nx: bool,
    pub xx: bool,
    pub get: bool,
}

pub fn append(key: impl Into<SmolStr>, value: impl Into<Data>) -> Request {
    Builder::new("APPEND").text(key).data(value).build()
}

pub fn strlen(key: impl Into<SmolStr>) -> Request {
    Builder::new("STRLEN").text(key).build()
}

pub fn getset(key: impl Into<SmolStr>, value: impl Into<Data>) -> Request {
    Builder::new("GETSET").text(key).data(value).build()
}

pub fn getdel(key: impl Into<SmolStr>) -> Request {
    Builder::new("GETDEL").text(key).build()
}

pub fn setnx(key: impl Into<SmolStr>, value: impl Into<Data>) -> Request {
    Builder::new("SETNX").text(key).data(value).build()
}

pub fn setex(key: impl Into<SmolStr>, seconds: i64, value: impl Into<Data>) -> Request {
    Builder::new("SETEX")
        .text(key)
        .text(seconds.to_string())
        .data(value)
        .build()
}

pub fn psetex(key: impl Into<SmolStr>, millis: i64, value: impl Into<Data>) -> Request {
    Builder::new("PSETEX")
        .text(key)
        .text(millis.to_string())
        .data(value)
        .build()
}

pub fn getrange(key: impl Into<SmolStr>, start: i64, end: i64) -> Request {
    Builder::new("GETRANGE")
        .text(key)
        .text(start.to_string())
        .text(end.to_string())
        .build()
}

pub fn setrange(key: impl Into<SmolStr>, offset: i64, value: impl Into<Data>) -> Request {
    Builder::new("SETRANGE")
        .text(key)
        .text(offset.to_string())
        .data(value)
        .build()
}

pub fn incr(key: impl Into<SmolStr>) -> Request {
    Builder::new("INCR").text(key).build()
}

pub fn incrby(key: impl Into<SmolStr>, by: i64) -> Request {
    Builder::new("INCRBY").text(key).text(by.to_string()).build()
}

/// Uses the spec's shortest-decimal float normalization (§4.1).
pub fn incrbyfloat(key: impl Into<SmolStr>, by: f64) -> Request {
    Builder::new("INCRBYFLOAT")
        .text(key)
        .text(super::normalize::stringify_float(by))
        .build()
}

pub fn decr(key: impl Into<SmolStr>) -> Request {
    Builder::new("DECR").text(key).build()
}

pub fn decrby(key: impl Into<SmolStr>, by: i64) -> Request {
    Builder::new("DECRBY").text(key).text(by.to_string()).build()
}

pub fn mget(keys: impl IntoIterator<Item = impl Into<SmolStr>>) -> Request {
    Builder::new("MGET").texts(keys).build()
}

/// `MSET key value key value …`. Each pair's value may independently be
/// text or bytes.
pub fn mset(pairs: impl IntoIterator<Item = (impl Into<SmolStr>, impl Into<Data>)>) -> Request {
    let mut b = Builder::new("MSET");
    for (k, v) in pairs {
        b = b.text(k).data(v);
    }
    b.build()
}

pub fn msetnx(pairs: impl IntoIterator<Item = (impl Into<SmolStr>, impl Into<Data>)>) -> Request {
    let mut b = Builder::new("MSETNX");
    for (k, v) in pairs {
        b = b.text(k).data(v);
    }
    b.build()
}

pub fn bitcount(key: impl Into<SmolStr>, range: Option<(i64, i64)>) -> Request {
    let mut b = Builder::new("BITCOUNT").text(key);
    if let Some((start, end)) = range {
        b = b.text(start.to_string()).text(end.to_string());
    }
    b.build()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    And,
    Or,
    Xor,
    Not,
}

pub fn bitop(
    op: BitOp,
    dest_key: impl Into<SmolStr>,
    src_keys: impl IntoIterator<Item = impl Into<SmolStr>>,
) -> Request {
    let op_name = match op {
        BitOp::And => "AND",
        BitOp::Or => "OR",
        BitOp::Xor => "XOR",
        BitOp::Not => "NOT",
    };
    Builder::new("BITOP")
        .text(op_name)
        .text(dest_key)
        .texts(src_keys)
        .build()
}

pub fn bitpos(key: impl Into<SmolStr>, bit: u8, range: Option<(i64, Option<i64>)>) -> Request {
    let mut b = Builder::new("BITPOS").text(key).text(bit.to_string());
    if let Some((start, end)) = range {
        b = b.text(start.to_string());
        if let Some(end) = end {
            b = b.text(end.to_string());
        }
    }
    b.build()
}

/// One `BITFIELD` subcommand. `BITFIELD` is unusual among string commands
/// in taking a sequence of subcommands rather than a single operation; each
/// variant expands to its RESP argument shape directly.
#[derive(Debug, Clone)]
pub enum BitfieldOp {
    Get { ty: SmolStr, offset: SmolStr },
    Set { ty: SmolStr, offset: SmolStr, value: i64 },
    IncrBy { ty: SmolStr, offset: SmolStr, increment: i64 },
    Overflow(OverflowMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowMode {
    Wrap,
    Sat,
    Fail,
}

pub fn bitfield(key: impl Into<SmolStr>, ops: impl IntoIterator<Item = BitfieldOp>) -> Request {
    let mut b = Builder::new("BITFIELD").text(key);
    for op in ops {
        b = match op {
            BitfieldOp::Get { ty, offset } => b.text("GET").text(ty).text(offset),
            BitfieldOp::Set { ty, offset, value } => {
                b.text("SET").text(ty).text(offset).text(value.to_string())
            }
            BitfieldOp::IncrBy { ty, offset, increment } => b
                .text("INCRBY")
                .text(ty)
                .text(offset)
                .text(increment.to_string()),
            BitfieldOp::Overflow(mode) => b.text("OVERFLOW").text(match mode {
                OverflowMode::Wrap => "WRAP",
                OverflowMode::Sat => "SAT",
                OverflowMode::Fail => "FAIL",
            }),
        };
    }
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_request;
    use crate::value::Arg;

    #[test]
    fn set_with_binary_value_uses_placeholder() {
        let r = set("hoge", b"piyo".to_vec(), SetOptions { expiry: Some(Expiry::Ex(60)), ..Default::default() });
        let bytes = encode_request(&r).unwrap();
        assert_eq!(
            bytes,
            b"*5\r\n$3\r\nSET\r\n$4\r\nhoge\r\n$4\r\npiyo\r\n$2\r\nEX\r\n$2\r\n60\r\n".to_vec()
        );
    }

    #[test]
    fn set_with_text_value_has_empty_payload() {
        let r = set("hoge", "piyo", SetOptions::default());
        assert_eq!(r.payload(), b"");
        assert_eq!(
            r.arguments(),
            &[Arg::text("hoge"), Arg::text("piyo")]
        );
    }

    #[test]
    fn set_nx_and_get_flags_append_in_order() {
        let r = set("k", "v", SetOptions { nx: true, get: true, ..Default::default() });
        assert_eq!(
            r.arguments(),
            &[Arg::text("k"), Arg::text("v"), Arg::text("NX"), Arg::text("GET")]
        );
    }

    #[test]
    fn mset_supports_mixed_text_and_binary_values() {
        let r = mset(vec![
            ("hoge".to_string(), Data::from(b"piyo".to_vec())),
            ("hogefuga".to_string(), Data::from(b"fuga".to_vec())),
        ]);
        let bytes = encode_request(&r).unwrap();
        assert_eq!(
            bytes,
            b"*5\r\n$4\r\nMSET\r\n$4\r\nhoge\r\n$4\r\npiyo\r\n$8\r\nhogefuga\r\n$4\r\nfuga\r\n"
                .to_vec()
        );
    }

    #[test]
    fn incrbyfloat_uses_shortest_decimal() {
        let r = incrbyfloat("k", 0.1);
        assert_eq!(r.arguments()[1], Arg::text("0.1"));
    }

    #[test]
    fn bitfield_expands_subcommands() {
        let r = bitfield(
            "bf",
            vec![
                BitfieldOp::Set { ty: "u8".into(), offset: "0".into(), value: 255 },
                BitfieldOp::Overflow(OverflowMode::Sat),
                BitfieldOp::IncrBy { ty: "u8".into(), offset: "0".into(), increment: 10 },
            ],
        );
        let texts: Vec<&str> = r
            .arguments()
            .iter()
            .map(|a| match a {
                Arg::Text(s) => s.as_str(),
                Arg::Placeholder => "<ph>",
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                "bf", "SET", "u8", "0", "255", "OVERFLOW", "SAT", "INCRBY", "u8", "0", "10"
            ]
        );
    }
}
