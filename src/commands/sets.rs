/*!
 * Set-valued key commands.
 */

use smol_str::SmolStr;

use crate::request::Request;

use super::normalize::Data;
use super::{Builder, ScanOptions};

pub fn sadd(key: impl Into<SmolStr>, members: impl IntoIterator<Item = impl Into<Data>>) -> Request {
    Builder::new("SADD").text(key).data_seq(members).build()
}

pub fn srem(key: impl Into<SmolStr>, members: impl IntoIterator<Item = impl Into<Data>>) -> Request {
    Builder::new("SREM").text(key).data_seq(members).build()
}

pub fn smembers(key: impl Into<SmolStr>) -> Request {
    Builder::new("SMEMBERS").text(key).build()
}

pub fn sismember(key: impl Into<SmolStr>, member: impl Into<Data>) -> Request {
    Builder::new("SISMEMBER").text(key).data(member).build()
}

pub fn scard(key: impl Into<SmolStr>) -> Request {
    Builder::new("SCARD").text(key).build()
}

pub fn spop(key: impl Into<SmolStr>, count: Option<i64>) -> Request {
    let mut b = Builder::new("SPOP").text(key);
    if let Some(n) = count {
        b = b.text(n.to_string());
    }
    b.build()
}

pub fn srandmember(key: impl Into<SmolStr>, count: Option<i64>) -> Request {
    let mut b = Builder::new("SRANDMEMBER").text(key);
    if let Some(n) = count {
        b = b.text(n.to_string());
    }
    b.build()
}

pub fn sunion(keys: impl IntoIterator<Item = impl Into<SmolStr>>) -> Request {
    Builder::new("SUNION").texts(keys).build()
}

pub fn sinter(keys: impl IntoIterator<Item = impl Into<SmolStr>>) -> Request {
    Builder::new("SINTER").texts(keys).build()
}

pub fn sdiff(keys: impl IntoIterator<Item = impl Into<SmolStr>>) -> Request {
    Builder::new("SDIFF").texts(keys).build()
}

pub fn smove(source: impl Into<SmolStr>, destination: impl Into<SmolStr>, member: impl Into<Data>) -> Request {
    Builder::new("SMOVE")
        .text(source)
        .text(destination)
        .data(member)
        .build()
}

pub fn sscan(key: impl Into<SmolStr>, cursor: u64, opts: ScanOptions) -> Request {
    Builder::new("SSCAN")
        .text(key)
        .text(cursor.to_string())
        .opt("MATCH", opts.pattern)
        .opt("COUNT", opts.count.map(|n| n.to_string()))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Arg;

    #[test]
    fn sadd_flattens_members_into_payload() {
        let r = sadd("s", vec![Data::from("a"), Data::from("b")]);
        assert_eq!(r.arguments(), &[Arg::text("s"), Arg::text("a"), Arg::text("b")]);
    }
}
