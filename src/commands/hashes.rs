/*!
 * Hash-valued key commands.
 */

use smol_str::SmolStr;

use crate::request::Request;

use super::normalize::Data;
use super::{Builder, ScanOptions};

pub fn hset(
    key: impl Into<SmolStr>,
    fields: impl IntoIterator<Item = (impl Into<SmolStr>, impl Into<Data>)>,
) -> Request {
    let mut b = Builder::new("HSET").text(key);
    for (f, v) in fields {
        b = b.text(f).data(v);
    }
    b.build()
}

pub fn hsetnx(key: impl Into<SmolStr>, field: impl Into<SmolStr>, value: impl Into<Data>) -> Request {
    Builder::new("HSETNX").text(key).text(field).data(value).build()
}

pub fn hget(key: impl Into<SmolStr>, field: impl Into<SmolStr>) -> Request {
    Builder::new("HGET").text(key).text(field).build()
}

pub fn hdel(key: impl Into<SmolStr>, fields: impl IntoIterator<Item = impl Into<SmolStr>>) -> Request {
    Builder::new("HDEL").text(key).texts(fields).build()
}

pub fn hexists(key: impl Into<SmolStr>, field: impl Into<SmolStr>) -> Request {
    Builder::new("HEXISTS").text(key).text(field).build()
}

pub fn hgetall(key: impl Into<SmolStr>) -> Request {
    Builder::new("HGETALL").text(key).build()
}

pub fn hincrby(key: impl Into<SmolStr>, field: impl Into<SmolStr>, by: i64) -> Request {
    Builder::new("HINCRBY").text(key).text(field).text(by.to_string()).build()
}

pub fn hincrbyfloat(key: impl Into<SmolStr>, field: impl Into<SmolStr>, by: f64) -> Request {
    Builder::new("HINCRBYFLOAT")
        .text(key)
        .text(field)
        .text(super::normalize::stringify_float(by))
        .build()
}

pub fn hkeys(key: impl Into<SmolStr>) -> Request {
    Builder::new("HKEYS").text(key).build()
}

pub fn hvals(key: impl Into<SmolStr>) -> Request {
    Builder::new("HVALS").text(key).build()
}

pub fn hlen(key: impl Into<SmolStr>) -> Request {
    Builder::new("HLEN").text(key).build()
}

pub fn hmget(key: impl Into<SmolStr>, fields: impl IntoIterator<Item = impl Into<SmolStr>>) -> Request {
    Builder::new("HMGET").text(key).texts(fields).build()
}

pub fn hmset(
    key: impl Into<SmolStr>,
    fields: impl IntoIterator<Item = (impl Into<SmolStr>, impl Into<Data>)>,
) -> Request {
    let mut b = Builder::new("HMSET").text(key);
    for (f, v) in fields {
        b = b.text(f).data(v);
    }
    b.build()
}

pub fn hscan(key: impl Into<SmolStr>, cursor: u64, opts: ScanOptions) -> Request {
    Builder::new("HSCAN")
        .text(key)
        .text(cursor.to_string())
        .opt("MATCH", opts.pattern)
        .opt("COUNT", opts.count.map(|n| n.to_string()))
        .build()
}

pub fn hstrlen(key: impl Into<SmolStr>, field: impl Into<SmolStr>) -> Request {
    Builder::new("HSTRLEN").text(key).text(field).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Arg;

    #[test]
    fn hset_flattens_field_value_pairs() {
        let r = hset("h", vec![("f1", Data::from("v1")), ("f2", Data::from("v2"))]);
        assert_eq!(
            r.arguments(),
            &[
                Arg::text("h"),
                Arg::text("f1"),
                Arg::text("v1"),
                Arg::text("f2"),
                Arg::text("v2"),
            ]
        );
    }

    #[test]
    fn hscan_includes_match_and_count() {
        let r = hscan(
            "h",
            0,
            ScanOptions {
                pattern: Some("f*".into()),
                count: Some(10),
                ..Default::default()
            },
        );
        let texts: Vec<&str> = r
            .arguments()
            .iter()
            .map(|a| match a {
                Arg::Text(s) => s.as_str(),
                Arg::Placeholder => "<ph>",
            })
            .collect();
        assert_eq!(texts, vec!["h", "0", "MATCH", "f*", "COUNT", "10"]);
    }
}
