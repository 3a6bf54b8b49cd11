/*!
 * Sorted-set-valued key commands.
 */

use smol_str::SmolStr;

use crate::request::Request;

use super::normalize::{stringify_float, Data};
use super::{Builder, ScanOptions};

#[derive(Debug, Clone, Copy, Default)]
pub struct ZAddOptions {
    pub nx: bool,
    pub xx: bool,
    pub gt: bool,
    pub lt: bool,
    pub ch: bool,
}

pub fn zadd(
    key: impl Into<SmolStr>,
    opts: ZAddOptions,
    members: impl IntoIterator<Item = (f64, impl Into<Data>)>,
) -> Request {
    let mut b = Builder::new("ZADD")
        .text(key)
        .flag("NX", opts.nx)
        .flag("XX", opts.xx)
        .flag("GT", opts.gt)
        .flag("LT", opts.lt)
        .flag("CH", opts.ch);
    for (score, member) in members {
        b = b.text(stringify_float(score)).data(member);
    }
    b.build()
}

pub fn zscore(key: impl Into<SmolStr>, member: impl Into<Data>) -> Request {
    Builder::new("ZSCORE").text(key).data(member).build()
}

pub fn zrange(key: impl Into<SmolStr>, start: i64, stop: i64, with_scores: bool) -> Request {
    Builder::new("ZRANGE")
        .text(key)
        .text(start.to_string())
        .text(stop.to_string())
        .flag("WITHSCORES", with_scores)
        .build()
}

pub fn zrevrange(key: impl Into<SmolStr>, start: i64, stop: i64, with_scores: bool) -> Request {
    Builder::new("ZREVRANGE")
        .text(key)
        .text(start.to_string())
        .text(stop.to_string())
        .flag("WITHSCORES", with_scores)
        .build()
}

/// `min`/`max` are passed through verbatim so callers can use `-inf`,
/// `+inf`, or an exclusive `(score` form as the server expects.
pub fn zrangebyscore(
    key: impl Into<SmolStr>,
    min: impl Into<SmolStr>,
    max: impl Into<SmolStr>,
    with_scores: bool,
    limit: Option<(i64, i64)>,
) -> Request {
    let mut b = Builder::new("ZRANGEBYSCORE")
        .text(key)
        .text(min)
        .text(max)
        .flag("WITHSCORES", with_scores);
    if let Some((offset, count)) = limit {
        b = b.text("LIMIT").text(offset.to_string()).text(count.to_string());
    }
    b.build()
}

pub fn zrank(key: impl Into<SmolStr>, member: impl Into<Data>) -> Request {
    Builder::new("ZRANK").text(key).data(member).build()
}

pub fn zrevrank(key: impl Into<SmolStr>, member: impl Into<Data>) -> Request {
    Builder::new("ZREVRANK").text(key).data(member).build()
}

pub fn zrem(key: impl Into<SmolStr>, members: impl IntoIterator<Item = impl Into<Data>>) -> Request {
    Builder::new("ZREM").text(key).data_seq(members).build()
}

pub fn zcard(key: impl Into<SmolStr>) -> Request {
    Builder::new("ZCARD").text(key).build()
}

pub fn zincrby(key: impl Into<SmolStr>, by: f64, member: impl Into<Data>) -> Request {
    Builder::new("ZINCRBY")
        .text(key)
        .text(stringify_float(by))
        .data(member)
        .build()
}

pub fn zscan(key: impl Into<SmolStr>, cursor: u64, opts: ScanOptions) -> Request {
    Builder::new("ZSCAN")
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
    fn zadd_interleaves_score_and_member() {
        let r = zadd("z", ZAddOptions::default(), vec![(1.5, Data::from("a")), (2.0, Data::from("b"))]);
        assert_eq!(
            r.arguments(),
            &[
                Arg::text("z"),
                Arg::text("1.5"),
                Arg::text("a"),
                Arg::text("2"),
                Arg::text("b"),
            ]
        );
    }

    #[test]
    fn zadd_flags_precede_score_member_pairs() {
        let r = zadd(
            "z",
            ZAddOptions { gt: true, ch: true, ..Default::default() },
            vec![(1.0, Data::from("a"))],
        );
        assert_eq!(
            r.arguments(),
            &[Arg::text("z"), Arg::text("GT"), Arg::text("CH"), Arg::text("1"), Arg::text("a")]
        );
    }
}
