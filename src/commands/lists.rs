/*!
 * List-valued key commands.
 */

use smol_str::SmolStr;

use crate::request::Request;

use super::normalize::Data;
use super::Builder;

pub fn lpush(key: impl Into<SmolStr>, values: impl IntoIterator<Item = impl Into<Data>>) -> Request {
    Builder::new("LPUSH").text(key).data_seq(values).build()
}

pub fn rpush(key: impl Into<SmolStr>, values: impl IntoIterator<Item = impl Into<Data>>) -> Request {
    Builder::new("RPUSH").text(key).data_seq(values).build()
}

pub fn lpushx(key: impl Into<SmolStr>, values: impl IntoIterator<Item = impl Into<Data>>) -> Request {
    Builder::new("LPUSHX").text(key).data_seq(values).build()
}

pub fn rpushx(key: impl Into<SmolStr>, values: impl IntoIterator<Item = impl Into<Data>>) -> Request {
    Builder::new("RPUSHX").text(key).data_seq(values).build()
}

pub fn lpop(key: impl Into<SmolStr>, count: Option<i64>) -> Request {
    let mut b = Builder::new("LPOP").text(key);
    if let Some(n) = count {
        b = b.text(n.to_string());
    }
    b.build()
}

pub fn rpop(key: impl Into<SmolStr>, count: Option<i64>) -> Request {
    let mut b = Builder::new("RPOP").text(key);
    if let Some(n) = count {
        b = b.text(n.to_string());
    }
    b.build()
}

pub fn lrange(key: impl Into<SmolStr>, start: i64, stop: i64) -> Request {
    Builder::new("LRANGE")
        .text(key)
        .text(start.to_string())
        .text(stop.to_string())
        .build()
}

pub fn llen(key: impl Into<SmolStr>) -> Request {
    Builder::new("LLEN").text(key).build()
}

pub fn lindex(key: impl Into<SmolStr>, index: i64) -> Request {
    Builder::new("LINDEX").text(key).text(index.to_string()).build()
}

pub fn lset(key: impl Into<SmolStr>, index: i64, value: impl Into<Data>) -> Request {
    Builder::new("LSET")
        .text(key)
        .text(index.to_string())
        .data(value)
        .build()
}

pub fn lrem(key: impl Into<SmolStr>, count: i64, value: impl Into<Data>) -> Request {
    Builder::new("LREM")
        .text(key)
        .text(count.to_string())
        .data(value)
        .build()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Before,
    After,
}

pub fn linsert(
    key: impl Into<SmolStr>,
    position: InsertPosition,
    pivot: impl Into<Data>,
    value: impl Into<Data>,
) -> Request {
    let pos = match position {
        InsertPosition::Before => "BEFORE",
        InsertPosition::After => "AFTER",
    };
    Builder::new("LINSERT")
        .text(key)
        .text(pos)
        .data(pivot)
        .data(value)
        .build()
}

pub fn ltrim(key: impl Into<SmolStr>, start: i64, stop: i64) -> Request {
    Builder::new("LTRIM")
        .text(key)
        .text(start.to_string())
        .text(stop.to_string())
        .build()
}
