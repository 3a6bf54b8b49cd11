/*!
 * RESP2 wire codec
 *
 * Pure serialization of a [`Request`] to its wire bytes, and a streaming
 * deserializer that reads exactly one [`Reply`] from a [`Connection`],
 * tolerating arbitrary chunk boundaries and nested arrays without
 * recursing (an explicit frame stack stands in for the call stack, per the
 * engine's notes on pathological nesting depth).
 */

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::reply::Reply;
use crate::request::Request;
use crate::value::Arg;
use crate::value::Value;

/// Split a payload on literal `\r\n` delimiters, discarding the delimiters.
/// An empty payload yields zero segments. No padding or dropping of a
/// trailing empty segment is performed — the caller's placeholder count is
/// checked against exactly however many segments this produces.
///
/// Fallback only, used by [`segments_of`] when a request carries no
/// explicit segment boundaries (i.e. it was built via [`Request::new`]
/// directly rather than [`Request::with_segments`]); a segment whose own
/// bytes happen to contain `\r\n` is indistinguishable from two segments
/// under this scan, so anything that knows its boundaries up front should
/// avoid going through it.
fn split_segments(payload: &[u8]) -> Vec<&[u8]> {
    if payload.is_empty() {
        return Vec::new();
    }
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i + 1 < payload.len() {
        if payload[i] == b'\r' && payload[i + 1] == b'\n' {
            segments.push(&payload[start..i]);
            i += 2;
            start = i;
        } else {
            i += 1;
        }
    }
    segments.push(&payload[start..]);
    segments
}

fn decimal_len(mut n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    let mut len = 0;
    while n > 0 {
        len += 1;
        n /= 10;
    }
    len
}

fn push_bulk(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(b'$');
    out.extend_from_slice(bytes.len().to_string().as_bytes());
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(bytes);
    out.extend_from_slice(b"\r\n");
}

fn bulk_len(bytes: &[u8]) -> usize {
    1 + decimal_len(bytes.len()) + 2 + bytes.len() + 2
}

/// A request's payload segments, in placeholder-consumption order. When
/// `req` carries explicit segment boundaries (built via
/// [`Request::with_segments`], e.g. from [`crate::commands::Builder`]),
/// those are sliced out directly; otherwise the segments are recovered by
/// splitting `payload` on literal `\r\n`, per the convention documented for
/// [`Request::new`]. Only the fallback can mis-split a segment whose own
/// bytes happen to contain `\r\n` — explicit boundaries are exact.
fn segments_of(req: &Request) -> Vec<&[u8]> {
    match req.segment_lens() {
        Some(lens) => {
            let mut segments = Vec::with_capacity(lens.len());
            let mut offset = 0;
            for &len in lens {
                segments.push(&req.payload()[offset..offset + len]);
                offset += len;
            }
            segments
        }
        None => split_segments(req.payload()),
    }
}

/// Serialize a request to the exact bytes that should be written to the
/// connection: a RESP array of `k+1` bulk strings (command name, then each
/// argument), with placeholder arguments substituted from the payload's
/// segments in left-to-right order.
///
/// Errors with [`Error::MalformedRequest`] if the number of placeholder
/// tokens doesn't exactly match the number of payload segments, or if the
/// command name is empty.
pub fn encode_request(req: &Request) -> Result<Vec<u8>> {
    if req.command().is_empty() {
        return Err(Error::MalformedRequest(
            "command name must not be empty".to_string(),
        ));
    }

    let segments = segments_of(req);
    let mut seg_iter = segments.into_iter();

    let mut parts: Vec<&[u8]> = Vec::with_capacity(req.arguments().len());
    let mut owned: Vec<Vec<u8>> = Vec::new();
    for arg in req.arguments() {
        match arg {
            Arg::Text(s) => {
                owned.push(s.as_bytes().to_vec());
            }
            Arg::Placeholder => {
                let seg = seg_iter.next().ok_or_else(|| {
                    Error::MalformedRequest(
                        "placeholder count exceeds the number of payload segments".to_string(),
                    )
                })?;
                owned.push(seg.to_vec());
            }
        }
    }
    if seg_iter.next().is_some() {
        return Err(Error::MalformedRequest(
            "payload has more segments than placeholder tokens".to_string(),
        ));
    }
    for o in &owned {
        parts.push(o.as_slice());
    }

    let cmd_bytes = req.command().as_bytes();
    let k = parts.len();
    let header_len = 1 + decimal_len(k + 1) + 2;
    let mut capacity = header_len + bulk_len(cmd_bytes);
    for p in &parts {
        capacity += bulk_len(p);
    }

    let mut out = Vec::with_capacity(capacity);
    out.push(b'*');
    out.extend_from_slice((k + 1).to_string().as_bytes());
    out.extend_from_slice(b"\r\n");
    push_bulk(&mut out, cmd_bytes);
    for p in &parts {
        push_bulk(&mut out, p);
    }
    Ok(out)
}

fn parse_decimal(line: &[u8]) -> Result<i64> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| Error::ProtocolViolation(format!("invalid length field: {line:?}")))
}

/// One array still waiting for `remaining` more child replies; `buf`
/// accumulates the header line plus each child's raw bytes as they land.
struct ArrayFrame {
    remaining: usize,
    buf: Vec<u8>,
}

/// Read exactly one complete reply from `conn`, handling nested arrays with
/// an explicit frame stack so pathologically deep nesting can't blow the
/// call stack. Leaves the connection positioned immediately after the
/// reply's terminating CRLF.
pub fn read_reply(conn: &mut impl Connection) -> Result<Reply> {
    let mut stack: Vec<ArrayFrame> = Vec::new();

    // `unit` holds the most recently completed single reply's raw bytes;
    // it starts empty and is replaced every time we finish reading one.
    let mut unit: Vec<u8>;

    loop {
        let line = conn.read_line_until_crlf().map_err(Error::from_io)?;
        let sigil = *line.first().ok_or_else(|| {
            Error::ProtocolViolation("empty reply line".to_string())
        })?;

        match sigil {
            b'+' | b'-' | b':' => {
                let mut u = line;
                u.extend_from_slice(b"\r\n");
                unit = u;
            }
            b'$' => {
                let n = parse_decimal(&line[1..])?;
                let mut u = line;
                u.extend_from_slice(b"\r\n");
                if n >= 0 {
                    let body = conn.read_exact(n as usize + 2).map_err(Error::from_io)?;
                    u.extend_from_slice(&body);
                }
                unit = u;
            }
            b'*' => {
                let m = parse_decimal(&line[1..])?;
                let mut header = line;
                header.extend_from_slice(b"\r\n");
                if m <= 0 {
                    unit = header;
                } else {
                    stack.push(ArrayFrame {
                        remaining: m as usize,
                        buf: header,
                    });
                    continue;
                }
            }
            other => {
                return Err(Error::ProtocolViolation(format!(
                    "unknown reply sigil: {:?}",
                    other as char
                )));
            }
        }

        // `unit` is a complete reply; fold it into the parent array frame
        // (possibly several levels, if this closes out the last pending
        // child at each level), or surface it as the final result.
        loop {
            match stack.last_mut() {
                None => return Ok(Reply::classify(unit)),
                Some(frame) => {
                    frame.buf.extend_from_slice(&unit);
                    frame.remaining -= 1;
                    if frame.remaining == 0 {
                        let finished = stack.pop().unwrap();
                        unit = finished.buf;
                        // keep unwinding: this completed array may itself be
                        // the last pending child of its own parent.
                    } else {
                        break;
                    }
                }
            }
        }
    }
}

/// Read exactly `n` replies in order. Used by the pipeline orchestrator,
/// which never infers completion from stream idleness.
pub fn read_n_replies(conn: &mut impl Connection, n: usize) -> Result<Vec<Reply>> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(read_reply(conn)?);
    }
    Ok(out)
}

/// Decode a reply's raw bytes into a conventional in-memory value. Pure:
/// operates only on bytes already assembled by [`read_reply`], never on a
/// connection.
pub fn decode_reply(reply: &Reply) -> Value {
    let raw = reply.raw();
    decode_value(raw).0
}

/// Parse one value starting at the beginning of `raw`, returning the value
/// and how many bytes it consumed. Recursion depth here is bounded by
/// whatever depth `read_reply` already materialized successfully.
fn decode_value(raw: &[u8]) -> (Value, usize) {
    match raw.first() {
        Some(b'+') => {
            let (line, consumed) = take_line(raw);
            (Value::Text(String::from_utf8_lossy(&line[1..]).into_owned()), consumed)
        }
        Some(b'-') => {
            let (line, consumed) = take_line(raw);
            (
                Value::Error(String::from_utf8_lossy(&line[1..]).into_owned()),
                consumed,
            )
        }
        Some(b':') => {
            let (line, consumed) = take_line(raw);
            let n = std::str::from_utf8(&line[1..])
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(0);
            (Value::Int(n), consumed)
        }
        Some(b'$') => {
            let (line, header_len) = take_line(raw);
            let n: i64 = std::str::from_utf8(&line[1..])
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(-1);
            if n < 0 {
                (Value::Null, header_len)
            } else {
                let n = n as usize;
                let body = raw[header_len..header_len + n].to_vec();
                (Value::Bytes(body), header_len + n + 2)
            }
        }
        Some(b'*') => {
            let (line, header_len) = take_line(raw);
            let m: i64 = std::str::from_utf8(&line[1..])
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(-1);
            if m <= 0 {
                (Value::List(Vec::new()), header_len)
            } else {
                let mut items = Vec::with_capacity(m as usize);
                let mut offset = header_len;
                for _ in 0..m {
                    let (value, consumed) = decode_value(&raw[offset..]);
                    items.push(value);
                    offset += consumed;
                }
                (Value::List(items), offset)
            }
        }
        _ => (Value::Null, raw.len()),
    }
}

/// Returns the line (including its leading sigil, excluding the trailing
/// CRLF) and the number of bytes consumed including that CRLF.
fn take_line(raw: &[u8]) -> (&[u8], usize) {
    for i in 0..raw.len().saturating_sub(1) {
        if raw[i] == b'\r' && raw[i + 1] == b'\n' {
            return (&raw[..i], i + 2);
        }
    }
    (raw, raw.len())
}

/// A bytes-oriented view of a reply for callers that want to write results
/// to a file-like sink without per-element allocation: each scalar
/// element's body bytes, each followed by a `\n`, recursively for nested
/// lists. A top-level scalar has no trailing `\n` added.
pub fn reply_to_bytes(reply: &Reply) -> Vec<u8> {
    let value = decode_reply(reply);
    let mut out = Vec::new();
    write_value_bytes(&value, &mut out, false);
    out
}

fn write_value_bytes(value: &Value, out: &mut Vec<u8>, as_list_element: bool) {
    match value {
        Value::List(items) => {
            for item in items {
                write_value_bytes(item, out, true);
            }
        }
        scalar => {
            out.extend_from_slice(&scalar_bytes(scalar));
            if as_list_element {
                out.push(b'\n');
            }
        }
    }
}

fn scalar_bytes(value: &Value) -> Vec<u8> {
    match value {
        Value::Text(s) => s.clone().into_bytes(),
        Value::Int(n) => n.to_string().into_bytes(),
        Value::Bytes(b) => b.clone(),
        Value::Null => Vec::new(),
        Value::Error(e) => e.clone().into_bytes(),
        Value::List(_) => unreachable!("lists are handled by write_value_bytes"),
    }
}
