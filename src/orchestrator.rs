/*!
 * Connection orchestration: single requests, pipelines, sessions, and the
 * dependent-step compose operator.
 *
 * Two layers are exposed. [`execute`]/[`execute_pipeline`] are one-shot,
 * stateless helpers over a borrowed [`Connection`] — each call writes then
 * immediately reads back everything it wrote, so no state survives past
 * the call. [`Session`] is the stateful layer used by [`with_session`] and
 * [`pipe`]: it tracks the per-connection state machine from the spec (see
 * [`ConnectionState`]) so a caller that splits writes from reads gets a
 * real `InvalidState` error instead of silently desyncing request/reply
 * pairing.
 */

use log::{debug, warn};

use crate::codec::{encode_request, read_n_replies, read_reply, reply_to_bytes};
use crate::connection::{connect, Connection, ConnectOptions, TcpConnection};
use crate::error::{Error, Result};
use crate::reply::Reply;
use crate::request::Request;

/// Per-connection state, transitioning strictly as described in the spec:
/// `Idle -> Writing` on any write, `Writing -> AwaitingReply(N)` once the
/// write is flushed, `AwaitingReply(N) -> AwaitingReply(N-1)` per reply
/// read, `AwaitingReply(0) -> Idle`, and any state `-> Closed` on close or
/// a fatal I/O error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Writing,
    AwaitingReply(usize),
    Closed,
}

/// Write a single request, then read back its reply. Request/reply
/// pairing needs no bookkeeping here: only one reply is ever in flight.
pub fn execute(req: &Request, conn: &mut impl Connection) -> Result<Reply> {
    let bytes = encode_request(req)?;
    conn.write_all(&bytes).map_err(Error::from_io)?;
    read_reply(conn)
}

/// Write all `requests` back-to-back, then read exactly `len(requests)`
/// replies in order. The count is authoritative — completion is never
/// inferred from the stream going idle.
pub fn execute_pipeline(requests: &[Request], conn: &mut impl Connection) -> Result<Vec<Reply>> {
    let mut buf = Vec::new();
    for req in requests {
        buf.extend_from_slice(&encode_request(req)?);
    }
    debug!("writing pipeline of {} requests", requests.len());
    conn.write_all(&buf).map_err(Error::from_io)?;
    read_n_replies(conn, requests.len())
}

/// The stateful orchestrator over one connection. Enforces the
/// write/await-reply state machine so a caller that uses the low-level
/// [`Session::write`]/[`Session::read_reply`] split can't start a new
/// write while replies are still pending.
pub struct Session<C: Connection> {
    conn: C,
    state: ConnectionState,
}

impl<C: Connection> Session<C> {
    pub fn new(conn: C) -> Self {
        Session {
            conn,
            state: ConnectionState::Idle,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Low-level: write one request without reading its reply. Errors with
    /// [`Error::InvalidState`] if replies from a previous write are still
    /// pending.
    pub fn write(&mut self, req: &Request) -> Result<()> {
        self.write_pipeline(std::slice::from_ref(req))
    }

    /// Low-level: write several requests back-to-back without reading any
    /// replies back.
    pub fn write_pipeline(&mut self, requests: &[Request]) -> Result<()> {
        self.begin_write(requests.len())?;
        let mut buf = Vec::new();
        for req in requests {
            buf.extend_from_slice(&encode_request(req)?);
        }
        self.conn.write_all(&buf).map_err(|e| self.poison(e))?;
        self.state = ConnectionState::AwaitingReply(requests.len());
        Ok(())
    }

    /// Low-level: read one reply, decrementing the count of replies this
    /// session is still awaiting. Errors with [`Error::InvalidState`] if no
    /// write is currently pending.
    pub fn read_reply(&mut self) -> Result<Reply> {
        match self.state {
            ConnectionState::AwaitingReply(n) if n > 0 => {
                let reply = match read_reply(&mut self.conn) {
                    Ok(r) => r,
                    Err(e) => return Err(self.poison(e)),
                };
                self.state = if n == 1 {
                    ConnectionState::Idle
                } else {
                    ConnectionState::AwaitingReply(n - 1)
                };
                Ok(reply)
            }
            ConnectionState::Closed => Err(Error::InvalidState(
                "cannot read from a closed session".to_string(),
            )),
            _ => Err(Error::InvalidState(
                "no write is pending; nothing to read".to_string(),
            )),
        }
    }

    /// Write a request and read back its reply in one call.
    pub fn execute(&mut self, req: &Request) -> Result<Reply> {
        self.write(req)?;
        self.read_reply()
    }

    /// Write a pipeline of requests and read back all of their replies, in
    /// order, in one call.
    pub fn execute_pipeline(&mut self, requests: &[Request]) -> Result<Vec<Reply>> {
        self.write_pipeline(requests)?;
        let mut replies = Vec::with_capacity(requests.len());
        for _ in 0..requests.len() {
            replies.push(self.read_reply()?);
        }
        Ok(replies)
    }

    /// Run a sequence of steps where each step after the first may build
    /// its request from the previous step's reply (see [`Step`]). Steps
    /// are not pipelined on the wire: each waits for its reply before the
    /// next step's request is constructed. Returns the last step's reply.
    pub fn pipe(&mut self, steps: Vec<Step<'_>>) -> Result<Reply> {
        let mut prev_bytes: Vec<u8> = Vec::new();
        let mut last: Option<Reply> = None;
        for step in steps {
            let req = match step {
                Step::Request(r) => r,
                Step::FromPrevious(f) => f(&prev_bytes),
            };
            let reply = self.execute(&req)?;
            prev_bytes = reply_to_bytes(&reply);
            last = Some(reply);
        }
        last.ok_or_else(|| Error::MalformedRequest("pipe requires at least one step".to_string()))
    }

    /// Close the underlying connection. Idempotent; also runs on drop so a
    /// panic unwinding through a session still closes it exactly once.
    pub fn close(&mut self) -> Result<()> {
        if self.state == ConnectionState::Closed {
            return Ok(());
        }
        self.state = ConnectionState::Closed;
        self.conn.close().map_err(Error::from_io)
    }

    fn begin_write(&mut self, _count: usize) -> Result<()> {
        match self.state {
            ConnectionState::AwaitingReply(n) if n > 0 => Err(Error::InvalidState(format!(
                "cannot start a new write while {n} replies are still pending"
            ))),
            ConnectionState::Closed => {
                Err(Error::InvalidState("connection is closed".to_string()))
            }
            _ => {
                self.state = ConnectionState::Writing;
                Ok(())
            }
        }
    }

    /// A fatal I/O error poisons the connection: the engine can't
    /// resynchronize mid-reply, so the state machine jumps straight to
    /// `Closed` regardless of how many replies were still pending.
    fn poison(&mut self, e: Error) -> Error {
        if matches!(e, Error::Io(_) | Error::Truncated | Error::ProtocolViolation(_)) {
            warn!("poisoning session after fatal error: {e}");
            self.state = ConnectionState::Closed;
        }
        e
    }
}

impl<C: Connection> Drop for Session<C> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// One step of a [`Session::pipe`] sequence.
pub enum Step<'a> {
    /// A concrete request, independent of any previous reply.
    Request(Request),
    /// Builds its request from the previous step's reply, viewed as the
    /// bytes-oriented decoding ([`crate::codec::reply_to_bytes`]).
    FromPrevious(Box<dyn FnOnce(&[u8]) -> Request + 'a>),
}

impl<'a> From<Request> for Step<'a> {
    fn from(r: Request) -> Self {
        Step::Request(r)
    }
}

impl<'a> Step<'a> {
    /// Build a step whose request is constructed from the previous reply's
    /// bytes-oriented view.
    pub fn from_previous(f: impl FnOnce(&[u8]) -> Request + 'a) -> Self {
        Step::FromPrevious(Box::new(f))
    }
}

/// Open a connection with `opts`, run `body` on a fresh [`Session`], and
/// close the connection on every exit path — success, an error return from
/// `body`, or a panic unwinding out of it (via [`Session`]'s `Drop`).
pub fn with_session<T>(
    opts: &ConnectOptions,
    body: impl FnOnce(&mut Session<TcpConnection>) -> Result<T>,
) -> Result<T> {
    let conn = connect(opts).map_err(Error::from_io)?;
    let mut session = Session::new(conn);
    let result = body(&mut session);
    session.close()?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::MockStream;
    use crate::value::Arg;

    fn set(key: &str, value: &str) -> Request {
        Request::new(
            "SET",
            Vec::new(),
            vec![Arg::text(key), Arg::text(value)],
        )
    }

    fn get(key: &str) -> Request {
        Request::new("GET", Vec::new(), vec![Arg::text(key)])
    }

    #[test]
    fn execute_round_trips_a_simple_string() {
        let mut m = MockStream::with_inbound(b"+OK\r\n".to_vec());
        let reply = execute(&set("hoge", "piyo"), &mut m).unwrap();
        assert_eq!(
            m.written,
            b"*3\r\n$3\r\nSET\r\n$4\r\nhoge\r\n$4\r\npiyo\r\n".to_vec()
        );
        assert_eq!(reply.raw(), b"+OK\r\n");
    }

    #[test]
    fn pipeline_returns_replies_in_order() {
        let mut m = MockStream::with_inbound(b"+OK\r\n$4\r\npiyo\r\n".to_vec());
        let replies = execute_pipeline(&[set("hoge", "piyo"), get("hoge")], &mut m).unwrap();
        assert_eq!(replies[0].raw(), b"+OK\r\n");
        assert_eq!(replies[1].raw(), b"$4\r\npiyo\r\n");
    }

    #[test]
    fn session_rejects_write_while_replies_pending() {
        let m = MockStream::with_inbound(b"+OK\r\n".to_vec());
        let mut session = Session::new(m);
        session.write(&set("hoge", "piyo")).unwrap();
        assert_eq!(session.state(), ConnectionState::AwaitingReply(1));
        let err = session.write(&get("hoge")).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn session_returns_to_idle_after_reading_all_replies() {
        let m = MockStream::with_inbound(b"+OK\r\n$4\r\npiyo\r\n".to_vec());
        let mut session = Session::new(m);
        session
            .write_pipeline(&[set("hoge", "piyo"), get("hoge")])
            .unwrap();
        assert_eq!(session.state(), ConnectionState::AwaitingReply(2));
        session.read_reply().unwrap();
        assert_eq!(session.state(), ConnectionState::AwaitingReply(1));
        session.read_reply().unwrap();
        assert_eq!(session.state(), ConnectionState::Idle);
    }

    #[test]
    fn reading_with_nothing_pending_is_invalid_state() {
        let m = MockStream::with_inbound(Vec::new());
        let mut session = Session::new(m);
        assert!(matches!(session.read_reply(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn pipe_feeds_previous_reply_into_the_next_step() {
        // SET hoge piyo -> +OK, GET hoge -> $4 piyo, then a function step
        // that sets fuga to whatever GET returned.
        let mut m =
            MockStream::with_inbound(b"+OK\r\n$4\r\npiyo\r\n+OK\r\n".to_vec());
        let mut session = Session::new(&mut m);
        let steps = vec![
            Step::Request(set("hoge", "piyo")),
            Step::Request(get("hoge")),
            Step::from_previous(|prev: &[u8]| {
                Request::new(
                    "SET",
                    prev.to_vec(),
                    vec![Arg::text("fuga"), Arg::Placeholder],
                )
            }),
        ];
        let last = session.pipe(steps).unwrap();
        assert_eq!(last.raw(), b"+OK\r\n");
        assert!(m.written.windows(4).any(|w| w == b"fuga"));
        assert!(m.written.windows(4).any(|w| w == b"piyo"));
    }

    #[test]
    fn drop_closes_the_session_exactly_once() {
        struct CountingClose(MockStream, std::rc::Rc<std::cell::Cell<u32>>);
        impl Connection for CountingClose {
            fn write_all(&mut self, b: &[u8]) -> std::io::Result<()> {
                self.0.write_all(b)
            }
            fn read_line_until_crlf(&mut self) -> std::io::Result<Vec<u8>> {
                self.0.read_line_until_crlf()
            }
            fn read_exact(&mut self, n: usize) -> std::io::Result<Vec<u8>> {
                self.0.read_exact(n)
            }
            fn close(&mut self) -> std::io::Result<()> {
                self.1.set(self.1.get() + 1);
                self.0.close()
            }
        }
        let count = std::rc::Rc::new(std::cell::Cell::new(0));
        {
            let conn = CountingClose(MockStream::with_inbound(b"+OK\r\n".to_vec()), count.clone());
            let mut session = Session::new(conn);
            session.execute(&set("a", "b")).unwrap();
            session.close().unwrap();
        }
        assert_eq!(count.get(), 1);
    }
}
