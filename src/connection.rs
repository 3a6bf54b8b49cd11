/*!
 * Byte-stream connection abstraction
 *
 * The engine borrows an already-open reliable byte stream for the duration
 * of each operation; it never owns a socket and never retries or
 * reconnects (spec'd as an external collaborator). [`Connection`] is the
 * interface the orchestrator and codec need; [`TcpConnection`] is the one
 * concrete implementation this crate ships, built the same way the
 * teacher's demo client (`examples/client.rs` in the upstream server repo)
 * talks to a RESP server: a plain blocking [`std::net::TcpStream`].
 */

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, trace};

/// The I/O primitives the protocol engine needs from a connection.
///
/// A line is returned without its terminating `\r\n`; `read_exact` returns
/// exactly `n` bytes or an `UnexpectedEof` error. Both must loop internally
/// against a stream that may deliver fewer bytes than requested per call.
pub trait Connection {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;
    fn read_line_until_crlf(&mut self) -> io::Result<Vec<u8>>;
    fn read_exact(&mut self, n: usize) -> io::Result<Vec<u8>>;
    fn close(&mut self) -> io::Result<()>;
}

impl<T: Connection + ?Sized> Connection for &mut T {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all(bytes)
    }
    fn read_line_until_crlf(&mut self) -> io::Result<Vec<u8>> {
        (**self).read_line_until_crlf()
    }
    fn read_exact(&mut self, n: usize) -> io::Result<Vec<u8>> {
        (**self).read_exact(n)
    }
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Options accepted by [`connect`]. `host`/`port` are the only fields
/// spec'd externally; the timeouts are this crate's own addition, mirroring
/// the per-stream timeouts the teacher's integration tests set directly on
/// a `TcpStream` (`tests/large_payloads.rs`), surfaced here so callers don't
/// need to downcast the connection handle to configure them.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        ConnectOptions {
            host: "127.0.0.1".to_string(),
            port: 6379,
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

impl ConnectOptions {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ConnectOptions {
            host: host.into(),
            port,
            ..Default::default()
        }
    }
}

/// A blocking TCP connection to a RESP server.
///
/// Reads go through a `BufReader` so `read_line_until_crlf` doesn't issue a
/// syscall per byte; writes go through an independent clone of the same
/// socket so a read in progress never blocks a write (and vice versa).
pub struct TcpConnection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl TcpConnection {
    pub fn from_stream(stream: TcpStream) -> io::Result<Self> {
        let writer = stream.try_clone()?;
        Ok(TcpConnection {
            reader: BufReader::new(stream),
            writer,
        })
    }
}

/// Open a connection to a RESP server using the given options. All
/// failures are I/O errors; there is no retry — the caller decides policy.
pub fn connect(opts: &ConnectOptions) -> io::Result<TcpConnection> {
    let addr = (opts.host.as_str(), opts.port);
    debug!("connecting to {}:{}", opts.host, opts.port);
    let stream = match opts.connect_timeout {
        Some(timeout) => {
            let resolved = addr
                .to_socket_addrs()?
                .next()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no address resolved"))?;
            TcpStream::connect_timeout(&resolved, timeout)?
        }
        None => TcpStream::connect(addr)?,
    };
    stream.set_nodelay(true).ok();
    stream.set_read_timeout(opts.read_timeout)?;
    stream.set_write_timeout(opts.write_timeout)?;
    TcpConnection::from_stream(stream)
}

impl Connection for TcpConnection {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        trace!("write_all {} bytes", bytes.len());
        self.writer.write_all(bytes)
    }

    fn read_line_until_crlf(&mut self) -> io::Result<Vec<u8>> {
        read_line_until_crlf(&mut self.reader)
    }

    fn read_exact(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        debug!("closing connection");
        self.writer.shutdown(std::net::Shutdown::Both)
    }
}

/// Shared line-reading loop: reads bytes until a `\r\n` is seen, tolerating
/// short reads, and returns the line without its terminator.
pub(crate) fn read_line_until_crlf<R: BufRead>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut line = Vec::new();
    loop {
        let mut chunk = Vec::new();
        let n = reader.read_until(b'\n', &mut chunk)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream closed before a complete line was read",
            ));
        }
        line.extend_from_slice(&chunk);
        if line.ends_with(b"\r\n") {
            line.truncate(line.len() - 2);
            return Ok(line);
        }
        // `read_until` returned without a `\n` only at true EOF; loop back
        // so the `n == 0` branch above reports it as a truncation error.
    }
}

/// An in-memory connection over two byte buffers, used by tests and
/// doctests that exercise the codec/orchestrator without a live socket.
#[derive(Debug, Default)]
pub struct MockStream {
    pub written: Vec<u8>,
    inbound: io::Cursor<Vec<u8>>,
    closed: bool,
}

impl MockStream {
    /// Build a mock stream that will yield `inbound` to reads, byte for
    /// byte, and capture everything written to `written`.
    pub fn with_inbound(inbound: impl Into<Vec<u8>>) -> Self {
        MockStream {
            written: Vec::new(),
            inbound: io::Cursor::new(inbound.into()),
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Connection for MockStream {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.written.extend_from_slice(bytes);
        Ok(())
    }

    fn read_line_until_crlf(&mut self) -> io::Result<Vec<u8>> {
        read_line_until_crlf(&mut self.inbound)
    }

    fn read_exact(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        Read::read_exact(&mut self.inbound, &mut buf)?;
        Ok(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}
