//! Shared test helpers
//!
//! Scripted in-memory transports and a loopback fake IRR server.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use irrq::network::{Connection, Transport};
use irrq::Config;
use tracing_subscriber::fmt::MakeWriter;

// =============================================================================
// Scripted Transport
// =============================================================================

/// In-memory transport that replays scripted read chunks
///
/// Each `read` returns at most one scripted chunk; an exhausted script reads
/// as EOF. Writes are recorded and can be limited to a few bytes per call.
pub struct ScriptedStream {
    reads: VecDeque<Vec<u8>>,
    written: Rc<RefCell<Vec<u8>>>,
    shutdowns: Rc<Cell<usize>>,
    max_write: usize,
}

impl ScriptedStream {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            reads: chunks.into(),
            written: Rc::new(RefCell::new(Vec::new())),
            shutdowns: Rc::new(Cell::new(0)),
            max_write: usize::MAX,
        }
    }

    /// Deliver `data` in reads of `size` bytes
    pub fn chunked(data: &[u8], size: usize) -> Self {
        Self::new(data.chunks(size.max(1)).map(|c| c.to_vec()).collect())
    }

    /// Deliver `data` in a single read
    pub fn whole(data: &[u8]) -> Self {
        Self::new(vec![data.to_vec()])
    }

    /// Accept at most `n` bytes per write (0 = broken peer)
    pub fn with_max_write(mut self, n: usize) -> Self {
        self.max_write = n;
        self
    }

    /// Handle to everything written so far
    pub fn written(&self) -> Rc<RefCell<Vec<u8>>> {
        Rc::clone(&self.written)
    }

    /// Handle to the shutdown counter
    pub fn shutdowns(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.shutdowns)
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(mut chunk) = self.reads.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            let rest = chunk.split_off(n);
            self.reads.push_front(rest);
        }
        Ok(n)
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.max_write);
        self.written.borrow_mut().extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for ScriptedStream {
    fn shutdown_both(&mut self) -> io::Result<()> {
        self.shutdowns.set(self.shutdowns.get() + 1);
        Ok(())
    }

    fn peer_label(&self) -> String {
        "scripted".to_string()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Reply to the `!n` identification command
pub const HANDSHAKE_REPLY: &[u8] = b"C\n";

/// Commands written by the default handshake
pub const HANDSHAKE_SENT: &str = "!!\n!ntest-1.0\n";

pub fn test_config() -> Config {
    Config::builder()
        .host("scripted")
        .client_name("test")
        .client_version("1.0")
        .build()
}

/// Handshake reply followed by `replies`
pub fn script(replies: &[&str]) -> Vec<u8> {
    let mut out = HANDSHAKE_REPLY.to_vec();
    for reply in replies {
        out.extend_from_slice(reply.as_bytes());
    }
    out
}

/// Establish a connection over a stream that delivers `data` in `size` byte reads
pub fn connect_chunked(data: &[u8], size: usize) -> Connection<ScriptedStream> {
    Connection::establish(ScriptedStream::chunked(data, size), &test_config())
        .expect("handshake should succeed")
}

/// Text written to the transport
pub fn sent(written: &Rc<RefCell<Vec<u8>>>) -> String {
    String::from_utf8(written.borrow().clone()).unwrap()
}

// =============================================================================
// Fake IRR Server
// =============================================================================

/// Loopback server answering commands from a fixed table
///
/// `!!` gets no reply, `!n` and `!s` get `C`, unknown commands get `D`.
pub struct FakeServer {
    pub addr: SocketAddr,
    handle: JoinHandle<Vec<String>>,
}

impl FakeServer {
    pub fn start(replies: &[(&str, &str)]) -> Self {
        let table: HashMap<String, Vec<u8>> = replies
            .iter()
            .map(|(cmd, reply)| (cmd.to_string(), reply.as_bytes().to_vec()))
            .collect();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut writer = stream.try_clone().unwrap();
            let reader = BufReader::new(stream);
            let mut received = Vec::new();

            for line in reader.lines() {
                let Ok(line) = line else { break };
                received.push(line.clone());

                let reply: &[u8] = if line == "!!" {
                    continue;
                } else if line.starts_with("!n") || line.starts_with("!s") {
                    &b"C\n"[..]
                } else {
                    table.get(&line).map(Vec::as_slice).unwrap_or(&b"D\n"[..])
                };

                // Dribble the reply out to split it across segments
                for piece in reply.chunks(3) {
                    if writer.write_all(piece).is_err() {
                        return received;
                    }
                    let _ = writer.flush();
                }
            }
            received
        });

        Self { addr, handle }
    }

    pub fn config(&self) -> Config {
        Config::builder()
            .host(self.addr.ip().to_string())
            .port(self.addr.port())
            .client_name("test")
            .client_version("1.0")
            .read_timeout_ms(5000)
            .write_timeout_ms(5000)
            .build()
    }

    /// Wait for the client to disconnect and return the commands received
    pub fn join(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

// =============================================================================
// Log Capture
// =============================================================================

/// Collects formatted log output written by a `tracing_subscriber::fmt` subscriber
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a debug-level subscriber writing into the returned capture
pub fn with_captured_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs.contents())
}
