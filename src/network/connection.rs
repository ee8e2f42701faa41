//! Connection
//!
//! One persistent session with an IRR server.
//!
//! ## Lifecycle
//! - `open` / `establish` return only after the handshake succeeded
//! - `close` consumes the connection, so it can run at most once
//! - a connection dropped without `close` is shut down in `Drop`

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::{Bytes, BytesMut};

use super::Transport;
use crate::config::Config;
use crate::error::{IrrError, Result};
use crate::protocol::{encode_command, read_response, write_command, Command, DecodeLimits};

/// An open, handshaken session with an IRR server
pub struct Connection<T: Transport = TcpStream> {
    /// Underlying byte stream
    transport: T,

    /// Bytes read past the end of the last reply
    buffer: BytesMut,

    /// Read chunk size and payload cap
    limits: DecodeLimits,

    /// Peer address for logging
    peer_addr: String,

    /// Cleared by `close` so `Drop` does not shut down twice
    open: bool,
}

impl Connection<TcpStream> {
    /// Connect to `config.host:config.port` and run the handshake
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        let addr = config.addr();
        let stream = connect(config).map_err(|source| IrrError::Connect {
            addr: addr.clone(),
            source,
        })?;

        // Small command lines, answered one at a time
        stream.set_nodelay(true)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        tracing::debug!("Connected to {}", addr);
        Self::establish(stream, config)
    }
}

impl<T: Transport> Connection<T> {
    /// Wrap an already connected transport and run the handshake
    ///
    /// Sends `!!` when keepalive is enabled, identifies the client with `!n`
    /// and selects sources with `!s` when configured. If any step fails the
    /// transport is shut down before the error is returned.
    pub fn establish(transport: T, config: &Config) -> Result<Self> {
        config.validate()?;

        let peer_addr = transport.peer_label();
        let mut conn = Self {
            transport,
            buffer: BytesMut::with_capacity(config.read_chunk_size),
            limits: DecodeLimits::from(config),
            peer_addr,
            open: true,
        };

        // On error `conn` is dropped here, which shuts the transport down
        conn.handshake(config)?;

        tracing::debug!("Session established with {}", conn.peer_addr);
        Ok(conn)
    }

    fn handshake(&mut self, config: &Config) -> Result<()> {
        if config.keepalive {
            // No reply is sent for `!!`
            self.send(&Command::Keepalive.to_string())?;
        }

        self.execute(&Command::Identify {
            client_id: config.client_id(),
        })?;

        if let Some(sources) = &config.sources {
            self.execute(&Command::SetSources {
                sources: sources.clone(),
            })?;
        }

        Ok(())
    }

    /// Send one command line
    ///
    /// The newline terminator is appended here.
    pub fn send(&mut self, command: &str) -> Result<()> {
        let message = encode_command(command)?;
        let sent = write_command(&mut self.transport, message)?;
        tracing::debug!("sent {} {}", command, sent);
        Ok(())
    }

    /// Read one reply as raw bytes
    ///
    /// `Ok(None)` means the server answered without data (`C` or `D`).
    pub fn receive_bytes(&mut self) -> Result<Option<Bytes>> {
        read_response(&mut self.transport, &mut self.buffer, self.limits)
    }

    /// Read one reply as text
    ///
    /// Invalid UTF-8 in the payload is replaced with U+FFFD.
    pub fn receive(&mut self) -> Result<Option<String>> {
        Ok(self.receive_bytes()?.map(|payload| {
            match String::from_utf8(payload.to_vec()) {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(
                        "Replacing invalid UTF-8 in {} byte payload from {} (first bad byte at {})",
                        payload.len(),
                        self.peer_addr,
                        e.utf8_error().valid_up_to()
                    );
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            }
        }))
    }

    /// Send a command and read its reply
    pub fn query(&mut self, command: &str) -> Result<Option<String>> {
        self.send(command)?;
        self.receive()
    }

    /// Send a typed command and read its reply
    pub fn execute(&mut self, command: &Command) -> Result<Option<String>> {
        self.query(&command.to_string())
    }

    /// Shut down both directions and release the transport
    pub fn close(mut self) -> Result<()> {
        self.open = false;
        self.transport.shutdown_both()?;
        tracing::debug!("Connection to {} closed", self.peer_addr);
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Bytes already read that belong to the next reply
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = self.transport.shutdown_both() {
            tracing::debug!("Shutdown of {} failed: {}", self.peer_addr, e);
        }
    }
}

/// Resolve and connect, honouring the connect timeout
fn connect(config: &Config) -> io::Result<TcpStream> {
    let addrs: Vec<SocketAddr> = (config.host.as_str(), config.port)
        .to_socket_addrs()?
        .collect();

    if config.connect_timeout_ms == 0 {
        return TcpStream::connect(&addrs[..]);
    }

    let timeout = Duration::from_millis(config.connect_timeout_ms);
    let mut last_err = None;
    for addr in &addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "could not resolve to any address",
        )
    }))
}
