//! Transport seam
//!
//! A connection only needs a blocking byte stream it can shut down. TCP is
//! the production transport; tests plug in scripted streams.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

/// Blocking, bidirectional byte stream
pub trait Transport: Read + Write {
    /// Shut down both the read and write directions
    fn shutdown_both(&mut self) -> io::Result<()>;

    /// Peer description for logging
    fn peer_label(&self) -> String {
        "unknown".to_string()
    }
}

impl Transport for TcpStream {
    fn shutdown_both(&mut self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }

    fn peer_label(&self) -> String {
        self.peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}
