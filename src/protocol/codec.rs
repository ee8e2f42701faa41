//! Protocol codec
//!
//! Framing for outgoing commands and decoding of replies.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────────────────────────┬──────┐
//! │ Command text (`!i`, `!g`...) │ `\n` │
//! └──────────────────────────────┴──────┘
//! ```
//!
//! ### Response Format
//! ```text
//! ┌─────────────────────┬─────────────────┬────────────────────┐
//! │ Status line `A<n>\n`│ Payload (n)     │ Trailing `\nC\n`   │
//! └─────────────────────┴─────────────────┴────────────────────┘
//! ```
//! Status-only replies (`C`, `D`, `E`, `F`) consist of the status line alone.

use std::io::{self, Read, Write};

use bytes::{Buf, Bytes, BytesMut};

use super::{PayloadAccumulator, Status, UNKNOWN_ERROR};
use crate::config::Config;
use crate::error::{IrrError, Result};

/// Command terminator
pub const TERMINATOR: u8 = b'\n';

/// Longest status line accepted (1 KB)
pub const MAX_LINE_LENGTH: usize = 1024;

/// Limits applied while decoding one reply
#[derive(Debug, Clone, Copy)]
pub struct DecodeLimits {
    /// Max bytes requested per read
    pub chunk_size: usize,

    /// Largest accepted `A<len>`
    pub max_payload_size: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            chunk_size: 4096,
            max_payload_size: 64 * 1024 * 1024,
        }
    }
}

impl From<&Config> for DecodeLimits {
    fn from(config: &Config) -> Self {
        Self {
            chunk_size: config.read_chunk_size,
            max_payload_size: config.max_payload_size,
        }
    }
}

// =============================================================================
// Command Encoding
// =============================================================================

/// Frame command text for the wire
///
/// Appends exactly one newline. Text that already contains a line break would
/// be read by the server as two commands and is rejected.
pub fn encode_command(command: &str) -> Result<Bytes> {
    if command.contains(['\n', '\r']) {
        return Err(IrrError::Protocol(format!(
            "command contains a line break: {:?}",
            command
        )));
    }

    let mut message = BytesMut::with_capacity(command.len() + 1);
    message.extend_from_slice(command.as_bytes());
    message.extend_from_slice(&[TERMINATOR]);
    Ok(message.freeze())
}

/// Write a framed command, looping over partial writes
///
/// Returns the number of bytes sent. A write that accepts zero bytes means the
/// peer is gone.
pub fn write_command<W: Write>(writer: &mut W, mut message: Bytes) -> Result<usize> {
    let mut sent = 0;
    while message.has_remaining() {
        let n = match writer.write(message.chunk()) {
            Ok(0) => return Err(IrrError::write_broken()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        message.advance(n);
        sent += n;
    }
    writer.flush()?;
    Ok(sent)
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Read one chunk of at most `chunk_size` bytes onto the end of `buf`
///
/// A zero-length read means the peer closed the stream.
pub fn read_chunk<R: Read>(reader: &mut R, buf: &mut BytesMut, chunk_size: usize) -> Result<usize> {
    let start = buf.len();
    buf.resize(start + chunk_size, 0);

    let n = loop {
        match reader.read(&mut buf[start..]) {
            Ok(n) => break n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                buf.truncate(start);
                return Err(e.into());
            }
        }
    };
    buf.truncate(start + n);

    if n == 0 {
        return Err(IrrError::read_broken());
    }
    tracing::trace!(bytes = n, buffered = buf.len(), "read chunk");
    Ok(n)
}

/// Split the first complete line off `buf`, without its newline
pub fn take_line(buf: &mut BytesMut) -> Option<BytesMut> {
    let pos = buf.iter().position(|&b| b == TERMINATOR)?;
    let mut line = buf.split_to(pos + 1);
    line.truncate(pos);
    Some(line)
}

/// Read until `buf` holds a full line and return that line
///
/// Fails once more than [`MAX_LINE_LENGTH`] bytes arrive without a newline.
pub fn read_line<R: Read>(reader: &mut R, buf: &mut BytesMut, chunk_size: usize) -> Result<BytesMut> {
    loop {
        if let Some(line) = take_line(buf) {
            if line.len() > MAX_LINE_LENGTH {
                return Err(line_too_long(line.len()));
            }
            return Ok(line);
        }
        if buf.len() > MAX_LINE_LENGTH {
            return Err(line_too_long(buf.len()));
        }
        read_chunk(reader, buf, chunk_size)?;
    }
}

fn line_too_long(len: usize) -> IrrError {
    IrrError::Protocol(format!(
        "Status line too long: {} bytes without newline (max {})",
        len, MAX_LINE_LENGTH
    ))
}

/// Read and decode the status line at the front of the stream
pub fn read_status<R: Read>(reader: &mut R, buf: &mut BytesMut, chunk_size: usize) -> Result<Status> {
    let line = read_line(reader, buf, chunk_size)?;
    let status = Status::parse_bytes(&line)?;
    tracing::debug!(%status, "status line");
    Ok(status)
}

/// Read a complete reply
///
/// Returns `Ok(None)` for replies without data (`C`, `D`) and `Ok(Some(..))`
/// with exactly the declared bytes for `A<len>`, including `A0`. The
/// trailing `C` after a payload is consumed and checked. Bytes beyond the end
/// of the reply stay in `buf`.
pub fn read_response<R: Read>(
    reader: &mut R,
    buf: &mut BytesMut,
    limits: DecodeLimits,
) -> Result<Option<Bytes>> {
    let len = match read_status(reader, buf, limits.chunk_size)? {
        Status::Data { len } => len,
        Status::Complete => return Ok(None),
        Status::NotFound => {
            tracing::warn!("skipping key not found");
            return Ok(None);
        }
        Status::KeyConflict => return Err(IrrError::KeyConflict),
        Status::Error { message } => {
            return Err(IrrError::Protocol(
                message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ))
        }
    };

    if len > limits.max_payload_size {
        return Err(IrrError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            len, limits.max_payload_size
        )));
    }

    let payload = read_payload(reader, buf, len, limits.chunk_size)?;
    read_trailer(reader, buf, limits.chunk_size)?;
    Ok(Some(payload))
}

/// Collect exactly `len` payload bytes, starting with what is already buffered
fn read_payload<R: Read>(
    reader: &mut R,
    buf: &mut BytesMut,
    len: usize,
    chunk_size: usize,
) -> Result<Bytes> {
    let mut acc = PayloadAccumulator::new(len);
    acc.feed(buf);

    while !acc.is_complete() {
        tracing::debug!(received = acc.received(), declared = len, "awaiting payload");
        read_chunk(reader, buf, chunk_size)?;
        acc.feed(buf);
    }

    tracing::debug!(declared = acc.declared(), "payload complete");
    Ok(acc.finish())
}

/// Consume the status line that closes a data reply
///
/// The payload is normally followed by its own newline before `C`; blank
/// lines are skipped.
fn read_trailer<R: Read>(reader: &mut R, buf: &mut BytesMut, chunk_size: usize) -> Result<()> {
    loop {
        let line = read_line(reader, buf, chunk_size)?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        return match Status::parse_bytes(&line)? {
            Status::Complete => Ok(()),
            other => Err(IrrError::Protocol(format!(
                "unexpected trailing status '{}' after payload",
                other
            ))),
        };
    }
}
