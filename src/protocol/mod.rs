//! Protocol Module
//!
//! Defines the IRRd query protocol spoken over a whois TCP session.
//!
//! ## Request Format
//! One ASCII command per line:
//! ```text
//! !!            keep the session open
//! !n<id>        identify the client
//! !s<sources>   select source databases
//! !i<obj>[,1]   set members (recursive with ,1)
//! !g<obj>       IPv4 routes
//! !6<obj>       IPv6 routes
//! ```
//!
//! ## Response Format
//! ```text
//! <code>[<len>][<msg>]\n[<len bytes of payload>][\nC\n]
//! ```
//!
//! ### Status Codes
//! - A: success, `len` payload bytes follow
//! - C: success, no data
//! - D: key not found
//! - E: multiple copies of key
//! - F: error, optional message

mod command;
mod status;
mod payload;
mod codec;

pub use command::{Command, ProtocolFamily};
pub use status::{Status, UNKNOWN_ERROR};
pub use payload::PayloadAccumulator;
pub use codec::{
    encode_command, write_command, read_chunk, read_line, read_status, read_response,
    take_line, DecodeLimits, MAX_LINE_LENGTH, TERMINATOR,
};
