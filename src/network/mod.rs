//! Network Module
//!
//! Client-side session handling.
//!
//! ## Architecture
//! - One blocking connection per caller
//! - Strict send-then-receive, one query in flight
//! - Transport abstracted so the decoder can be driven by any byte stream

mod connection;
mod transport;

pub use connection::Connection;
pub use transport::Transport;
