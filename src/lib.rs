//! # irrq
//!
//! A blocking client for the IRRd query protocol with:
//! - Persistent whois sessions with keepalive and client identification
//! - Exact reassembly of length-framed replies split across TCP reads
//! - As-set / route-set expansion and route lookups
//! - De-duplicated prefix lists ready for aggregation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        IrrClient                             │
//! │          (members / routes / prefix lists)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Connection                             │
//! │          (open + handshake, query, close)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Command   │          │  Response   │
//!   │   Sender    │          │   Decoder   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Payload   │
//!                           │ Accumulator │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;
pub mod prefix;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{IrrError, Result};
pub use config::Config;
pub use client::IrrClient;
pub use network::Connection;
pub use prefix::PrefixList;
pub use protocol::ProtocolFamily;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of irrq
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
