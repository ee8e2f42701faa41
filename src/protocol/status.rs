//! Status line definitions
//!
//! Every reply starts with one status line: a code character, an optional
//! decimal length and an optional message.

use std::fmt;
use std::str::FromStr;

use crate::error::IrrError;

/// Message used for `F` replies that carry no text
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Decoded status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// `A<len>` success, `len` payload bytes follow
    Data { len: usize },

    /// `C` success, no payload
    Complete,

    /// `D` key not found
    NotFound,

    /// `E` multiple copies of key
    KeyConflict,

    /// `F [message]` generic error
    Error { message: Option<String> },
}

impl Status {
    /// Wire code character
    pub fn code(&self) -> char {
        match self {
            Status::Data { .. } => 'A',
            Status::Complete => 'C',
            Status::NotFound => 'D',
            Status::KeyConflict => 'E',
            Status::Error { .. } => 'F',
        }
    }

    /// Decode a raw status line (newline already removed)
    pub fn parse_bytes(line: &[u8]) -> Result<Self, IrrError> {
        let text = std::str::from_utf8(line).map_err(|_| {
            IrrError::Protocol(format!(
                "invalid response '{}'",
                String::from_utf8_lossy(line)
            ))
        })?;
        text.parse()
    }
}

impl FromStr for Status {
    type Err = IrrError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end();
        let invalid = || IrrError::Protocol(format!("invalid response '{}'", line));

        let mut chars = line.chars();
        let code = chars.next().ok_or_else(invalid)?;
        let rest = chars.as_str();

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (digits, message) = rest.split_at(digits_end);

        // Only word characters and spaces may follow the length
        if !message
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace())
        {
            return Err(invalid());
        }

        match code {
            'A' => {
                if digits.is_empty() {
                    return Err(invalid());
                }
                let len = digits.parse::<usize>().map_err(|_| invalid())?;
                Ok(Status::Data { len })
            }
            'C' => Ok(Status::Complete),
            'D' => Ok(Status::NotFound),
            'E' => Ok(Status::KeyConflict),
            'F' => {
                let message = message.trim();
                Ok(Status::Error {
                    message: (!message.is_empty()).then(|| message.to_string()),
                })
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Data { len } => write!(f, "A{}", len),
            Status::Error {
                message: Some(message),
            } => write!(f, "F {}", message),
            other => write!(f, "{}", other.code()),
        }
    }
}
