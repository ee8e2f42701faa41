//! Command definitions
//!
//! Represents the commands a client sends to an IRR server.

use std::fmt;

use crate::error::IrrError;

/// Address family for route queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolFamily {
    V4,
    V6,
}

impl ProtocolFamily {
    /// Numeric family (4 or 6)
    pub fn number(self) -> u8 {
        match self {
            ProtocolFamily::V4 => 4,
            ProtocolFamily::V6 => 6,
        }
    }
}

impl TryFrom<u8> for ProtocolFamily {
    type Error = IrrError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(ProtocolFamily::V4),
            6 => Ok(ProtocolFamily::V6),
            other => Err(IrrError::UnknownFamily(other)),
        }
    }
}

impl fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A command in its typed form
///
/// `Display` renders the wire text without the trailing newline; framing is
/// added by [`encode_command`](super::encode_command).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `!!` keep the session open between replies
    Keepalive,

    /// `!n<client-id>` identify the client
    Identify { client_id: String },

    /// `!s<src1,src2>` restrict queries to source databases
    SetSources { sources: Vec<String> },

    /// `!i<object>[,1]` members of an as-set or route-set
    SetMembers { object: String, recursive: bool },

    /// `!g<object>` / `!6<object>` routes originated by an object
    Routes {
        object: String,
        family: ProtocolFamily,
    },

    /// Pre-formatted command text
    Raw(String),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Keepalive => f.write_str("!!"),
            Command::Identify { client_id } => write!(f, "!n{}", client_id),
            Command::SetSources { sources } => write!(f, "!s{}", sources.join(",")),
            Command::SetMembers { object, recursive } => {
                write!(f, "!i{}", object)?;
                if *recursive {
                    f.write_str(",1")?;
                }
                Ok(())
            }
            Command::Routes { object, family } => match family {
                ProtocolFamily::V4 => write!(f, "!g{}", object),
                ProtocolFamily::V6 => write!(f, "!6{}", object),
            },
            Command::Raw(text) => f.write_str(text),
        }
    }
}
