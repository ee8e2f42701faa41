//! Prefix lists
//!
//! The de-duplicated set of prefixes gathered for one or more objects. CIDR
//! aggregation is left to whatever consumes the list.

use std::collections::BTreeSet;
use std::fmt;

use crate::protocol::ProtocolFamily;

/// Unique prefixes of one protocol family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixList {
    family: ProtocolFamily,
    prefixes: BTreeSet<String>,
}

impl PrefixList {
    /// Create an empty list
    pub fn new(family: ProtocolFamily) -> Self {
        Self {
            family,
            prefixes: BTreeSet::new(),
        }
    }

    /// Build a list from prefix strings, dropping duplicates
    pub fn from_prefixes<I, S>(family: ProtocolFamily, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            family,
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Add prefixes to the list
    pub fn extend<I, S>(&mut self, prefixes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes.extend(prefixes.into_iter().map(Into::into));
    }

    pub fn family(&self) -> ProtocolFamily {
        self.family
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    /// Prefixes in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.prefixes.into_iter().collect()
    }
}

impl fmt::Display for PrefixList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prefix in self.iter() {
            writeln!(f, "{}", prefix)?;
        }
        Ok(())
    }
}
