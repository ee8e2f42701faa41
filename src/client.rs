//! Client Module
//!
//! Registry queries built on top of a [`Connection`].
//!
//! ## Responsibilities
//! - Select source databases
//! - Expand as-sets and route-sets into their members
//! - Collect the routes registered for objects
//! - Build de-duplicated prefix lists for a set of objects

use std::collections::BTreeSet;
use std::net::TcpStream;

use crate::config::Config;
use crate::error::Result;
use crate::network::{Connection, Transport};
use crate::prefix::PrefixList;
use crate::protocol::{Command, ProtocolFamily};

/// High-level IRR query client
pub struct IrrClient<T: Transport = TcpStream> {
    conn: Connection<T>,
}

impl IrrClient<TcpStream> {
    /// Open a connection to the configured server
    pub fn connect(config: &Config) -> Result<Self> {
        Ok(Self::from_connection(Connection::open(config)?))
    }

    /// Run `f` against a fresh client and close it afterwards
    ///
    /// The connection is released on every path: explicitly when `f`
    /// succeeds, through `Drop` when `f` or the close fails.
    pub fn session<R, F>(config: &Config, f: F) -> Result<R>
    where
        F: FnOnce(&mut IrrClient) -> Result<R>,
    {
        let mut client = Self::connect(config)?;
        let out = f(&mut client)?;
        client.close()?;
        Ok(out)
    }
}

impl<T: Transport> IrrClient<T> {
    /// Wrap an established connection
    pub fn from_connection(conn: Connection<T>) -> Self {
        Self { conn }
    }

    /// Access the underlying connection for raw commands
    pub fn connection_mut(&mut self) -> &mut Connection<T> {
        &mut self.conn
    }

    /// Restrict subsequent queries to the given source databases
    pub fn set_sources(&mut self, sources: &[&str]) -> Result<()> {
        self.conn.execute(&Command::SetSources {
            sources: sources.iter().map(|s| s.to_string()).collect(),
        })?;
        Ok(())
    }

    /// Members of one as-set or route-set
    ///
    /// With `expand` the server resolves nested sets recursively. `Ok(None)`
    /// means the object is unknown or not a set.
    pub fn members(&mut self, object: &str, expand: bool) -> Result<Option<BTreeSet<String>>> {
        let reply = self.conn.execute(&Command::SetMembers {
            object: object.to_string(),
            recursive: expand,
        })?;
        Ok(reply.map(|text| text.split_whitespace().map(str::to_string).collect()))
    }

    /// Union of the members of several sets
    ///
    /// Objects without data contribute nothing.
    pub fn get_set<I, S>(&mut self, objects: I, expand: bool) -> Result<BTreeSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut all = BTreeSet::new();
        for object in objects {
            if let Some(members) = self.members(object.as_ref(), expand)? {
                all.extend(members);
            }
        }
        Ok(all)
    }

    /// Routes registered for one object, in server order
    pub fn routes(&mut self, object: &str, family: ProtocolFamily) -> Result<Vec<String>> {
        let reply = self.conn.execute(&Command::Routes {
            object: object.to_string(),
            family,
        })?;
        Ok(reply
            .map(|text| text.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default())
    }

    /// Prefix list for a set of objects
    ///
    /// Each object is expanded recursively; an object that is not a set
    /// (for example an aut-num) is queried for routes itself.
    pub fn prefix_list<I, S>(&mut self, objects: I, family: ProtocolFamily) -> Result<PrefixList>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut origins = BTreeSet::new();
        for object in objects {
            let object = object.as_ref();
            match self.members(object, true)? {
                Some(members) => origins.extend(members),
                None => {
                    origins.insert(object.to_string());
                }
            }
        }

        tracing::debug!("Collecting routes for {} objects", origins.len());

        let mut list = PrefixList::new(family);
        for origin in &origins {
            list.extend(self.routes(origin, family)?);
        }
        Ok(list)
    }

    /// Close the underlying connection
    pub fn close(self) -> Result<()> {
        self.conn.close()
    }
}
