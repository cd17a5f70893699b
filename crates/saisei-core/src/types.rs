//! Resource table for the running configuration.
//!
//! Every resource lives under [`CONFIGURATION_ROOT`]. Collections are
//! addressed with a trailing slash, single items by appending one
//! percent-encoded identifier segment.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// URL prefix under which all resources are addressed.
pub const CONFIGURATION_ROOT: &str = "/rest/top/configurations/running";

/// Remote resource collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Physical and virtual interfaces
    Interfaces,
    /// Hosts seen by the default forwarding table
    Hosts,
    /// Appliance users
    Users,
    /// Traffic policies
    Policies,
    /// Flow classes
    FlowClasses,
}

impl Resource {
    /// Returns the resource name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Interfaces => "interfaces",
            Self::Hosts => "hosts",
            Self::Users => "users",
            Self::Policies => "policies",
            Self::FlowClasses => "flow_classes",
        }
    }

    /// Returns the collection path below the configuration root.
    #[must_use]
    pub const fn segment(&self) -> &'static str {
        match self {
            Self::Interfaces => "interfaces",
            Self::Hosts => "fibs/fib0/hosts",
            Self::Users => "users",
            Self::Policies => "policies",
            Self::FlowClasses => "flow_classes",
        }
    }

    /// Returns all resources.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Interfaces,
            Self::Hosts,
            Self::Users,
            Self::Policies,
            Self::FlowClasses,
        ]
    }

    /// Path of the collection, e.g. `/rest/top/configurations/running/users/`.
    #[must_use]
    pub fn collection_path(&self) -> String {
        format!("{CONFIGURATION_ROOT}/{}/", self.segment())
    }

    /// Path of one item in the collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for identifiers that would not
    /// address a single item (empty, `.` or `..`).
    pub fn item_path(&self, id: &str) -> Result<String> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(Error::InvalidIdentifier(format!(
                "`{id}` does not name a single {} item",
                self.name()
            )));
        }
        Ok(format!(
            "{CONFIGURATION_ROOT}/{}/{}",
            self.segment(),
            urlencoding::encode(id)
        ))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|resource| resource.name() == s)
            .ok_or_else(|| Error::InvalidIdentifier(format!("unknown resource `{s}`")))
    }
}

/// Path of the configuration root itself.
#[must_use]
pub fn root_path() -> String {
    format!("{CONFIGURATION_ROOT}/")
}
