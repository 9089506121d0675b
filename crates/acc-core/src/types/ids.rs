//! Identifier newtypes.
//!
//! ACC identifiers are opaque strings, but the same project is addressed as
//! `b.<uuid>` by the hub/project and data-management APIs and as the bare
//! `<uuid>` by cost, issues and account admin. These types keep the two
//! spellings explicit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, InvalidInputError};

/// Prefix used by the BIM 360 / ACC Docs APIs.
pub const B_PREFIX: &str = "b.";

fn validate(kind: &'static str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(InvalidInputError::Id {
            kind,
            value: value.to_string(),
            reason: "must not be empty".to_string(),
        }
        .into());
    }
    if value.contains('/') || value.chars().any(char::is_whitespace) {
        return Err(InvalidInputError::Id {
            kind,
            value: value.to_string(),
            reason: "must not contain '/' or whitespace".to_string(),
        }
        .into());
    }
    Ok(())
}

fn strip(value: &str) -> &str {
    value.strip_prefix(B_PREFIX).unwrap_or(value)
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier, rejecting empty values and path separators.
            pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
                let s = s.as_ref();
                validate($kind, s)?;
                Ok(Self(s.to_string()))
            }

            /// Returns the identifier as given.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier carries the `b.` prefix.
            pub fn has_b_prefix(&self) -> bool {
                self.0.starts_with(B_PREFIX)
            }

            /// The identifier without a `b.` prefix.
            pub fn without_b_prefix(&self) -> &str {
                strip(&self.0)
            }

            /// The identifier with a `b.` prefix.
            pub fn with_b_prefix(&self) -> String {
                if self.has_b_prefix() {
                    self.0.clone()
                } else {
                    format!("{}{}", B_PREFIX, self.0)
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

id_type!(
    /// A hub (account) identifier, usually `b.<uuid>`.
    HubId,
    "hub ID"
);

id_type!(
    /// A project identifier, with or without the `b.` prefix.
    ProjectId,
    "project ID"
);

id_type!(
    /// The identifier the cost-management subsystem uses for a project.
    ///
    /// Not reliably derivable from the [`ProjectId`]; see the cost container
    /// resolver in `acc-client`.
    CostContainerId,
    "cost container ID"
);
