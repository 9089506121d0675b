//! Regional routing for ACC requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// The regional shard a request is routed to.
///
/// Sent as the `region` header on every request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    #[default]
    US,
    EMEA,
    AUS,
    APAC,
}

impl Region {
    /// All regions, in the order used when probing a hub.
    pub const ALL: [Region; 4] = [Region::US, Region::APAC, Region::AUS, Region::EMEA];

    /// Header value for this region.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::US => "US",
            Region::EMEA => "EMEA",
            Region::AUS => "AUS",
            Region::APAC => "APAC",
        }
    }

    /// Returns true for the Asia-Pacific shards.
    pub fn is_asia_pacific(&self) -> bool {
        matches!(self, Region::AUS | Region::APAC)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US" => Ok(Region::US),
            "EMEA" | "EU" => Ok(Region::EMEA),
            "AUS" | "AU" => Ok(Region::AUS),
            "APAC" => Ok(Region::APAC),
            _ => Err(InvalidInputError::Region {
                value: s.to_string(),
            }
            .into()),
        }
    }
}
