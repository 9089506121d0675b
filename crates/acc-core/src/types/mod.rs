//! Core ACC types.
//!
//! These types enforce invariants at construction time, so a malformed
//! base URL or an empty identifier never reaches the network layer.

mod api_url;
mod ids;
mod region;

pub use api_url::{ApiUrl, DEFAULT_API_BASE};
pub use ids::{B_PREFIX, CostContainerId, HubId, ProjectId};
pub use region::Region;
