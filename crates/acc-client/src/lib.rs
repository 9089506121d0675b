//! acc-client - Autodesk Construction Cloud API client
//!
//! All authenticated operations flow through a [`Session`], which owns the
//! user's tokens, refreshes them on 401, and routes every request to the
//! hub's region.
//!
//! # Example
//!
//! ```no_run
//! use acc_client::Session;
//! use acc_core::{ClientConfig, Credentials, HubId};
//!
//! # async fn example() -> acc_core::Result<()> {
//! let config = ClientConfig::builder("my-client-id")
//!     .client_secret("my-client-secret")
//!     .build()?;
//! let credentials = Credentials::default()
//!     .with_three_leg_token("access-token")
//!     .with_refresh_token("refresh-token");
//! let session = Session::initialize(config, &credentials)?;
//!
//! let hub = HubId::new("b.1234")?;
//! session.resolve_region(hub.as_str()).await?;
//! for project in session.get_projects(&hub).await? {
//!     println!("{}: {}", project.id, project.name());
//! }
//! # Ok(())
//! # }
//! ```

mod aggregate;
pub mod cost_container;
mod endpoints;
pub mod http;
pub mod oauth;
pub mod region;
pub mod resource;
mod resources;
mod search;
pub mod session;

pub use cost_container::{ContainerResolution, ResolutionStep};
pub use http::{REGION_HEADER, Upload};
pub use oauth::{OAuthClient, TokenResponse};
pub use region::{RegionDecision, RegionSource};
pub use resource::CollectionResource;
pub use session::Session;
