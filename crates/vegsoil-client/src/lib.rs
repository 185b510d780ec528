//! # vegsoil-client
//!
//! Earth Engine REST client for the two calls the export script needs:
//! registering an image for map display and submitting an export task.
//!
//! The service is reached through the [`EarthEngine`] trait so the script
//! can run against either:
//! - [`RestClient`]: HTTPS calls to `earthengine.googleapis.com` using a
//!   blocking `reqwest` client and an OAuth2 access token
//! - [`RecordingClient`]: an in-memory stand-in that records every request
//!   body, used for dry runs and tests
//!
//! Errors returned by the service are passed through unchanged as
//! [`ClientError::Api`]. Nothing is retried.
//!
//! ## Example
//!
//! ```no_run
//! use vegsoil_client::{BearerToken, EarthEngine, RestClient};
//! use vegsoil_expr::{ExportRequest, ImageCollection, Reducer, Region};
//!
//! let client = RestClient::new("my-project", BearerToken::from_env()?)?;
//! let smap = ImageCollection::load("NASA_USDA/HSL/SMAP10KM_soil_moisture")?
//!     .reduce(Reducer::Mean)
//!     .clip(&Region::CONUS);
//! let task = client.export_image(&ExportRequest::to_drive(smap, "smap_mean", 10000.0)?)?;
//! println!("Submitted {}", task.name);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod api;
mod auth;
mod error;
mod recording;
mod rest;

pub use api::{EarthEngine, ExportTask, MapLayer, TaskState};
pub use auth::{Auth, BearerToken, NoAuth, TOKEN_ENV_VAR};
pub use error::ClientError;
pub use recording::{RecordedCall, RecordingClient};
pub use rest::{RestClient, DEFAULT_BASE_URL};

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
