//! # vegsoil-runner
//!
//! Exports two CONUS composites from Earth Engine:
//! 1. maximum MODIS NDVI (`MODIS/006/MOD13A2`), reprojected and averaged
//!    down to ~5 km, exported as `conus_ndvi`
//! 2. mean SMAP soil moisture (`NASA_USDA/HSL/SMAP10KM_soil_moisture`) at
//!    ~10 km, exported as `smap_mean`
//!
//! Both are clipped to the continental United States bounding box.
//!
//! The work happens on the service. This crate builds the two image
//! descriptions from a [`RunConfig`], turns them into a [`Plan`] of map
//! layers and export requests, and submits the plan through any
//! [`vegsoil_client::EarthEngine`] implementation with [`run`].
//!
//! ```
//! use vegsoil_client::RecordingClient;
//! use vegsoil_runner::{run, RunConfig};
//!
//! let client = RecordingClient::new("my-project");
//! let summary = run(&RunConfig::default(), &client)?;
//! assert_eq!(summary.tasks.len(), 2);
//! # Ok::<(), vegsoil_runner::RunnerError>(())
//! ```

pub mod config;
mod error;
pub mod products;
pub mod script;

pub use config::{load_config, load_config_from_str, ExportConfig, NdviConfig, RunConfig, SmapConfig};
pub use error::{Result, RunnerError};
pub use products::{build_ndvi, build_smap};
pub use script::{dry_run_project, resolve_auth, resolve_project, run, Plan, RunSummary};
