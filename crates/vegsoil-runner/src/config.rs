//! YAML run configuration.
//!
//! Every field defaults to the CONUS NDVI/SMAP export, so an empty file
//! (or no file at all) reproduces it exactly:
//!
//! ```yaml
//! project: my-ee-project
//! api_base_url: https://earthengine.googleapis.com
//! add_layers: true
//! region: { west: -125.48, south: 24.86, east: -65.93, north: 49.84 }
//! ndvi:
//!   collection: MODIS/006/MOD13A2
//!   reducer: max
//!   crs: EPSG:4326
//!   reproject_scale: 5000.0
//!   resolution_reducer: mean
//!   max_pixels: 1024
//!   export: { description: conus_ndvi, scale: 5000.0 }
//! smap:
//!   collection: NASA_USDA/HSL/SMAP10KM_soil_moisture
//!   reducer: mean
//!   export: { description: smap_mean, scale: 10000.0 }
//! ```

use crate::script::Plan;
use crate::{Result, RunnerError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use vegsoil_client::DEFAULT_BASE_URL;
use vegsoil_expr::{Reducer, Region};

/// MODIS 16-day 1 km vegetation indices.
pub const NDVI_COLLECTION: &str = "MODIS/006/MOD13A2";

/// SMAP 10 km soil moisture.
pub const SMAP_COLLECTION: &str = "NASA_USDA/HSL/SMAP10KM_soil_moisture";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Cloud project that owns the requests. Required unless dry-running.
    pub project: Option<String>,
    /// REST endpoint.
    pub api_base_url: String,
    /// Register both products as map layers before exporting.
    pub add_layers: bool,
    /// Clip region.
    pub region: Region,
    /// Vegetation product.
    pub ndvi: NdviConfig,
    /// Soil moisture product.
    pub smap: SmapConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            project: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            add_layers: true,
            region: Region::CONUS,
            ndvi: NdviConfig::default(),
            smap: SmapConfig::default(),
        }
    }
}

/// NDVI product: max composite, reprojected, then averaged down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NdviConfig {
    pub collection: String,
    pub reducer: Reducer,
    pub crs: String,
    pub reproject_scale: f64,
    pub resolution_reducer: Reducer,
    pub max_pixels: u32,
    pub export: ExportConfig,
}

impl Default for NdviConfig {
    fn default() -> Self {
        Self {
            collection: NDVI_COLLECTION.to_string(),
            reducer: Reducer::Max,
            crs: "EPSG:4326".to_string(),
            reproject_scale: 5000.0,
            resolution_reducer: Reducer::Mean,
            max_pixels: 1024,
            export: ExportConfig::new("conus_ndvi", 5000.0),
        }
    }
}

/// SMAP product: mean composite, clipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmapConfig {
    pub collection: String,
    pub reducer: Reducer,
    pub export: ExportConfig,
}

impl Default for SmapConfig {
    fn default() -> Self {
        Self {
            collection: SMAP_COLLECTION.to_string(),
            reducer: Reducer::Mean,
            export: ExportConfig::new("smap_mean", 10000.0),
        }
    }
}

/// Export target. `description` and `scale` are required when the block
/// is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Task description and output filename prefix.
    pub description: String,
    /// Output scale in meters.
    pub scale: f64,
    /// Drive folder; Drive root when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Pixel limit override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pixels: Option<u64>,
}

impl ExportConfig {
    /// Export to the Drive root with the service's default pixel limit.
    pub fn new(description: impl Into<String>, scale: f64) -> Self {
        Self {
            description: description.into(),
            scale,
            folder: None,
            max_pixels: None,
        }
    }
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parse and validate configuration from YAML text.
///
/// An empty document yields [`RunConfig::default`].
pub fn load_config_from_str(yaml: &str) -> Result<RunConfig> {
    let config: RunConfig = if yaml.trim().is_empty() {
        RunConfig::default()
    } else {
        serde_yaml::from_str(yaml).map_err(|e| RunnerError::Config(e.to_string()))?
    };

    // Building the plan checks every id, scale and description.
    Plan::from_config(&config).map_err(|e| RunnerError::Config(e.to_string()))?;
    Ok(config)
}
