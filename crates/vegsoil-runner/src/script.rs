//! The export script: build both products, show them, export them.

use crate::config::{ExportConfig, RunConfig};
use crate::products::{build_ndvi, build_smap};
use crate::{Result, RunnerError};
use serde_json::{json, Value};
use tracing::info;
use vegsoil_client::{BearerToken, EarthEngine, ExportTask, MapLayer};
use vegsoil_expr::{ExportRequest, Image, MapRequest};

/// Layer label of the NDVI product.
pub const NDVI_LAYER: &str = "ndvi_max";

/// Layer label of the SMAP product.
pub const SMAP_LAYER: &str = "smap_mean";

/// Project name used by dry runs when none is configured.
pub const DRY_RUN_PROJECT: &str = "dry-run";

/// Every request of a run, fully built before anything is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Map layers, NDVI first.
    pub layers: Vec<(String, MapRequest)>,
    /// Export requests, NDVI first.
    pub exports: Vec<ExportRequest>,
}

impl Plan {
    /// Build both products and the requests derived from them.
    pub fn from_config(config: &RunConfig) -> Result<Self> {
        let ndvi = build_ndvi(&config.ndvi, &config.region)?;
        let smap = build_smap(&config.smap, &config.region)?;

        let layers = if config.add_layers {
            vec![
                (NDVI_LAYER.to_string(), MapRequest::new(ndvi.clone())),
                (SMAP_LAYER.to_string(), MapRequest::new(smap.clone())),
            ]
        } else {
            Vec::new()
        };

        let exports = vec![
            export_request(ndvi, &config.ndvi.export)?,
            export_request(smap, &config.smap.export)?,
        ];

        Ok(Self { layers, exports })
    }

    /// All request bodies as one JSON document, for inspection.
    pub fn to_json(&self) -> Result<Value> {
        let mut layers = Vec::with_capacity(self.layers.len());
        for (label, request) in &self.layers {
            let body = serde_json::to_value(request.body())?;
            layers.push(json!({ "label": label, "body": body }));
        }

        let mut exports = Vec::with_capacity(self.exports.len());
        for request in &self.exports {
            exports.push(serde_json::to_value(request.body()?)?);
        }

        Ok(json!({ "layers": layers, "exports": exports }))
    }
}

fn export_request(image: Image, config: &ExportConfig) -> Result<ExportRequest> {
    let mut request = ExportRequest::to_drive(image, config.description.as_str(), config.scale)?;
    if let Some(folder) = &config.folder {
        request = request.with_folder(folder.as_str());
    }
    if let Some(max_pixels) = config.max_pixels {
        request = request.with_max_pixels(max_pixels)?;
    }
    Ok(request)
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    /// Registered layers, in registration order.
    pub layers: Vec<MapLayer>,
    /// Submitted export tasks, in submission order.
    pub tasks: Vec<ExportTask>,
}

/// Run the export script against `ee`.
///
/// The whole plan is built before the first call. The first service error
/// stops the run and is returned unchanged.
pub fn run(config: &RunConfig, ee: &dyn EarthEngine) -> Result<RunSummary> {
    let plan = Plan::from_config(config)?;
    info!("Region: {}", config.region);
    for request in &plan.exports {
        info!(
            product = request.description(),
            pipeline = %request.image(),
            "Product built"
        );
    }

    let mut summary = RunSummary::default();

    for (label, request) in &plan.layers {
        summary.layers.push(ee.add_layer(label, request)?);
    }

    for request in &plan.exports {
        info!(
            description = request.description(),
            scale = request.scale(),
            "Submitting export"
        );
        summary.tasks.push(ee.export_image(request)?);
    }

    info!(
        layers = summary.layers.len(),
        tasks = summary.tasks.len(),
        "Run complete"
    );
    Ok(summary)
}

// ============================================================================
// Project and credentials
// ============================================================================

/// Project for a live run: `cli` wins over the configured one.
pub fn resolve_project(cli: Option<String>, config: &RunConfig) -> Result<String> {
    cli.or_else(|| config.project.clone())
        .filter(|project| !project.trim().is_empty())
        .ok_or_else(|| {
            RunnerError::Config(
                "no Cloud project: pass --project or set `project` in the config".into(),
            )
        })
}

/// Project for a dry run, falling back to [`DRY_RUN_PROJECT`].
pub fn dry_run_project(cli: Option<String>, config: &RunConfig) -> String {
    resolve_project(cli, config).unwrap_or_else(|_| DRY_RUN_PROJECT.to_string())
}

/// Credentials for a live run: `token` wins over `EE_ACCESS_TOKEN`.
///
/// Requests are billed to `project`.
pub fn resolve_auth(token: Option<String>, project: &str) -> Result<BearerToken> {
    let auth = match token {
        Some(token) => BearerToken::new(token)?,
        None => BearerToken::from_env()?,
    };
    Ok(auth.with_user_project(project))
}
