//! HTTPS implementation of [`EarthEngine`].

use crate::api::{EarthEngine, ExportTask, MapLayer};
use crate::auth::Auth;
use crate::{ClientError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use vegsoil_expr::{ExportRequest, MapRequest};

/// Public Earth Engine REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://earthengine.googleapis.com";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Earth Engine REST client bound to one Cloud project.
pub struct RestClient {
    base_url: String,
    project: String,
    client: reqwest::blocking::Client,
    auth: Box<dyn Auth>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("project", &self.project)
            .finish()
    }
}

impl RestClient {
    /// Create a client for `project` against the public endpoint.
    pub fn new(project: impl Into<String>, auth: impl Auth + 'static) -> Result<Self> {
        Self::with_base_url(project, DEFAULT_BASE_URL, auth)
    }

    /// Create a client against a specific endpoint.
    pub fn with_base_url(
        project: impl Into<String>,
        base_url: impl Into<String>,
        auth: impl Auth + 'static,
    ) -> Result<Self> {
        let project = project.into();
        if project.trim().is_empty() {
            return Err(ClientError::Config("no Cloud project configured".into()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project,
            client,
            auth: Box::new(auth),
        })
    }

    /// Cloud project id.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Endpoint base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the map registration call.
    pub fn maps_url(&self) -> String {
        format!("{}/v1/projects/{}/maps", self.base_url, self.project)
    }

    /// URL of the image export call.
    pub fn export_url(&self) -> String {
        format!("{}/v1/projects/{}/image:export", self.base_url, self.project)
    }

    /// POST a JSON body and return the response text of a 2xx reply.
    fn post_json<T: Serialize>(&self, url: &str, body: &T) -> Result<String> {
        let mut headers = Vec::new();
        self.auth.sign_request(&mut headers)?;

        let mut request = self.client.post(url).json(body);
        for (key, value) in &headers {
            request = request.header(key.as_str(), value.as_str());
        }

        debug!(url, "POST");
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }
        Ok(text)
    }
}

impl EarthEngine for RestClient {
    fn add_layer(&self, name: &str, request: &MapRequest) -> Result<MapLayer> {
        let body = request.body();
        let json = serde_json::to_string(&body)?;
        debug!(layer = name, body = %json, "map request");

        let text = self.post_json(&self.maps_url(), &body)?;
        let map: MapResponse = serde_json::from_str(&text)?;
        if map.name.is_empty() {
            return Err(ClientError::UnexpectedResponse("map has no name".into()));
        }

        let layer = MapLayer::new(name, map.name, &self.base_url);
        info!(layer = name, tiles = %layer.tile_url, "Map layer registered");
        Ok(layer)
    }

    fn export_image(&self, request: &ExportRequest) -> Result<ExportTask> {
        let body = request.body()?;
        let json = serde_json::to_string(&body)?;
        debug!(description = request.description(), body = %json, "export request");

        let text = self.post_json(&self.export_url(), &body)?;
        let task = ExportTask::from_operation(&text, request.description())?;
        info!(
            description = %task.description,
            task = %task.name,
            state = ?task.state,
            "Export task submitted"
        );
        Ok(task)
    }
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Build the error for a non-2xx reply, keeping the service's message.
pub(crate) fn api_error(status: StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ClientError::Api {
            code: envelope.error.code.unwrap_or(status.as_u16()),
            status: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => ClientError::Api {
            code: status.as_u16(),
            status: status.canonical_reason().unwrap_or_default().to_string(),
            message: body.trim().to_string(),
        },
    }
}
