//! The service surface used by the export script and its result types.

use crate::{ClientError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vegsoil_expr::{ExportRequest, MapRequest};

/// The remote platform, as seen by the script.
///
/// Both calls only describe work: the service evaluates map tiles lazily and
/// runs exports as background tasks on its own infrastructure.
pub trait EarthEngine {
    /// Register an image for interactive map display.
    fn add_layer(&self, name: &str, request: &MapRequest) -> Result<MapLayer>;

    /// Submit an export task. Returns as soon as the task is queued.
    fn export_image(&self, request: &ExportRequest) -> Result<ExportTask>;
}

/// A registered map layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLayer {
    /// Local label for the layer.
    pub label: String,
    /// Resource name, `projects/{project}/maps/{id}`.
    pub name: String,
    /// XYZ tile URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub tile_url: String,
}

impl MapLayer {
    pub(crate) fn new(label: &str, name: String, base_url: &str) -> Self {
        let tile_url = format!(
            "{}/v1/{}/tiles/{{z}}/{{x}}/{{y}}",
            base_url.trim_end_matches('/'),
            name
        );
        Self {
            label: label.to_string(),
            name,
            tile_url,
        }
    }
}

/// State of a background task as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Queued, not started.
    Pending,
    /// Computing.
    Running,
    /// Cancellation requested, not yet finished.
    Cancelling,
    /// Output written.
    Succeeded,
    /// Cancelled before completion.
    Cancelled,
    /// Stopped with an error.
    Failed,
    /// A state this client does not know.
    #[serde(other)]
    Unknown,
}

/// A submitted export task.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTask {
    /// Operation name, `projects/{project}/operations/{id}`.
    pub name: String,
    /// Task description.
    pub description: String,
    /// State at submission time.
    pub state: TaskState,
    /// Creation time, when reported.
    pub create_time: Option<DateTime<Utc>>,
}

impl ExportTask {
    /// Task id (last segment of the operation name).
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Parse the long-running `Operation` returned by an export call.
    ///
    /// `description` is used when the operation metadata omits it.
    pub fn from_operation(body: &str, description: &str) -> Result<Self> {
        let op: Operation = serde_json::from_str(body)?;
        if op.name.is_empty() {
            return Err(ClientError::UnexpectedResponse(
                "operation has no name".into(),
            ));
        }

        let metadata = op.metadata.unwrap_or_default();
        let state = match (metadata.state, op.done) {
            (Some(state), _) => state,
            (None, false) => TaskState::Pending,
            (None, true) => TaskState::Unknown,
        };

        Ok(Self {
            name: op.name,
            description: metadata
                .description
                .unwrap_or_else(|| description.to_string()),
            state,
            create_time: metadata.create_time,
        })
    }
}

/// Google long-running operation, reduced to the fields read here.
#[derive(Debug, Deserialize)]
struct Operation {
    #[serde(default)]
    name: String,
    #[serde(default)]
    metadata: Option<OperationMetadata>,
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationMetadata {
    state: Option<TaskState>,
    description: Option<String>,
    create_time: Option<DateTime<Utc>>,
}
