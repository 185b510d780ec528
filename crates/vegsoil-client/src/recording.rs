//! In-memory [`EarthEngine`] that records requests instead of sending them.

use crate::api::{EarthEngine, ExportTask, MapLayer, TaskState};
use crate::{ClientError, Result};
use std::sync::Mutex;
use tracing::info;
use vegsoil_expr::{ExportImageBody, ExportRequest, MapBody, MapRequest};

/// Base URL used for synthetic tile URLs.
const DRY_RUN_BASE_URL: &str = "dry-run://earthengine";

/// A call received by a [`RecordingClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// `add_layer` with the body that would have been sent.
    AddLayer {
        /// Layer label.
        label: String,
        /// The request as given.
        request: MapRequest,
        /// Request body.
        body: MapBody,
    },
    /// `export_image` with the body that would have been sent.
    Export {
        /// The request as given.
        request: ExportRequest,
        /// Request body.
        body: ExportImageBody,
    },
}

/// Records every call in order and answers with synthetic resource names.
#[derive(Debug)]
pub struct RecordingClient {
    project: String,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingClient {
    /// Create an empty recorder for `project`.
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the calls received so far.
    pub fn calls(&self) -> Result<Vec<RecordedCall>> {
        let calls = self.calls.lock().map_err(|_| ClientError::LockPoisoned)?;
        Ok(calls.clone())
    }

    /// Append a call and return its zero-based position.
    fn record(&self, call: RecordedCall) -> Result<usize> {
        let mut calls = self.calls.lock().map_err(|_| ClientError::LockPoisoned)?;
        calls.push(call);
        Ok(calls.len() - 1)
    }
}

impl EarthEngine for RecordingClient {
    fn add_layer(&self, name: &str, request: &MapRequest) -> Result<MapLayer> {
        let body = request.body();
        let index = self.record(RecordedCall::AddLayer {
            label: name.to_string(),
            request: request.clone(),
            body,
        })?;

        let map_name = format!("projects/{}/maps/dry-run-{}", self.project, index);
        info!(layer = name, map = %map_name, "Map layer recorded (dry run)");
        Ok(MapLayer::new(name, map_name, DRY_RUN_BASE_URL))
    }

    fn export_image(&self, request: &ExportRequest) -> Result<ExportTask> {
        let body = request.body()?;
        let index = self.record(RecordedCall::Export {
            request: request.clone(),
            body,
        })?;

        let task = ExportTask {
            name: format!("projects/{}/operations/DRY-RUN-{}", self.project, index),
            description: request.description().to_string(),
            state: TaskState::Pending,
            create_time: None,
        };
        info!(description = %task.description, task = %task.name, "Export recorded (dry run)");
        Ok(task)
    }
}
