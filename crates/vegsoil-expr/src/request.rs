//! Request bodies for map registration and image export.

use crate::encode::Expression;
use crate::image::check_scale;
use crate::{ExprError, Image, Result};
use serde::{Deserialize, Serialize};

/// Output encoding requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileFormat {
    /// GeoTIFF file export.
    GeoTiff,
    /// JPEG or PNG map tiles, chosen by the service.
    AutoJpegPng,
}

// ============================================================================
// Export
// ============================================================================

/// An export-to-Drive job description.
///
/// The scale is applied by wrapping the image in `clipToBoundsAndScale`,
/// so the exported expression always ends with that step.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    image: Image,
    description: String,
    scale: f64,
    folder: Option<String>,
    file_format: FileFormat,
    max_pixels: Option<u64>,
}

impl ExportRequest {
    /// Export `image` to Drive under `description` at `scale` meters.
    ///
    /// The description doubles as the output filename prefix.
    pub fn to_drive(image: Image, description: impl Into<String>, scale: f64) -> Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ExprError::Empty("export description"));
        }
        let scale = check_scale(scale)?;
        Ok(Self {
            image,
            description,
            scale,
            folder: None,
            file_format: FileFormat::GeoTiff,
            max_pixels: None,
        })
    }

    /// Write into a named Drive folder instead of the Drive root.
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Raise the service's pixel limit for this export. Zero is rejected.
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Result<Self> {
        if max_pixels == 0 {
            return Err(ExprError::InvalidMaxPixels(max_pixels));
        }
        self.max_pixels = Some(max_pixels);
        Ok(self)
    }

    /// Image being exported, without the export scale step.
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Task description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Export scale in meters.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Drive folder, if any.
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    /// Expression actually submitted, including the export scale step.
    pub fn expression(&self) -> Result<Expression> {
        let scaled = self.image.clone().clip_to_bounds_and_scale(self.scale)?;
        Ok(scaled.to_expression())
    }

    /// Body for `projects/{project}/image:export`.
    pub fn body(&self) -> Result<ExportImageBody> {
        Ok(ExportImageBody {
            expression: self.expression()?,
            description: self.description.clone(),
            file_export_options: FileExportOptions {
                file_format: self.file_format,
                drive_destination: DriveDestination {
                    folder: self.folder.clone(),
                    filename_prefix: self.description.clone(),
                },
            },
            max_pixels: self.max_pixels.map(|n| n.to_string()),
        })
    }
}

/// JSON body of an image export call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportImageBody {
    /// Encoded image.
    pub expression: Expression,
    /// Task description.
    pub description: String,
    /// Output format and destination.
    pub file_export_options: FileExportOptions,
    /// int64 values travel as JSON strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pixels: Option<String>,
}

/// Output format and destination of a file export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileExportOptions {
    /// Output encoding.
    pub file_format: FileFormat,
    /// Drive target.
    pub drive_destination: DriveDestination,
}

/// Drive location of exported files.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveDestination {
    /// Folder name; the Drive root when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Prefix of the written file names.
    pub filename_prefix: String,
}

// ============================================================================
// Map
// ============================================================================

/// A request to make an image viewable as map tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRequest {
    image: Image,
}

impl MapRequest {
    /// Map tiles for `image`.
    pub fn new(image: Image) -> Self {
        Self { image }
    }

    /// Image being displayed.
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Body for `projects/{project}/maps`.
    pub fn body(&self) -> MapBody {
        MapBody {
            expression: self.image.to_expression(),
            file_format: FileFormat::AutoJpegPng,
        }
    }
}

/// JSON body of a map registration call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapBody {
    /// Encoded image.
    pub expression: Expression,
    /// Tile encoding.
    pub file_format: FileFormat,
}
