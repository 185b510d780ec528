//! # vegsoil-expr
//!
//! Typed description of the server-side image computations sent to the
//! Earth Engine REST API.
//!
//! Nothing in this crate touches pixels. An [`Image`] is a recipe: a public
//! image collection, a temporal reduction and an ordered list of operations
//! (clip, reproject, resolution reduction). The recipe is encoded into the
//! REST `Expression` graph format by [`Expression::encode`] and wrapped into
//! request bodies by [`ExportRequest`] and [`MapRequest`].
//!
//! ## Example
//!
//! ```
//! use vegsoil_expr::{ExportRequest, ImageCollection, Reducer, Region};
//!
//! let conus = Region::CONUS;
//! let ndvi = ImageCollection::load("MODIS/006/MOD13A2")?
//!     .reduce(Reducer::Max)
//!     .clip(&conus)
//!     .reproject("EPSG:4326", 5000.0)?
//!     .reduce_resolution(Reducer::Mean, 1024)?;
//!
//! let export = ExportRequest::to_drive(ndvi, "conus_ndvi", 5000.0)?;
//! let body = serde_json::to_value(export.body()?).unwrap();
//! assert_eq!(body["description"], "conus_ndvi");
//! # Ok::<(), vegsoil_expr::ExprError>(())
//! ```

mod encode;
mod error;
mod geometry;
mod image;
mod reducer;
mod request;

pub use encode::{Expression, Node};
pub use error::ExprError;
pub use geometry::Region;
pub use image::{Image, ImageCollection, ImageOp};
pub use reducer::Reducer;
pub use request::{
    DriveDestination, ExportImageBody, ExportRequest, FileExportOptions, FileFormat, MapBody,
    MapRequest,
};

/// Result type for expression building.
pub type Result<T> = std::result::Result<T, ExprError>;
