//! Image collections and chained image operations.

use crate::encode::{Expression, Node};
use crate::{ExprError, Reducer, Region, Result};

/// A public image collection identified by its asset id.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCollection {
    id: String,
}

impl ImageCollection {
    /// Refer to a collection by asset id, e.g. `MODIS/006/MOD13A2`.
    pub fn load(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ExprError::Empty("collection id"));
        }
        Ok(Self { id })
    }

    /// Asset id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Reduce every image in the collection to a single composite.
    pub fn reduce(self, reducer: Reducer) -> Image {
        Image {
            collection: self,
            reducer,
            steps: Vec::new(),
        }
    }

    /// Collection loader as a graph node.
    pub fn to_node(&self) -> Node {
        Node::call("ImageCollection.load", [("id", Node::constant(self.id.as_str()))])
    }
}

/// One server-side operation applied to an image.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOp {
    /// Restrict the image footprint to a region.
    Clip(Region),
    /// Resample into `crs` at `scale` meters per pixel.
    Reproject {
        /// CRS code, e.g. `EPSG:4326`.
        crs: String,
        /// Nominal scale in meters.
        scale: f64,
    },
    /// Aggregate source pixels into the output grid.
    ReduceResolution {
        /// Aggregation reducer.
        reducer: Reducer,
        /// Maximum number of source pixels per output pixel.
        max_pixels: u32,
    },
    /// Set the output scale of an export.
    ClipToBoundsAndScale {
        /// Scale in meters.
        scale: f64,
    },
}

impl ImageOp {
    /// Server-side algorithm name.
    pub fn algorithm(&self) -> &'static str {
        match self {
            ImageOp::Clip(_) => "Image.clip",
            ImageOp::Reproject { .. } => "Image.reproject",
            ImageOp::ReduceResolution { .. } => "Image.reduceResolution",
            ImageOp::ClipToBoundsAndScale { .. } => "Image.clipToBoundsAndScale",
        }
    }

    fn apply(&self, input: Node) -> Node {
        match self {
            ImageOp::Clip(region) => Node::call(
                self.algorithm(),
                [("input", input), ("geometry", region.to_node())],
            ),
            ImageOp::Reproject { crs, scale } => Node::call(
                self.algorithm(),
                [
                    ("image", input),
                    (
                        "crs",
                        Node::call("Projection", [("crs", Node::constant(crs.as_str()))]),
                    ),
                    ("scale", Node::constant(*scale)),
                ],
            ),
            ImageOp::ReduceResolution {
                reducer,
                max_pixels,
            } => Node::call(
                self.algorithm(),
                [
                    ("image", input),
                    ("reducer", reducer.to_node()),
                    ("maxPixels", Node::constant(*max_pixels)),
                ],
            ),
            ImageOp::ClipToBoundsAndScale { scale } => Node::call(
                self.algorithm(),
                [("input", input), ("scale", Node::constant(*scale))],
            ),
        }
    }
}

impl std::fmt::Display for ImageOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageOp::Clip(region) => write!(f, "clip({})", region),
            ImageOp::Reproject { crs, scale } => write!(f, "reproject({}, {} m)", crs, scale),
            ImageOp::ReduceResolution {
                reducer,
                max_pixels,
            } => write!(f, "reduceResolution({}, maxPixels={})", reducer, max_pixels),
            ImageOp::ClipToBoundsAndScale { scale } => {
                write!(f, "clipToBoundsAndScale({} m)", scale)
            }
        }
    }
}

/// A derived image: a reduced collection followed by ordered operations.
///
/// This is only a description. Building one never contacts the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    collection: ImageCollection,
    reducer: Reducer,
    steps: Vec<ImageOp>,
}

impl Image {
    /// Source collection.
    pub fn collection(&self) -> &ImageCollection {
        &self.collection
    }

    /// Temporal reducer applied to the collection.
    pub fn reducer(&self) -> Reducer {
        self.reducer
    }

    /// Operations applied after the reduction, in order.
    pub fn steps(&self) -> &[ImageOp] {
        &self.steps
    }

    /// Clip to a region.
    pub fn clip(self, region: &Region) -> Self {
        self.then(ImageOp::Clip(*region))
    }

    /// Reproject to `crs` at `scale` meters.
    pub fn reproject(self, crs: impl Into<String>, scale: f64) -> Result<Self> {
        let crs = crs.into();
        if crs.trim().is_empty() {
            return Err(ExprError::Empty("CRS code"));
        }
        let scale = check_scale(scale)?;
        Ok(self.then(ImageOp::Reproject { crs, scale }))
    }

    /// Aggregate up to `max_pixels` source pixels into each output pixel.
    pub fn reduce_resolution(self, reducer: Reducer, max_pixels: u32) -> Result<Self> {
        if max_pixels == 0 {
            return Err(ExprError::InvalidMaxPixels(u64::from(max_pixels)));
        }
        Ok(self.then(ImageOp::ReduceResolution {
            reducer,
            max_pixels,
        }))
    }

    /// Fix the output scale, as done for exports.
    pub fn clip_to_bounds_and_scale(self, scale: f64) -> Result<Self> {
        let scale = check_scale(scale)?;
        Ok(self.then(ImageOp::ClipToBoundsAndScale { scale }))
    }

    fn then(mut self, op: ImageOp) -> Self {
        self.steps.push(op);
        self
    }

    /// Full computation graph for this image.
    pub fn to_node(&self) -> Node {
        let reduced = Node::call(
            self.reducer.collection_algorithm(),
            [("collection", self.collection.to_node())],
        );
        self.steps.iter().fold(reduced, |input, op| op.apply(input))
    }

    /// Encoded expression for this image.
    pub fn to_expression(&self) -> Expression {
        Expression::encode(&self.to_node())
    }
}

impl std::fmt::Display for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.collection.id,
            self.reducer.collection_algorithm()
        )?;
        for op in &self.steps {
            write!(f, " -> {}", op)?;
        }
        Ok(())
    }
}

pub(crate) fn check_scale(scale: f64) -> Result<f64> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(ExprError::InvalidScale(scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ndvi() -> Image {
        ImageCollection::load("MODIS/006/MOD13A2")
            .unwrap()
            .reduce(Reducer::Max)
            .clip(&Region::CONUS)
            .reproject("EPSG:4326", 5000.0)
            .unwrap()
            .reduce_resolution(Reducer::Mean, 1024)
            .unwrap()
    }

    #[test]
    fn test_steps_recorded_in_order() {
        let image = ndvi();
        assert_eq!(image.reducer(), Reducer::Max);
        assert_eq!(
            image.steps(),
            &[
                ImageOp::Clip(Region::CONUS),
                ImageOp::Reproject {
                    crs: "EPSG:4326".to_string(),
                    scale: 5000.0
                },
                ImageOp::ReduceResolution {
                    reducer: Reducer::Mean,
                    max_pixels: 1024
                },
            ]
        );
    }

    #[test]
    fn test_expression_order() {
        // Arguments are visited in name order, so ids follow a post-order walk
        // with "crs" before "image" and "geometry" before "input".
        let expr = ndvi().to_expression();
        assert_eq!(
            expr.function_names(),
            vec![
                "Projection",
                "GeometryConstructors.BBox",
                "ImageCollection.load",
                "reduce.max",
                "Image.clip",
                "Image.reproject",
                "Reducer.mean",
                "Image.reduceResolution",
            ]
        );

        let root = &expr.values[&expr.result]["functionInvocationValue"];
        assert_eq!(root["functionName"], "Image.reduceResolution");
        assert_eq!(root["arguments"]["maxPixels"], json!({ "constantValue": 1024 }));
    }

    #[test]
    fn test_root_node_wraps_previous_step() {
        let node = ndvi().to_node();
        let reproject = node.argument("image").unwrap();
        assert_eq!(reproject.function(), Some("Image.reproject"));
        assert_eq!(
            reproject.argument("scale"),
            Some(&Node::constant(5000.0))
        );
        let clip = reproject.argument("image").unwrap();
        assert_eq!(clip.function(), Some("Image.clip"));
        assert_eq!(clip.argument("input").unwrap().function(), Some("reduce.max"));
    }

    #[test]
    fn test_display_summary() {
        let smap = ImageCollection::load("NASA_USDA/HSL/SMAP10KM_soil_moisture")
            .unwrap()
            .reduce(Reducer::Mean)
            .clip(&Region::CONUS);
        assert_eq!(
            smap.to_string(),
            "NASA_USDA/HSL/SMAP10KM_soil_moisture -> reduce.mean -> clip(bbox(-125.48, 24.86, -65.93, 49.84))"
        );
    }

    #[test]
    fn test_invalid_parameters() {
        let base = || ImageCollection::load("x").unwrap().reduce(Reducer::Mean);
        assert!(matches!(
            base().reproject("EPSG:4326", 0.0),
            Err(ExprError::InvalidScale(_))
        ));
        assert!(matches!(
            base().reproject("", 5000.0),
            Err(ExprError::Empty(_))
        ));
        assert!(matches!(
            base().reduce_resolution(Reducer::Mean, 0),
            Err(ExprError::InvalidMaxPixels(0))
        ));
        assert!(ImageCollection::load("  ").is_err());
    }
}
