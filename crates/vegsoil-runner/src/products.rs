//! The two raster products.

use crate::config::{NdviConfig, SmapConfig};
use crate::Result;
use vegsoil_expr::{Image, ImageCollection, Region};

/// Maximum NDVI: reduce, clip, reproject, then average down.
///
/// `reduceResolution` aggregates into the grid set by the preceding
/// `reproject`, so the two steps must stay in this order.
pub fn build_ndvi(config: &NdviConfig, region: &Region) -> Result<Image> {
    let image = ImageCollection::load(config.collection.as_str())?
        .reduce(config.reducer)
        .clip(region)
        .reproject(config.crs.as_str(), config.reproject_scale)?
        .reduce_resolution(config.resolution_reducer, config.max_pixels)?;
    Ok(image)
}

/// Mean soil moisture: reduce and clip.
pub fn build_smap(config: &SmapConfig, region: &Region) -> Result<Image> {
    let image = ImageCollection::load(config.collection.as_str())?
        .reduce(config.reducer)
        .clip(region);
    Ok(image)
}
