//! Modules d'export (GeoJSON, reprojection PROJ)

pub mod geojson;
pub mod reproject;

#[cfg(feature = "reproject")]
pub use reproject::Reprojector;
