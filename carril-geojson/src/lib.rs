//! # carril-geojson
//!
//! Conversion du shapefile des carriles preferenciales vers un document
//! GeoJSON en WGS84 (EPSG:4326).
//!
//! ## Features
//!
//! - Lecture via `carril-shp` (géométries, attributs, CRS du `.prj`)
//! - Reprojection par PROJ (feature `reproject`, par défaut), chemin rapide
//!   en Rust pur (`reproject_lite`)
//! - FeatureCollection indentée, UTF-8 littéral
//! - Rapport console optionnel, séparé du pipeline
//!
//! ## Usage
//!
//! ```rust,ignore
//! use carril_geojson::{convert, ConverterConfig};
//!
//! let config = ConverterConfig::new("lanes.shp", "lanes.geojson");
//! let outcome = convert(&config)?;
//! println!("{} features → {}", outcome.summary.feature_count, outcome.output_path.display());
//! ```

pub mod config;
pub mod convert;
pub mod export;
pub mod report;
pub mod reproject_lite;

pub use config::ConverterConfig;
pub use convert::{
    convert, convert_with, normalize_crs, ConversionError, ConversionOutcome, ConversionSummary,
    Diagnostics, FeatureSample, Silent,
};
pub use report::ConsoleReport;
