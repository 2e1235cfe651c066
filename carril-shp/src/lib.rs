//! # carril-shp
//!
//! Lecture de shapefiles ESRI vers des types `geo`.
//!
//! ## Features
//!
//! - Géométries `.shp` converties en `geo::Geometry` (M et Z ignorés)
//! - Attributs `.dbf` ordonnés comme les colonnes de la table, décodés
//!   selon le `.cpg` ou l'octet LDID de l'en-tête
//! - Détection du CRS depuis le WKT du `.prj` (code EPSG)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use carril_shp::open;
//! use std::path::Path;
//!
//! let dataset = open(Path::new("Shape_carril_preferencial/CP2025_NS_EW_Merge.shp"))?;
//! println!("CRS: {}", dataset.crs);
//! println!("{} features, colonnes {:?}", dataset.len(), dataset.columns);
//! ```

pub mod error;
pub mod parser;
pub mod types;

pub use error::DatasetError;
pub use types::{geometry_type_name, AttributeValue, Crs, Dataset, Feature, WGS84_EPSG};

use std::path::Path;

use shapefile::ShapeReader;
use tracing::{debug, info, warn};

/// Lit un shapefile (.shp + .dbf + .cpg + .prj) et retourne le jeu de données.
///
/// # Arguments
///
/// * `path` - Chemin vers le fichier `.shp`; les fichiers annexes sont
///   cherchés à côté avec la même base de nom.
///
/// # Errors
///
/// Retourne `DatasetError` si le `.shp` est absent, illisible, ou si le
/// nombre d'enregistrements dBase ne correspond pas au nombre de formes.
pub fn open(path: &Path) -> Result<Dataset, DatasetError> {
    if !path.is_file() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    // 1. Géométries
    let shapes = ShapeReader::from_path(path)?.read()?;
    debug!(path = %path.display(), shapes = shapes.len(), "Read shapes");

    // 2. Attributs
    let dbf_path = sidecar(path, "dbf");
    let table = match dbf_path {
        Some(ref dbf) => {
            let cpg = sidecar(path, "cpg").map(std::fs::read).transpose()?;
            let label = cpg.as_deref().map(String::from_utf8_lossy);
            parser::dbf::read(dbf, label.as_deref())?
        }
        None => {
            warn!(path = %path.display(), "No .dbf file found, features will have no attributes");
            parser::dbf::Table::default()
        }
    };

    if dbf_path.is_some() && table.rows.len() != shapes.len() {
        return Err(DatasetError::RecordCountMismatch {
            shapes: shapes.len(),
            records: table.rows.len(),
        });
    }

    // 3. Projection
    let crs = match sidecar(path, "prj") {
        Some(prj) => read_crs(&prj)?,
        None => {
            warn!(path = %path.display(), "No .prj file found, CRS is undefined");
            Crs::default()
        }
    };

    // 4. Assemblage des features dans l'ordre du fichier
    let mut rows = table.rows.into_iter();
    let features: Vec<Feature> = shapes
        .into_iter()
        .map(|shape| Feature {
            geometry: parser::shape::to_geometry(shape),
            properties: rows.next().unwrap_or_default(),
        })
        .collect();

    info!(
        path = %path.display(),
        features = features.len(),
        columns = table.columns.len(),
        crs = %crs,
        "Shapefile loaded"
    );

    Ok(Dataset {
        features,
        columns: table.columns,
        crs,
        source: path.to_path_buf(),
    })
}

/// Lit le .prj; une projection inconnue donne un CRS sans code EPSG
fn read_crs(prj: &Path) -> Result<Crs, DatasetError> {
    let bytes = std::fs::read(prj)?;
    let wkt = String::from_utf8_lossy(&bytes).trim().to_string();

    match parser::prj::parse(&wkt) {
        Ok(crs) => Ok(crs),
        Err(DatasetError::UnknownProjection(name)) => {
            warn!(projection = %name, "Projection not recognized, no EPSG code");
            Ok(Crs {
                epsg: None,
                name: parser::prj::root_name(&wkt),
                wkt: (!wkt.is_empty()).then_some(wkt),
            })
        }
        Err(e) => Err(e),
    }
}

/// Fichier annexe (.dbf, .cpg, .prj) en tolérant la casse de l'extension
fn sidecar(path: &Path, extension: &str) -> Option<std::path::PathBuf> {
    [extension.to_string(), extension.to_ascii_uppercase()]
        .iter()
        .map(|ext| path.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file() {
        let result = open(Path::new("/nonexistent/dir/lanes.shp"));
        match result {
            Err(e) => assert!(e.is_not_found(), "unexpected error: {}", e),
            Ok(_) => panic!("Expected an error for a missing file"),
        }
    }

    #[test]
    fn test_sidecar_absent() {
        assert!(sidecar(Path::new("/nonexistent/lanes.shp"), "prj").is_none());
    }
}
