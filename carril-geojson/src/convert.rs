//! Pipeline de conversion shapefile → GeoJSON WGS84
//!
//! Lecture, normalisation du CRS, sérialisation puis écriture. Chaque étape
//! retourne un `ConversionError` typé; l'affichage console est délégué à un
//! `Diagnostics` optionnel.

use std::path::PathBuf;

use carril_shp::{Crs, Dataset, DatasetError, WGS84_EPSG};
use geojson::{FeatureCollection, JsonValue};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ConverterConfig;
use crate::export::geojson::{to_feature_collection, to_pretty_json, write_document};
use crate::reproject_lite::SmartReprojector;

/// Erreur de conversion (toute étape confondue)
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Shapefile absent, illisible ou corrompu
    #[error("Failed to read dataset {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },

    /// CRS absent ou non identifié: impossible de reprojeter
    #[error("Cannot reproject a dataset with an unknown CRS ({crs})")]
    UnknownCrs { crs: String },

    /// Échec de la transformation de coordonnées
    #[error("Failed to reproject from {from} to EPSG:{to}")]
    Reproject {
        from: String,
        to: u32,
        #[source]
        source: anyhow::Error,
    },

    /// Échec de la sérialisation JSON
    #[error("Failed to serialize GeoJSON")]
    Serialize(#[from] serde_json::Error),

    /// Échec de l'écriture du fichier de sortie
    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Aperçu de la première feature écrite
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSample {
    pub property_keys: Vec<String>,
    pub geometry_type: String,
    /// Au plus deux positions, seulement pour Point, MultiPoint et LineString
    pub coordinate_preview: Option<JsonValue>,
}

/// Résumé d'une conversion réussie
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub feature_count: usize,
    pub source_crs: String,
    pub reprojected: bool,
    pub first_feature: Option<FeatureSample>,
}

/// Résultat d'une conversion réussie
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    pub output_path: PathBuf,
    pub summary: ConversionSummary,
}

/// Points d'observation du pipeline (affichage console, tests)
pub trait Diagnostics {
    /// Jeu de données lu, avant toute transformation
    fn loaded(&mut self, _dataset: &Dataset) {}

    /// Reprojection appliquée
    fn reprojected(&mut self, _from: &Crs, _to: &Crs, _method: &str) {}

    /// Document écrit
    fn written(&mut self, _outcome: &ConversionOutcome) {}
}

/// Aucun affichage
pub struct Silent;

impl Diagnostics for Silent {}

/// Convertit le shapefile de la configuration en GeoJSON WGS84
pub fn convert(config: &ConverterConfig) -> Result<ConversionOutcome, ConversionError> {
    convert_with(config, &mut Silent)
}

/// Conversion avec observation des étapes
pub fn convert_with(
    config: &ConverterConfig,
    diagnostics: &mut dyn Diagnostics,
) -> Result<ConversionOutcome, ConversionError> {
    info!(input = %config.input.display(), output = %config.output.display(), "Converting shapefile");

    // 1. Lecture
    let mut dataset = carril_shp::open(&config.input).map_err(|source| ConversionError::Read {
        path: config.input.clone(),
        source,
    })?;

    if let Some(epsg) = config.source_epsg {
        if dataset.crs.epsg.is_none() {
            debug!(epsg, "Assuming configured source CRS");
            dataset.crs.epsg = Some(epsg);
        }
    }

    // 2. Diagnostic avant transformation
    diagnostics.loaded(&dataset);

    // 3. Normalisation du CRS
    let source_crs = dataset.crs.to_string();
    let reprojected = normalize_crs(&mut dataset, diagnostics)?;

    // 4. Sérialisation complète avant écriture
    let collection = to_feature_collection(&dataset);
    let bytes = to_pretty_json(&collection)?;

    // 5. Écriture
    write_document(&bytes, &config.output).map_err(|source| ConversionError::Write {
        path: config.output.clone(),
        source,
    })?;

    let outcome = ConversionOutcome {
        output_path: config.output.clone(),
        summary: ConversionSummary {
            feature_count: collection.features.len(),
            source_crs,
            reprojected,
            first_feature: sample(&collection),
        },
    };

    info!(
        output = %outcome.output_path.display(),
        features = outcome.summary.feature_count,
        bytes = bytes.len(),
        "GeoJSON written"
    );

    // 6. Diagnostic après transformation
    diagnostics.written(&outcome);

    Ok(outcome)
}

/// Reprojette le jeu de données en EPSG:4326 si nécessaire.
/// Retourne vrai si les coordonnées ont été transformées.
pub fn normalize_crs(
    dataset: &mut Dataset,
    diagnostics: &mut dyn Diagnostics,
) -> Result<bool, ConversionError> {
    if dataset.crs.is_wgs84() {
        debug!("Dataset already in EPSG:4326");
        return Ok(false);
    }

    if dataset.crs.epsg.is_none() && dataset.crs.wkt.is_none() {
        return Err(ConversionError::UnknownCrs {
            crs: dataset.crs.to_string(),
        });
    }

    let reprojector = SmartReprojector::new(&dataset.crs, WGS84_EPSG).map_err(|source| {
        match dataset.crs.epsg {
            // Sans code EPSG ni PROJ, le WKT seul ne suffit pas
            None => ConversionError::UnknownCrs {
                crs: dataset.crs.to_string(),
            },
            Some(_) => ConversionError::Reproject {
                from: dataset.crs.to_string(),
                to: WGS84_EPSG,
                source,
            },
        }
    })?;

    info!(from = %dataset.crs, method = reprojector.description(), "Reprojecting to EPSG:4326");
    reproject_dataset(dataset, &reprojector)?;

    let previous = std::mem::replace(&mut dataset.crs, Crs::from_epsg(WGS84_EPSG));
    diagnostics.reprojected(&previous, &dataset.crs, reprojector.description());

    Ok(!reprojector.is_identity())
}

/// Transforme toutes les géométries; l'ordre des features est inchangé
fn reproject_dataset(
    dataset: &mut Dataset,
    reprojector: &SmartReprojector,
) -> Result<(), ConversionError> {
    let from = dataset.crs.to_string();
    for (index, feature) in dataset.features.iter_mut().enumerate() {
        if let Some(geometry) = feature.geometry.as_mut() {
            *geometry = reprojector
                .transform_geometry(geometry)
                .map_err(|source| ConversionError::Reproject {
                    from: from.clone(),
                    to: WGS84_EPSG,
                    source: source.context(format!("feature #{}", index)),
                })?;
        }
    }
    Ok(())
}

/// Aperçu de la première feature
fn sample(collection: &FeatureCollection) -> Option<FeatureSample> {
    let first = collection.features.first()?;

    let property_keys = first
        .properties
        .as_ref()
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default();

    let (geometry_type, coordinate_preview) = match first.geometry.as_ref().map(|g| &g.value) {
        Some(value) => (type_name(value).to_string(), preview(value)),
        None => ("null".to_string(), None),
    };

    Some(FeatureSample {
        property_keys,
        geometry_type,
        coordinate_preview,
    })
}

fn type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Deux premières positions d'une liste plate de coordonnées
fn preview(value: &geojson::Value) -> Option<JsonValue> {
    let positions: &[Vec<f64>] = match value {
        geojson::Value::Point(position) => return Some(JsonValue::from(position.clone())),
        geojson::Value::MultiPoint(positions) | geojson::Value::LineString(positions) => positions,
        _ => return None,
    };

    Some(JsonValue::from(
        positions
            .iter()
            .take(2)
            .map(|p| JsonValue::from(p.clone()))
            .collect::<Vec<_>>(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use carril_shp::{AttributeValue, Feature};
    use geo::{Geometry, LineString, Point};

    fn dataset(crs: Crs) -> Dataset {
        Dataset {
            features: vec![
                Feature {
                    geometry: Some(Geometry::LineString(LineString::from(vec![
                        (1000000.0, 1000000.0),
                        (1000500.0, 1000800.0),
                    ]))),
                    properties: vec![("id".to_string(), AttributeValue::Integer(1))],
                },
                Feature {
                    geometry: Some(Geometry::Point(Point::new(1002000.0, 1005000.0))),
                    properties: vec![("id".to_string(), AttributeValue::Integer(2))],
                },
            ],
            columns: vec!["id".to_string()],
            crs,
            source: PathBuf::from("memory.shp"),
        }
    }

    #[derive(Default)]
    struct Recorder {
        loaded: usize,
        reprojections: Vec<(String, String)>,
    }

    impl Diagnostics for Recorder {
        fn loaded(&mut self, _dataset: &Dataset) {
            self.loaded += 1;
        }

        fn reprojected(&mut self, from: &Crs, to: &Crs, _method: &str) {
            self.reprojections.push((from.to_string(), to.to_string()));
        }
    }

    #[test]
    fn test_normalize_projected_dataset() {
        let mut ds = dataset(Crs::from_epsg(3116));
        let mut recorder = Recorder::default();

        assert!(normalize_crs(&mut ds, &mut recorder).unwrap());
        assert!(ds.crs.is_wgs84());
        assert_eq!(
            recorder.reprojections,
            vec![("EPSG:3116".to_string(), "EPSG:4326".to_string())]
        );

        match &ds.features[1].geometry {
            Some(Geometry::Point(p)) => {
                assert!((p.x() - (-74.0595)).abs() < 0.001, "lon={}", p.x());
                assert!((p.y() - 4.6414).abs() < 0.001, "lat={}", p.y());
            }
            other => panic!("Expected Point, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_wgs84_is_noop() {
        let mut ds = dataset(Crs::from_epsg(4326));
        let before = ds.features.clone();

        assert!(!normalize_crs(&mut ds, &mut Silent).unwrap());
        assert_eq!(ds.features, before);
    }

    #[test]
    fn test_normalize_undefined_crs() {
        let mut ds = dataset(Crs::default());
        let result = normalize_crs(&mut ds, &mut Silent);
        assert!(matches!(result, Err(ConversionError::UnknownCrs { .. })));
    }

    #[test]
    fn test_preview_only_flat_coordinates() {
        let line = geojson::Value::LineString(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(
            preview(&line),
            Some(serde_json::json!([[1.0, 2.0], [3.0, 4.0]]))
        );

        let point = geojson::Value::Point(vec![1.0, 2.0]);
        assert_eq!(preview(&point), Some(serde_json::json!([1.0, 2.0])));

        let multi = geojson::Value::MultiLineString(vec![vec![vec![1.0, 2.0], vec![3.0, 4.0]]]);
        assert_eq!(preview(&multi), None);
    }

    #[test]
    fn test_convert_missing_input() {
        let config = ConverterConfig::new("/nonexistent/lanes.shp", std::env::temp_dir().join("never.geojson"));
        match convert(&config) {
            Err(ConversionError::Read { source, .. }) => assert!(source.is_not_found()),
            other => panic!("Expected Read error, got {:?}", other),
        }
    }
}
