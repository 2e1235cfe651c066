//! Rapport console de la conversion
//!
//! Lignes lisibles par un humain (stdout), distinctes des événements
//! `tracing`. Chaque section est construite en `String` puis affichée, ce
//! qui permet de la tester sans capturer la sortie standard.

use std::error::Error;
use std::fmt::Write;

use carril_shp::{Crs, Dataset};

use crate::convert::{ConversionError, ConversionOutcome, Diagnostics};

/// Nombre de lignes affichées par défaut avant transformation
pub const DEFAULT_PREVIEW_ROWS: usize = 3;

/// Affichage console des étapes de conversion
#[derive(Debug, Clone)]
pub struct ConsoleReport {
    preview_rows: usize,
}

impl Default for ConsoleReport {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl ConsoleReport {
    /// Section avant transformation: colonnes, nombre de features, CRS, aperçu
    pub fn loaded_section(&self, dataset: &Dataset) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n{}", "=".repeat(60));
        let _ = writeln!(out, "SHAPEFILE - {}", dataset.source.display());
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(out, "Columns: {}", dataset.columns.join(", "));
        let _ = writeln!(out, "Features: {}", dataset.len());
        let _ = writeln!(out, "CRS: {}", dataset.crs);

        if self.preview_rows > 0 && !dataset.is_empty() {
            let _ = writeln!(out, "\n--- FIRST ROWS ---");
            for (i, feature) in dataset.features.iter().take(self.preview_rows).enumerate() {
                let attributes: Vec<String> = feature
                    .properties
                    .iter()
                    .map(|(key, value)| format!("{}={}", key, value))
                    .collect();
                let _ = writeln!(
                    out,
                    "  [{}] {} | {}",
                    i,
                    attributes.join(", "),
                    feature.geometry_type()
                );
            }
        }

        out
    }

    /// Ligne affichée après reprojection
    pub fn reprojected_line(from: &Crs, to: &Crs, method: &str) -> String {
        format!("Reprojected {} → {} ({})\nNew CRS: {}", from, to, method, to)
    }

    /// Section après écriture: marqueur de succès et aperçu de la première feature
    pub fn written_section(outcome: &ConversionOutcome) -> String {
        let summary = &outcome.summary;
        let mut out = String::new();
        let _ = writeln!(out, "\n✅ GeoJSON written: {}", outcome.output_path.display());
        let _ = writeln!(out, "Total features: {}", summary.feature_count);

        if let Some(first) = &summary.first_feature {
            let _ = writeln!(out, "\n--- FIRST FEATURE ---");
            let _ = writeln!(out, "Properties: {}", first.property_keys.join(", "));
            let _ = writeln!(out, "Geometry type: {}", first.geometry_type);
            if let Some(preview) = &first.coordinate_preview {
                let _ = writeln!(out, "Coordinates (preview): {}", preview);
            }
        }

        out
    }

    /// Marqueur d'erreur suivi de la chaîne des causes
    pub fn error_section(error: &ConversionError) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n❌ Conversion failed: {}", error);

        let mut source = error.source();
        while let Some(cause) = source {
            let _ = writeln!(out, "  caused by: {}", cause);
            source = cause.source();
        }

        out
    }
}

impl Diagnostics for ConsoleReport {
    fn loaded(&mut self, dataset: &Dataset) {
        print!("{}", self.loaded_section(dataset));
    }

    fn reprojected(&mut self, from: &Crs, to: &Crs, method: &str) {
        println!("{}", Self::reprojected_line(from, to, method));
    }

    fn written(&mut self, outcome: &ConversionOutcome) {
        print!("{}", Self::written_section(outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{ConversionSummary, FeatureSample};
    use carril_shp::{AttributeValue, DatasetError, Feature};
    use geo::{Geometry, Point};
    use std::path::PathBuf;

    fn dataset(rows: usize) -> Dataset {
        Dataset {
            features: (0..rows)
                .map(|i| Feature {
                    geometry: Some(Geometry::Point(Point::new(i as f64, 0.0))),
                    properties: vec![
                        ("NOMBRE".to_string(), AttributeValue::Text(format!("Calle {}", i))),
                        ("CARRIL".to_string(), AttributeValue::Integer(2)),
                    ],
                })
                .collect(),
            columns: vec!["NOMBRE".to_string(), "CARRIL".to_string()],
            crs: Crs::from_epsg(3116),
            source: PathBuf::from("lanes.shp"),
        }
    }

    #[test]
    fn test_loaded_section() {
        let text = ConsoleReport::default().loaded_section(&dataset(5));

        assert!(text.contains("Columns: NOMBRE, CARRIL"));
        assert!(text.contains("Features: 5"));
        assert!(text.contains("CRS: EPSG:3116"));
        assert!(text.contains("[2] NOMBRE=Calle 2, CARRIL=2 | Point"));
        assert!(!text.contains("[3]"), "only 3 rows previewed");
    }

    #[test]
    fn test_loaded_section_empty_dataset() {
        let text = ConsoleReport::default().loaded_section(&dataset(0));
        assert!(text.contains("Features: 0"));
        assert!(!text.contains("FIRST ROWS"));
    }

    #[test]
    fn test_written_section() {
        let outcome = ConversionOutcome {
            output_path: PathBuf::from("carriles_preferenciales.geojson"),
            summary: ConversionSummary {
                feature_count: 2,
                source_crs: "EPSG:3116".to_string(),
                reprojected: true,
                first_feature: Some(FeatureSample {
                    property_keys: vec!["NOMBRE".to_string(), "CARRIL".to_string()],
                    geometry_type: "LineString".to_string(),
                    coordinate_preview: Some(serde_json::json!([[-74.07, 4.6], [-74.06, 4.61]])),
                }),
            },
        };

        let text = ConsoleReport::written_section(&outcome);
        assert!(text.contains("✅ GeoJSON written: carriles_preferenciales.geojson"));
        assert!(text.contains("Total features: 2"));
        assert!(text.contains("Properties: NOMBRE, CARRIL"));
        assert!(text.contains("Geometry type: LineString"));
        assert!(text.contains("[[-74.07,4.6],[-74.06,4.61]]"));
    }

    #[test]
    fn test_error_section_has_cause_chain() {
        let error = ConversionError::Read {
            path: PathBuf::from("missing.shp"),
            source: DatasetError::NotFound(PathBuf::from("missing.shp")),
        };

        let text = ConsoleReport::error_section(&error);
        assert!(text.contains("❌"));
        assert!(text.contains("missing.shp"));
        assert!(text.contains("caused by:"));
    }

    #[test]
    fn test_reprojected_line() {
        let line = ConsoleReport::reprojected_line(
            &Crs::from_epsg(3116),
            &Crs::from_epsg(4326),
            "reproject_lite (pure Rust)",
        );
        assert!(line.contains("New CRS: EPSG:4326"));
    }
}
