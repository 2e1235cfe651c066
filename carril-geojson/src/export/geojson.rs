//! Export vers GeoJSON (FeatureCollection indentée, UTF-8 littéral)

use std::path::Path;

use carril_shp::{AttributeValue, Dataset, Feature};
use geojson::feature::Id;
use geojson::{FeatureCollection, JsonObject, JsonValue};

/// Construit la FeatureCollection d'un jeu de données (ordre conservé)
pub fn to_feature_collection(dataset: &Dataset) -> FeatureCollection {
    let features = dataset
        .features
        .iter()
        .enumerate()
        .map(|(i, feature)| to_feature(i, feature))
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Convertit une feature; l'identifiant est son index dans le fichier
fn to_feature(index: usize, feature: &Feature) -> geojson::Feature {
    let properties: JsonObject = feature
        .properties
        .iter()
        .map(|(key, value)| (key.clone(), to_json(value)))
        .collect();

    geojson::Feature {
        bbox: None,
        geometry: feature
            .geometry
            .as_ref()
            .map(|geom| geojson::Geometry::new(geojson::Value::from(geom))),
        id: Some(Id::String(index.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Scalaire d'attribut → valeur JSON (flottants non finis → null)
pub fn to_json(value: &AttributeValue) -> JsonValue {
    match value {
        AttributeValue::Null => JsonValue::Null,
        AttributeValue::Bool(b) => JsonValue::Bool(*b),
        AttributeValue::Integer(i) => JsonValue::from(*i),
        AttributeValue::Float(x) => JsonValue::from(*x),
        AttributeValue::Text(s) => JsonValue::String(s.clone()),
    }
}

/// Sérialise avec indentation de 2 espaces; les caractères non ASCII
/// restent littéraux
pub fn to_pretty_json(collection: &FeatureCollection) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(collection)
}

/// Écrit le document (création ou troncature)
pub fn write_document(bytes: &[u8], output_path: &Path) -> std::io::Result<()> {
    std::fs::write(output_path, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carril_shp::Crs;
    use geo::{Geometry, LineString, Point};
    use std::path::PathBuf;

    fn dataset() -> Dataset {
        Dataset {
            features: vec![
                Feature {
                    geometry: Some(Geometry::LineString(LineString::from(vec![
                        (-74.07, 4.60),
                        (-74.06, 4.61),
                    ]))),
                    properties: vec![
                        ("nombre".to_string(), AttributeValue::Text("Carrera Séptima".to_string())),
                        ("longitud".to_string(), AttributeValue::Float(f64::NAN)),
                    ],
                },
                Feature {
                    geometry: None,
                    properties: vec![
                        ("nombre".to_string(), AttributeValue::Null),
                        ("longitud".to_string(), AttributeValue::Integer(120)),
                    ],
                },
            ],
            columns: vec!["nombre".to_string(), "longitud".to_string()],
            crs: Crs::from_epsg(4326),
            source: PathBuf::from("lanes.shp"),
        }
    }

    #[test]
    fn test_feature_collection_structure() {
        let fc = to_feature_collection(&dataset());
        assert_eq!(fc.features.len(), 2);

        let first = &fc.features[0];
        assert_eq!(first.id, Some(Id::String("0".to_string())));
        let props = first.properties.as_ref().unwrap();
        let keys: Vec<_> = props.keys().cloned().collect();
        assert_eq!(keys, vec!["nombre", "longitud"]);
        assert_eq!(props["longitud"], JsonValue::Null);

        // Forme nulle → geometry: null
        assert!(fc.features[1].geometry.is_none());
        assert_eq!(fc.features[1].properties.as_ref().unwrap()["longitud"], 120);
    }

    #[test]
    fn test_pretty_json_keeps_unicode() {
        let bytes = to_pretty_json(&to_feature_collection(&dataset())).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("Carrera Séptima"));
        assert!(!text.contains("\\u00e9"));
        assert!(text.contains("\n  \"features\""), "2-space indentation expected");
    }

    #[test]
    fn test_point_geometry_value() {
        let feature = Feature {
            geometry: Some(Geometry::Point(Point::new(-74.0761, 4.5981))),
            properties: vec![],
        };
        let geojson_feature = to_feature(7, &feature);
        match geojson_feature.geometry.map(|g| g.value) {
            Some(geojson::Value::Point(pos)) => assert_eq!(pos, vec![-74.0761, 4.5981]),
            other => panic!("Expected Point, got {:?}", other),
        }
        assert_eq!(geojson_feature.id, Some(Id::String("7".to_string())));
    }
}
