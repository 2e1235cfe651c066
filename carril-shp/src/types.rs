//! Types de données pour le crate carril-shp

use geo::Geometry;
use std::fmt;
use std::path::PathBuf;

/// Code EPSG du système géographique WGS84
pub const WGS84_EPSG: u32 = 4326;

/// Jeu de données vectoriel lu depuis un shapefile
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Features dans l'ordre du fichier .shp
    pub features: Vec<Feature>,

    /// Noms des colonnes attributaires, dans l'ordre de la table dBase
    pub columns: Vec<String>,

    /// Système de coordonnées commun à toutes les géométries
    pub crs: Crs,

    /// Chemin du fichier .shp source
    pub source: PathBuf,
}

impl Dataset {
    /// Nombre de features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Une feature: géométrie + attributs
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Géométrie (None pour une forme nulle)
    pub geometry: Option<Geometry>,

    /// Attributs (colonne -> valeur), dans l'ordre des colonnes
    pub properties: Vec<(String, AttributeValue)>,
}

impl Feature {
    /// Récupère la valeur d'un attribut
    pub fn get(&self, column: &str) -> Option<&AttributeValue> {
        self.properties
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Nom du type de géométrie (tag GeoJSON), "Null" si absente
    pub fn geometry_type(&self) -> &'static str {
        match &self.geometry {
            Some(geom) => geometry_type_name(geom),
            None => "Null",
        }
    }
}

/// Tag GeoJSON d'une géométrie geo
pub fn geometry_type_name(geom: &Geometry) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) | Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Valeur scalaire d'un attribut, compatible JSON
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Système de coordonnées d'un jeu de données
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Crs {
    /// Code EPSG si identifié
    pub epsg: Option<u32>,

    /// Nom lu dans le WKT (PROJCS/GEOGCS)
    pub name: Option<String>,

    /// WKT brut du fichier .prj
    pub wkt: Option<String>,
}

impl Crs {
    /// CRS identifié par son code EPSG
    pub fn from_epsg(epsg: u32) -> Self {
        Self {
            epsg: Some(epsg),
            name: None,
            wkt: None,
        }
    }

    /// Vrai si le CRS est WGS84 géographique (EPSG:4326)
    pub fn is_wgs84(&self) -> bool {
        self.epsg == Some(WGS84_EPSG)
    }

    /// Vrai si aucune information de projection n'est disponible
    pub fn is_undefined(&self) -> bool {
        self.epsg.is_none() && self.name.is_none() && self.wkt.is_none()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.epsg, &self.name) {
            (Some(epsg), _) => write!(f, "EPSG:{}", epsg),
            (None, Some(name)) => write!(f, "{} (no EPSG code)", name),
            (None, None) if self.wkt.is_some() => write!(f, "unrecognized WKT"),
            (None, None) => write!(f, "undefined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Point};

    #[test]
    fn test_crs_display() {
        assert_eq!(Crs::from_epsg(3116).to_string(), "EPSG:3116");
        assert_eq!(Crs::default().to_string(), "undefined");
        let named = Crs {
            epsg: None,
            name: Some("Custom_TM".to_string()),
            wkt: Some("PROJCS[\"Custom_TM\"]".to_string()),
        };
        assert_eq!(named.to_string(), "Custom_TM (no EPSG code)");
    }

    #[test]
    fn test_feature_accessors() {
        let feature = Feature {
            geometry: Some(Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]))),
            properties: vec![
                ("nombre".to_string(), AttributeValue::Text("Av. Caracas".to_string())),
                ("carril".to_string(), AttributeValue::Integer(2)),
            ],
        };
        assert_eq!(feature.geometry_type(), "LineString");
        assert_eq!(feature.get("carril"), Some(&AttributeValue::Integer(2)));
        assert_eq!(feature.get("absent"), None);

        let point = Feature {
            geometry: Some(Geometry::Point(Point::new(1.0, 2.0))),
            properties: vec![],
        };
        assert_eq!(point.geometry_type(), "Point");
    }
}
