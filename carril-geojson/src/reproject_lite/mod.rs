//! Reprojection vers WGS84 en Rust pur, pour les CRS courants des
//! données de Bogotá
//!
//! Sources prises en charge:
//! - géographiques WGS84 (EPSG:4326) et MAGNA-SIRGAS (EPSG:4686)
//! - Web Mercator (EPSG:3857)
//! - UTM WGS84 (EPSG:326xx / 327xx)
//! - MAGNA-SIRGAS Bogotá (EPSG:3116) et CTM12 (EPSG:9377)
//!
//! Tout autre CRS passe par PROJ (`export::reproject`).

mod ellipsoid;
mod mercator;
mod smart;
mod tmerc;

pub use smart::SmartReprojector;
pub use tmerc::TransverseMercator;

use anyhow::{bail, Result};
use geo::{Coord, Geometry, MapCoords};

/// Longitude/latitude en radians
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    pub lon: f64,
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }
}

/// Projection source résolue depuis son code EPSG
#[derive(Debug, Clone, Copy)]
enum Source {
    /// Degrés, datum assimilé à WGS84
    Degrees,
    WebMercator,
    TransverseMercator(TransverseMercator),
}

impl Source {
    fn from_epsg(epsg: u32) -> Option<Self> {
        match epsg {
            4326 | 4686 => Some(Self::Degrees),
            3857 => Some(Self::WebMercator),
            _ => TransverseMercator::from_epsg(epsg).map(Self::TransverseMercator),
        }
    }
}

/// Reprojection d'un CRS connu vers EPSG:4326
#[derive(Debug, Clone, Copy)]
pub struct ReprojectorLite {
    source: Source,
}

impl ReprojectorLite {
    pub fn new(source_epsg: u32) -> Result<Self> {
        match Source::from_epsg(source_epsg) {
            Some(source) => Ok(Self { source }),
            None => bail!(
                "EPSG:{} has no built-in transformation (built-in: 4326, 4686, 3857, 3116, 9377, 326xx, 327xx)",
                source_epsg
            ),
        }
    }

    /// Vrai si l'EPSG source est transformable sans PROJ
    pub fn is_supported(source_epsg: u32) -> bool {
        Source::from_epsg(source_epsg).is_some()
    }

    /// (x, y) source → (lon, lat) en degrés
    pub fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let geo = match self.source {
            // Pas d'aller-retour en radians: coordonnées inchangées
            Source::Degrees => return Ok((x, y)),
            Source::WebMercator => mercator::to_geographic(x, y)?,
            Source::TransverseMercator(tm) => tm.to_geographic(x, y)?,
        };
        Ok(geo.to_degrees())
    }

    /// Transforme une géométrie en conservant sa structure
    pub fn transform_geometry(&self, geom: &Geometry) -> Result<Geometry> {
        geom.try_map_coords(|c: Coord| -> Result<Coord> {
            let (x, y) = self.transform_point(c.x, c.y)?;
            Ok(Coord { x, y })
        })
    }
}
