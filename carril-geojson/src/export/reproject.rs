//! Reprojection de géométries avec PROJ
//!
//! Ce module est disponible uniquement avec le feature `reproject`.

#[cfg(feature = "reproject")]
use anyhow::{Context, Result};
#[cfg(feature = "reproject")]
use carril_shp::Crs;
#[cfg(feature = "reproject")]
use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
#[cfg(feature = "reproject")]
use proj::Proj;

/// Reprojection via PROJ vers un EPSG cible
#[cfg(feature = "reproject")]
pub struct Reprojector {
    proj: Proj,
}

#[cfg(feature = "reproject")]
impl Reprojector {
    /// Crée un reprojector depuis le CRS d'un jeu de données
    ///
    /// Le code EPSG est utilisé s'il est connu, sinon le WKT du .prj.
    pub fn new(source: &Crs, target_epsg: u32) -> Result<Self> {
        let definition = match (source.epsg, &source.wkt) {
            (Some(epsg), _) => format!("EPSG:{}", epsg),
            (None, Some(wkt)) => wkt.clone(),
            (None, None) => anyhow::bail!("Source CRS is undefined, cannot build a PROJ pipeline"),
        };
        let target = format!("EPSG:{}", target_epsg);

        let proj = Proj::new_known_crs(&definition, &target, None).context(format!(
            "Failed to create projection from {} to {}",
            source, target
        ))?;

        Ok(Self { proj })
    }

    /// Transforme une géométrie
    pub fn transform_geometry(&self, geom: &Geometry) -> Result<Geometry> {
        match geom {
            Geometry::Point(p) => Ok(Geometry::Point(Point(self.transform_coord(p.0)?))),
            Geometry::LineString(ls) => Ok(Geometry::LineString(self.transform_linestring(ls)?)),
            Geometry::Polygon(p) => Ok(Geometry::Polygon(self.transform_polygon(p)?)),
            Geometry::MultiPoint(mp) => {
                let points: Result<Vec<Point>> = mp
                    .0
                    .iter()
                    .map(|p| Ok(Point(self.transform_coord(p.0)?)))
                    .collect();
                Ok(Geometry::MultiPoint(MultiPoint::new(points?)))
            }
            Geometry::MultiLineString(mls) => {
                let lines: Result<Vec<LineString>> = mls
                    .0
                    .iter()
                    .map(|ls| self.transform_linestring(ls))
                    .collect();
                Ok(Geometry::MultiLineString(MultiLineString::new(lines?)))
            }
            Geometry::MultiPolygon(mp) => {
                let polys: Result<Vec<Polygon>> =
                    mp.0.iter().map(|p| self.transform_polygon(p)).collect();
                Ok(Geometry::MultiPolygon(MultiPolygon::new(polys?)))
            }
            // Types jamais produits par le lecteur shapefile
            other => anyhow::bail!("Unsupported geometry for PROJ reprojection: {:?}", other),
        }
    }

    fn transform_coord(&self, coord: Coord) -> Result<Coord> {
        let (x, y) = self
            .proj
            .convert((coord.x, coord.y))
            .context("Coordinate transformation failed")?;
        Ok(Coord { x, y })
    }

    /// Conversion batch des coordonnées d'une LineString
    fn transform_linestring(&self, ls: &LineString) -> Result<LineString> {
        let mut coords: Vec<(f64, f64)> = ls.0.iter().map(|c| (c.x, c.y)).collect();

        self.proj
            .convert_array(&mut coords)
            .context("Batch coordinate transformation failed")?;

        Ok(LineString::new(
            coords.into_iter().map(|(x, y)| Coord { x, y }).collect(),
        ))
    }

    fn transform_polygon(&self, p: &Polygon) -> Result<Polygon> {
        let exterior = self.transform_linestring(p.exterior())?;
        let interiors: Result<Vec<LineString>> = p
            .interiors()
            .iter()
            .map(|ls| self.transform_linestring(ls))
            .collect();
        Ok(Polygon::new(exterior, interiors?))
    }
}


/// Vérifie si la reprojection PROJ est disponible
pub fn is_available() -> bool {
    cfg!(feature = "reproject")
}
