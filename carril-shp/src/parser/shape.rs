//! Conversion des formes shapefile vers les géométries geo

use geo::{Contains, Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use shapefile::record::multipoint::GenericMultipoint;
use shapefile::record::polygon::GenericPolygon;
use shapefile::record::polyline::GenericPolyline;
use shapefile::{PointM, PointZ, PolygonRing, Shape};
use tracing::warn;

/// Point shapefile dont on garde uniquement X/Y (M et Z ignorés)
trait Planar {
    fn coord(&self) -> Coord;
}

impl Planar for shapefile::Point {
    fn coord(&self) -> Coord {
        Coord { x: self.x, y: self.y }
    }
}

impl Planar for PointM {
    fn coord(&self) -> Coord {
        Coord { x: self.x, y: self.y }
    }
}

impl Planar for PointZ {
    fn coord(&self) -> Coord {
        Coord { x: self.x, y: self.y }
    }
}

/// Convertit une forme shapefile en géométrie geo
///
/// Retourne `None` pour les formes nulles ou vides.
pub fn to_geometry(shape: Shape) -> Option<Geometry> {
    match shape {
        Shape::NullShape => None,
        Shape::Point(p) => Some(point(&p)),
        Shape::PointM(p) => Some(point(&p)),
        Shape::PointZ(p) => Some(point(&p)),
        Shape::Polyline(l) => polyline(&l),
        Shape::PolylineM(l) => polyline(&l),
        Shape::PolylineZ(l) => polyline(&l),
        Shape::Polygon(p) => polygon(&p),
        Shape::PolygonM(p) => polygon(&p),
        Shape::PolygonZ(p) => polygon(&p),
        Shape::Multipoint(m) => multipoint(&m),
        Shape::MultipointM(m) => multipoint(&m),
        Shape::MultipointZ(m) => multipoint(&m),
        Shape::Multipatch(_) => {
            warn!("Multipatch shapes are not supported, geometry set to null");
            None
        }
    }
}

fn point<P: Planar>(p: &P) -> Geometry {
    Geometry::Point(Point(p.coord()))
}

fn line<P: Planar>(points: &[P]) -> LineString {
    LineString::new(points.iter().map(Planar::coord).collect())
}

/// Une partie → LineString, plusieurs parties → MultiLineString
fn polyline<P: Planar>(l: &GenericPolyline<P>) -> Option<Geometry> {
    let mut lines: Vec<LineString> = l
        .parts()
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| line(part))
        .collect();

    match lines.len() {
        0 => None,
        1 => lines.pop().map(Geometry::LineString),
        _ => Some(Geometry::MultiLineString(MultiLineString::new(lines))),
    }
}

/// Regroupe les anneaux: chaque trou rejoint l'anneau extérieur qui
/// contient son premier sommet, à défaut le dernier extérieur lu
fn polygon<P: Planar>(p: &GenericPolygon<P>) -> Option<Geometry> {
    let mut outers: Vec<(Polygon, Vec<LineString>)> = Vec::new();
    let mut holes: Vec<LineString> = Vec::new();

    for ring in p.rings() {
        match ring {
            PolygonRing::Outer(points) => {
                outers.push((Polygon::new(line(points), Vec::new()), Vec::new()))
            }
            PolygonRing::Inner(points) => holes.push(line(points)),
        }
    }

    // Trous sans extérieur: traités comme extérieurs
    if outers.is_empty() {
        outers = holes
            .drain(..)
            .map(|hole| (Polygon::new(hole, Vec::new()), Vec::new()))
            .collect();
    }

    for hole in holes {
        let owner = hole.0.first().and_then(|first| {
            outers
                .iter()
                .position(|(outer, _)| outer.contains(&Point(*first)))
        });
        let index = owner.unwrap_or(outers.len() - 1);
        outers[index].1.push(hole);
    }

    let mut polygons: Vec<Polygon> = outers
        .into_iter()
        .map(|(outer, holes)| Polygon::new(outer.exterior().clone(), holes))
        .collect();

    match polygons.len() {
        0 => None,
        1 => polygons.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(MultiPolygon::new(polygons))),
    }
}

fn multipoint<P: Planar>(m: &GenericMultipoint<P>) -> Option<Geometry> {
    let points: Vec<Point> = m.points().iter().map(|p| Point(p.coord())).collect();
    if points.is_empty() {
        None
    } else {
        Some(Geometry::MultiPoint(MultiPoint::new(points)))
    }
}
