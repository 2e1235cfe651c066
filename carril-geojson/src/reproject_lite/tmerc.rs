//! Projection Transverse Mercator (UTM et grilles nationales)
//!
//! Systèmes supportés:
//! - UTM WGS84 toutes zones (EPSG:32601-32660, 32701-32760)
//! - MAGNA-SIRGAS / Colombia Bogota zone (EPSG:3116)
//! - MAGNA-SIRGAS / Origen-Nacional, CTM12 (EPSG:9377)

use super::ellipsoid::{Ellipsoid, GRS80, WGS84};
use super::Geographic;
use anyhow::{ensure, Result};

/// Paramètres d'une projection Transverse Mercator
#[derive(Debug, Clone, Copy)]
pub struct TransverseMercator {
    pub ellipsoid: Ellipsoid,
    /// Méridien central (radians)
    pub lon0: f64,
    /// Latitude d'origine (radians)
    pub lat0: f64,
    /// Facteur d'échelle sur le méridien central
    pub k0: f64,
    /// False easting
    pub x0: f64,
    /// False northing
    pub y0: f64,
}

impl TransverseMercator {
    /// Zone UTM sur WGS84
    pub fn utm(zone: u32, south: bool) -> Self {
        Self {
            ellipsoid: WGS84,
            lon0: ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians(),
            lat0: 0.0,
            k0: 0.9996,
            x0: 500000.0,
            y0: if south { 10000000.0 } else { 0.0 },
        }
    }

    /// MAGNA-SIRGAS / Colombia Bogota zone (EPSG:3116)
    pub fn magna_bogota() -> Self {
        Self {
            ellipsoid: GRS80,
            lon0: (-74.07750791666666_f64).to_radians(),
            lat0: 4.596200416666666_f64.to_radians(),
            k0: 1.0,
            x0: 1000000.0,
            y0: 1000000.0,
        }
    }

    /// MAGNA-SIRGAS / Origen-Nacional, CTM12 (EPSG:9377)
    pub fn magna_ctm12() -> Self {
        Self {
            ellipsoid: GRS80,
            lon0: (-73.0_f64).to_radians(),
            lat0: 4.0_f64.to_radians(),
            k0: 0.9992,
            x0: 5000000.0,
            y0: 2000000.0,
        }
    }

    /// Projection correspondant à un code EPSG, si connue
    pub fn from_epsg(epsg: u32) -> Option<Self> {
        match epsg {
            3116 => Some(Self::magna_bogota()),
            9377 => Some(Self::magna_ctm12()),
            32601..=32660 => Some(Self::utm(epsg - 32600, false)),
            32701..=32760 => Some(Self::utm(epsg - 32700, true)),
            _ => None,
        }
    }

    /// Inverse: coordonnées projetées → géographiques
    pub fn to_geographic(&self, x: f64, y: f64) -> Result<Geographic> {
        ensure!(x.is_finite() && y.is_finite(), "Non-finite coordinate ({}, {})", x, y);

        let a = self.ellipsoid.a;
        let e2 = self.ellipsoid.e2();
        let ep2 = self.ellipsoid.ep2();

        let x = x - self.x0;

        // Arc de méridien jusqu'au point pied
        let m = self.ellipsoid.meridian_arc(self.lat0) + (y - self.y0) / self.k0;
        let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let sin_phi1 = phi1.sin();
        let cos_phi1 = phi1.cos();
        let tan_phi1 = phi1.tan();

        let n1 = a / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
        let t1 = tan_phi1.powi(2);
        let c1 = ep2 * cos_phi1.powi(2);
        let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
        let d = x / (n1 * self.k0);

        let lat = phi1
            - (n1 * tan_phi1 / r1)
                * (d.powi(2) / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                        - 252.0 * ep2
                        - 3.0 * c1.powi(2))
                        * d.powi(6)
                        / 720.0);

        let lon = self.lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                    * d.powi(5)
                    / 120.0)
                / cos_phi1;

        Ok(Geographic::new(lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bogota_origin() {
        let geo = TransverseMercator::magna_bogota()
            .to_geographic(1000000.0, 1000000.0)
            .unwrap();
        let (lon, lat) = geo.to_degrees();

        assert!((lon - (-74.07750791666666)).abs() < 1e-7, "lon={}", lon);
        assert!((lat - 4.596200416666666).abs() < 1e-7, "lat={}", lat);
    }

    #[test]
    fn test_ctm12_origin() {
        let geo = TransverseMercator::magna_ctm12()
            .to_geographic(5000000.0, 2000000.0)
            .unwrap();
        let (lon, lat) = geo.to_degrees();

        assert!((lon - (-73.0)).abs() < 1e-7, "lon={}", lon);
        assert!((lat - 4.0).abs() < 1e-7, "lat={}", lat);
    }

    #[test]
    fn test_bogota_utm18n() {
        // Centre de Bogotá: ~ -74.07°E, 4.60°N
        let tm = TransverseMercator::from_epsg(32618).unwrap();
        let (lon, lat) = tm.to_geographic(602000.0, 508000.0).unwrap().to_degrees();

        assert!((lon - (-74.07)).abs() < 0.1, "lon={}", lon);
        assert!((lat - 4.60).abs() < 0.1, "lat={}", lat);
    }

    #[test]
    fn test_reunion_utm40s() {
        // Saint-Denis: 55.45°E, -20.88°S
        let tm = TransverseMercator::from_epsg(32740).unwrap();
        let (lon, lat) = tm.to_geographic(338000.0, 7691000.0).unwrap().to_degrees();

        assert!((lon - 55.45).abs() < 0.2, "lon={}", lon);
        assert!((lat - (-20.88)).abs() < 0.2, "lat={}", lat);
    }

    #[test]
    fn test_unknown_epsg() {
        assert!(TransverseMercator::from_epsg(2154).is_none());
        assert!(TransverseMercator::from_epsg(32661).is_none());
    }
}
