//! Web Mercator (EPSG:3857), inverse seulement
//!
//! Sphère de rayon égal au demi-grand axe WGS84: les fonds de carte
//! exportés en 3857 sont ramenés en degrés.

use super::ellipsoid::WGS84;
use super::Geographic;
use anyhow::{ensure, Result};

/// Mètres Web Mercator → longitude/latitude (radians)
pub fn to_geographic(x: f64, y: f64) -> Result<Geographic> {
    ensure!(x.is_finite() && y.is_finite(), "Non-finite coordinate ({}, {})", x, y);

    let lon = x / WGS84.a;
    // Latitude isométrique inversée (fonction de Gudermann)
    let lat = (y / WGS84.a).sinh().atan();

    Ok(Geographic::new(lon, lat))
}
