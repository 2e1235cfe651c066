//! Choix du moteur de reprojection pour un CRS source

use super::ReprojectorLite;
use anyhow::Result;
use carril_shp::{Crs, WGS84_EPSG};
use geo::Geometry;

/// Moteur retenu pour un couple source/cible
pub enum SmartReprojector {
    /// Source déjà dans le CRS cible
    Identity,
    /// Transformation intégrée vers EPSG:4326
    Lite(ReprojectorLite),
    /// Pipeline PROJ (code EPSG ou WKT du .prj)
    #[cfg(feature = "reproject")]
    Proj(crate::export::reproject::Reprojector),
}

impl SmartReprojector {
    /// Identity si rien à faire, la transformation intégrée si elle couvre
    /// la source, PROJ sinon
    pub fn new(source: &Crs, target_epsg: u32) -> Result<Self> {
        if source.epsg == Some(target_epsg) {
            return Ok(Self::Identity);
        }

        match source.epsg {
            Some(epsg) if target_epsg == WGS84_EPSG && ReprojectorLite::is_supported(epsg) => {
                return Ok(Self::Lite(ReprojectorLite::new(epsg)?));
            }
            _ => {}
        }

        #[cfg(feature = "reproject")]
        {
            let proj = crate::export::reproject::Reprojector::new(source, target_epsg)?;
            return Ok(Self::Proj(proj));
        }

        #[cfg(not(feature = "reproject"))]
        anyhow::bail!(
            "No built-in transformation from {} to EPSG:{}; enable the `reproject` feature to use PROJ",
            source,
            target_epsg
        );
    }

    pub fn transform_geometry(&self, geom: &Geometry) -> Result<Geometry> {
        match self {
            Self::Identity => Ok(geom.clone()),
            Self::Lite(lite) => lite.transform_geometry(geom),
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => proj.transform_geometry(geom),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Nom du moteur, pour les diagnostics
    pub fn description(&self) -> &'static str {
        match self {
            Self::Identity => "identity (no reprojection)",
            Self::Lite(_) => "built-in transverse mercator / web mercator",
            #[cfg(feature = "reproject")]
            Self::Proj(_) => "PROJ",
        }
    }
}
