//! Définitions des ellipsoïdes

/// Ellipsoïde de référence (demi-grand axe + aplatissement)
#[derive(Debug, Clone, Copy)]
pub struct Ellipsoid {
    /// Demi-grand axe (rayon équatorial) en mètres
    pub a: f64,
    /// Aplatissement
    pub f: f64,
}

/// WGS84
pub const WGS84: Ellipsoid = Ellipsoid {
    a: 6378137.0,
    f: 1.0 / 298.257223563,
};

/// GRS80 (MAGNA-SIRGAS). Écart avec WGS84 < 0.1mm
pub const GRS80: Ellipsoid = Ellipsoid {
    a: 6378137.0,
    f: 1.0 / 298.257222101,
};

impl Ellipsoid {
    /// Première excentricité au carré
    pub fn e2(&self) -> f64 {
        2.0 * self.f - self.f * self.f
    }

    /// Première excentricité
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    /// Deuxième excentricité au carré
    pub fn ep2(&self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }

    /// Longueur de l'arc de méridien depuis l'équateur (Snyder 3-21)
    pub fn meridian_arc(&self, lat: f64) -> f64 {
        let e2 = self.e2();
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        self.a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
    }
}
