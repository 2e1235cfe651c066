//! Types d'erreurs pour le crate carril-shp

use std::path::PathBuf;

use thiserror::Error;

/// Erreurs pouvant survenir lors de la lecture d'un shapefile
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Le fichier .shp n'existe pas
    #[error("Shapefile not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Erreur d'I/O lors de la lecture d'un fichier annexe (.prj)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fichier .shp/.shx illisible ou corrompu
    #[error("Invalid shapefile: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// Table attributaire .dbf illisible ou corrompue
    #[error("Invalid dBase table: {0}")]
    Dbase(#[from] shapefile::dbase::Error),

    /// Le nombre de géométries ne correspond pas au nombre d'enregistrements
    #[error("Record count mismatch: {shapes} shapes but {records} dBase records")]
    RecordCountMismatch { shapes: usize, records: usize },

    /// Projection .prj non reconnue
    #[error("Unknown projection: {0}")]
    UnknownProjection(String),
}

impl DatasetError {
    /// Vrai si l'erreur vient d'un fichier absent
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
