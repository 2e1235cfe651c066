//! Configuration du convertisseur

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Shapefile source par défaut
pub const DEFAULT_INPUT: &str = "Shape_carril_preferencial/CP2025_NS_EW_Merge.shp";

/// GeoJSON produit par défaut
pub const DEFAULT_OUTPUT: &str = "carriles_preferenciales.geojson";

/// Configuration d'une conversion
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Chemin du fichier .shp
    pub input: PathBuf,

    /// Chemin du GeoJSON à écrire (écrasé s'il existe)
    pub output: PathBuf,

    /// EPSG à supposer quand le .prj est absent ou non reconnu
    pub source_epsg: Option<u32>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            source_epsg: None,
        }
    }
}

impl ConverterConfig {
    /// Configuration pour une paire entrée/sortie
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            source_epsg: None,
        }
    }

    /// Charge une configuration depuis un fichier JSON
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge la configuration depuis les variables d'environnement
    ///
    /// `CARRILES_CONFIG` désigne un fichier JSON de base; `CARRILES_INPUT`,
    /// `CARRILES_OUTPUT` et `CARRILES_SOURCE_EPSG` le surchargent.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os("CARRILES_CONFIG") {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(input) = std::env::var_os("CARRILES_INPUT") {
            config.input = PathBuf::from(input);
        }
        if let Some(output) = std::env::var_os("CARRILES_OUTPUT") {
            config.output = PathBuf::from(output);
        }
        if let Ok(epsg) = std::env::var("CARRILES_SOURCE_EPSG") {
            let epsg = epsg
                .trim()
                .trim_start_matches("EPSG:")
                .parse()
                .context(format!("Invalid CARRILES_SOURCE_EPSG: {}", epsg))?;
            config.source_epsg = Some(epsg);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = ConverterConfig::default();
        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.source_epsg, None);
    }

    #[test]
    fn test_load_partial_json() {
        let path = std::env::temp_dir().join(format!("carriles-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"output": "out/lanes.geojson", "source_epsg": 3116}"#).unwrap();

        let config = ConverterConfig::load(&path).unwrap();
        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.output, PathBuf::from("out/lanes.geojson"));
        assert_eq!(config.source_epsg, Some(3116));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_missing_file() {
        assert!(ConverterConfig::load(Path::new("/nonexistent/carriles.json")).is_err());
    }
}
