//! Parser pour les fichiers PRJ (projection en WKT)

use std::sync::OnceLock;

use regex::Regex;

use crate::types::Crs;
use crate::DatasetError;

/// Mapping des noms WKT (normalisés) vers EPSG
const PROJECTIONS: &[(&str, u32)] = &[
    ("wgs1984webmercatorauxiliarysphere", 3857),
    ("wgs1984webmercator", 3857),
    ("wgs84pseudomercator", 3857),
    ("magnacolombiabogota", 3116),
    ("magnasirgascolombiabogotazone", 3116),
    ("magnasirgasorigennacional", 9377),
    ("magnasirgasctm12", 9377),
    ("magnasirgascmt12", 9377),
];

/// Noms de systèmes géographiques (racine GEOGCS)
const GEOGRAPHIC: &[(&str, u32)] = &[
    ("gcswgs1984", 4326),
    ("wgs84", 4326),
    ("wgs1984", 4326),
    ("gcsmagna", 4686),
    ("magnasirgas", 4686),
];

fn root_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*(PROJCS|GEOGCS|PROJCRS|GEOGCRS|GEODCRS)\s*\[\s*"([^"]*)""#)
            .expect("valid regex")
    })
}

fn authority_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Autorité de la racine uniquement: suivie du crochet fermant final
    RE.get_or_init(|| {
        Regex::new(r#"(?:AUTHORITY|ID)\[\s*"EPSG"\s*,\s*"?(\d+)"?\s*\]\s*\]\s*$"#)
            .expect("valid regex")
    })
}

fn utm_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)UTM[_ ]zone[_ ](\d{1,2})([NS])\b").expect("valid regex"))
}

/// Nom de la racine du WKT (PROJCS["nom", ...])
pub fn root_name(wkt: &str) -> Option<String> {
    root_regex()
        .captures(wkt)
        .map(|caps| caps[2].to_string())
}

/// Parse le contenu d'un fichier .prj pour identifier le CRS
pub fn parse(wkt: &str) -> Result<Crs, DatasetError> {
    let wkt = wkt.trim().trim_start_matches('\u{feff}');
    if wkt.is_empty() {
        return Err(DatasetError::UnknownProjection("empty .prj file".to_string()));
    }

    let caps = root_regex()
        .captures(wkt)
        .ok_or_else(|| DatasetError::UnknownProjection(truncate(wkt)))?;
    let kind = caps[1].to_ascii_uppercase();
    let name = caps[2].to_string();

    let crs = |epsg: u32| Crs {
        epsg: Some(epsg),
        name: Some(name.clone()),
        wkt: Some(wkt.to_string()),
    };

    // 1. Code EPSG explicite (WKT OGC)
    if let Some(epsg) = authority_regex()
        .captures(wkt)
        .and_then(|c| c[1].parse::<u32>().ok())
    {
        return Ok(crs(epsg));
    }

    // 2. Noms connus (WKT ESRI)
    let normalized = normalize(&name);
    let table = if kind.starts_with("PROJ") {
        PROJECTIONS
    } else {
        GEOGRAPHIC
    };
    for &(known, epsg) in table {
        if normalized == known {
            return Ok(crs(epsg));
        }
    }

    // 3. Zones UTM sur WGS84
    if kind.starts_with("PROJ") && normalized.starts_with("wgs") && normalized.contains("84") {
        if let Some(c) = utm_regex().captures(&name) {
            if let Ok(zone) = c[1].parse::<u32>() {
                if (1..=60).contains(&zone) {
                    let base = if c[2].eq_ignore_ascii_case("N") { 32600 } else { 32700 };
                    return Ok(crs(base + zone));
                }
            }
        }
    }

    Err(DatasetError::UnknownProjection(name))
}

/// Minuscules, caractères alphanumériques uniquement
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn truncate(s: &str) -> String {
    s.chars().take(60).collect()
}
