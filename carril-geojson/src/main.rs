//! Point d'entrée: conversion du shapefile des carriles preferenciales

use anyhow::Result;
use carril_geojson::export::reproject;
use carril_geojson::{convert_with, ConsoleReport, ConverterConfig};
use tracing::{debug, error, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

fn main() -> Result<()> {
    load_env();
    init_logging(quiet_from_env());

    let config = ConverterConfig::from_env()?;
    debug!(?config, proj = reproject::is_available(), "Configuration loaded");

    let mut report = ConsoleReport::default();
    match convert_with(&config, &mut report) {
        Ok(outcome) => {
            debug!(reprojected = outcome.summary.reprojected, "Conversion done");
        }
        Err(e) => {
            // Échec signalé, sans code de sortie d'erreur
            error!(error = %e, "Conversion failed");
            print!("{}", ConsoleReport::error_section(&e));
        }
    }

    Ok(())
}

fn quiet_from_env() -> bool {
    std::env::var("CARRILES_QUIET")
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn init_logging(quiet: bool) {
    let level = if quiet { Level::WARN } else { Level::INFO };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
