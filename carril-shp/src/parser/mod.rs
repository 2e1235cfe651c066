//! Parsers des fichiers d'un shapefile (SHP, DBF, CPG, PRJ)

pub mod codepage;
pub mod dbf;
pub mod prj;
pub mod shape;
