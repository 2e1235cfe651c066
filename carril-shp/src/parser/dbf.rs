//! Lecture de la table attributaire dBase (.dbf)

use std::path::Path;

use dbase::{CodePageMark, FieldValue};
use tracing::{debug, warn};

use super::codepage;
use crate::types::AttributeValue;
use crate::DatasetError;

/// Table attributaire: colonnes ordonnées + lignes dans le même ordre
#[derive(Debug, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<(String, AttributeValue)>>,
}

/// Lit un fichier .dbf en conservant l'ordre des colonnes.
///
/// `cpg` est le contenu du fichier `.cpg` s'il existe; il prime sur
/// l'octet LDID de l'en-tête. Sans l'un ni l'autre, le texte est lu en
/// Windows-1252 (sur-ensemble de Latin-1).
pub fn read(path: &Path, cpg: Option<&str>) -> Result<Table, DatasetError> {
    let mut reader = dbase::Reader::from_path(path)?;

    let declared = cpg.and_then(|label| {
        let mark = codepage::from_label(label);
        if mark.is_none() {
            warn!(label = label.trim(), "Unknown .cpg encoding, falling back to the dBase header");
        }
        mark
    });
    let header = reader.header().code_page_mark;

    let mut applied = None;
    for mark in declared.into_iter().chain([header, CodePageMark::CP1252]) {
        if codepage::apply(&mut reader, mark) {
            applied = Some(mark);
            break;
        }
    }
    debug!(path = %path.display(), encoding = ?applied, ldid = u8::from(header), "dBase text encoding");

    let columns: Vec<String> = reader
        .fields()
        .iter()
        .map(|field| field.name().to_string())
        .collect();

    debug!(path = %path.display(), columns = columns.len(), "Reading dBase table");

    let mut rows = Vec::new();
    for record in reader.iter_records() {
        let record = record?;
        let row = columns
            .iter()
            .map(|name| {
                let value = record.get(name).map(convert).unwrap_or(AttributeValue::Null);
                (name.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok(Table { columns, rows })
}

/// Convertit une valeur dBase en scalaire JSON
pub fn convert(value: &FieldValue) -> AttributeValue {
    match value {
        FieldValue::Character(Some(s)) | FieldValue::Memo(s) => {
            let s = s.trim_end();
            if s.is_empty() {
                AttributeValue::Null
            } else {
                AttributeValue::Text(s.to_string())
            }
        }
        FieldValue::Character(None) => AttributeValue::Null,
        FieldValue::Numeric(Some(n)) => numeric(*n),
        FieldValue::Numeric(None) => AttributeValue::Null,
        FieldValue::Float(Some(f)) => float(f64::from(*f)),
        FieldValue::Float(None) => AttributeValue::Null,
        FieldValue::Integer(i) => AttributeValue::Integer(i64::from(*i)),
        FieldValue::Double(d) | FieldValue::Currency(d) => float(*d),
        FieldValue::Logical(Some(b)) => AttributeValue::Bool(*b),
        FieldValue::Logical(None) => AttributeValue::Null,
        FieldValue::Date(Some(date)) => AttributeValue::Text(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        )),
        FieldValue::Date(None) => AttributeValue::Null,
        FieldValue::DateTime(dt) => {
            let (date, time) = (dt.date(), dt.time());
            AttributeValue::Text(format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                date.year(),
                date.month(),
                date.day(),
                time.hours(),
                time.minutes(),
                time.seconds()
            ))
        }
        #[allow(unreachable_patterns)]
        other => {
            warn!(value = ?other, "Unsupported dBase field value, set to null");
            AttributeValue::Null
        }
    }
}

/// Les champs numériques sans décimale deviennent des entiers
fn numeric(n: f64) -> AttributeValue {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        AttributeValue::Integer(n as i64)
    } else {
        float(n)
    }
}

fn float(x: f64) -> AttributeValue {
    if x.is_finite() {
        AttributeValue::Float(x)
    } else {
        AttributeValue::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_character() {
        assert_eq!(
            convert(&FieldValue::Character(Some("Calle 26  ".to_string()))),
            AttributeValue::Text("Calle 26".to_string())
        );
        assert_eq!(
            convert(&FieldValue::Character(Some("   ".to_string()))),
            AttributeValue::Null
        );
        assert_eq!(convert(&FieldValue::Character(None)), AttributeValue::Null);
    }

    #[test]
    fn test_convert_numeric() {
        assert_eq!(convert(&FieldValue::Numeric(Some(12.0))), AttributeValue::Integer(12));
        assert_eq!(convert(&FieldValue::Numeric(Some(1.5))), AttributeValue::Float(1.5));
        assert_eq!(convert(&FieldValue::Numeric(None)), AttributeValue::Null);
        assert_eq!(convert(&FieldValue::Double(f64::NAN)), AttributeValue::Null);
        assert_eq!(convert(&FieldValue::Integer(-3)), AttributeValue::Integer(-3));
    }

    #[test]
    fn test_convert_memo_and_date() {
        assert_eq!(
            convert(&FieldValue::Memo("Av. Caracas ".to_string())),
            AttributeValue::Text("Av. Caracas".to_string())
        );
        assert_eq!(convert(&FieldValue::Float(Some(0.5))), AttributeValue::Float(0.5));
    }

    #[test]
    fn test_convert_logical() {
        assert_eq!(convert(&FieldValue::Logical(Some(true))), AttributeValue::Bool(true));
        assert_eq!(convert(&FieldValue::Logical(None)), AttributeValue::Null);
    }
}
