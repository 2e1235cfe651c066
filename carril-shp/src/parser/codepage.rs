//! Encodage des champs texte dBase
//!
//! Ordre de résolution: libellé du `.cpg`, puis octet LDID de l'en-tête
//! (`CodePageMark`), sinon Windows-1252 comme GDAL pour un en-tête muet.

use std::io::{Read, Seek};

use dbase::encoding::LossyCodePage;
use dbase::yore::code_pages::{
    CP1250, CP1251, CP1252, CP1253, CP1254, CP1255, CP1256, CP437, CP850, CP852, CP861, CP865,
    CP866, CP874,
};
use dbase::{CodePageMark, Reader, UnicodeLossy};
use encoding_rs::Encoding;

/// Page de code d'après un libellé `.cpg` (`UTF-8`, `ISO-8859-1`,
/// `1252`, `ANSI 1252`, `65001`...)
pub fn from_label(label: &str) -> Option<CodePageMark> {
    let label = label.trim();

    // Codes numériques ESRI (avec ou sans préfixe ANSI/OEM/CP)
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    let numeric = match digits.as_str() {
        "437" => Some(CodePageMark::CP437),
        "850" => Some(CodePageMark::CP850),
        "852" => Some(CodePageMark::CP852),
        "861" => Some(CodePageMark::CP861),
        "865" => Some(CodePageMark::CP865),
        "866" => Some(CodePageMark::CP866),
        "874" => Some(CodePageMark::CP874),
        "1250" => Some(CodePageMark::CP1250),
        "1251" => Some(CodePageMark::CP1251),
        "1252" | "88591" => Some(CodePageMark::CP1252),
        "1253" => Some(CodePageMark::CP1253),
        "1254" | "88599" => Some(CodePageMark::CP1254),
        "1255" => Some(CodePageMark::CP1255),
        "1256" => Some(CodePageMark::CP1256),
        "65001" => Some(CodePageMark::Utf8),
        _ => None,
    };
    if numeric.is_some() {
        return numeric;
    }

    let encoding = Encoding::for_label(label.as_bytes())?;
    let known = [
        (encoding_rs::UTF_8, CodePageMark::Utf8),
        (encoding_rs::WINDOWS_1252, CodePageMark::CP1252),
        (encoding_rs::WINDOWS_1250, CodePageMark::CP1250),
        (encoding_rs::WINDOWS_1251, CodePageMark::CP1251),
        (encoding_rs::WINDOWS_1253, CodePageMark::CP1253),
        (encoding_rs::WINDOWS_1254, CodePageMark::CP1254),
        (encoding_rs::WINDOWS_1255, CodePageMark::CP1255),
        (encoding_rs::WINDOWS_1256, CodePageMark::CP1256),
        (encoding_rs::WINDOWS_874, CodePageMark::CP874),
        (encoding_rs::IBM866, CodePageMark::CP866),
    ];
    known
        .iter()
        .find(|(candidate, _)| *candidate == encoding)
        .map(|(_, mark)| *mark)
}

/// Applique la page de code au lecteur; `false` si elle n'est pas décodable
pub fn apply<T: Read + Seek>(reader: &mut Reader<T>, mark: CodePageMark) -> bool {
    match mark {
        CodePageMark::Utf8 => reader.set_encoding(UnicodeLossy),
        CodePageMark::CP437 => reader.set_encoding(LossyCodePage(CP437)),
        CodePageMark::CP850 => reader.set_encoding(LossyCodePage(CP850)),
        CodePageMark::CP852 => reader.set_encoding(LossyCodePage(CP852)),
        CodePageMark::CP861 => reader.set_encoding(LossyCodePage(CP861)),
        CodePageMark::CP865 => reader.set_encoding(LossyCodePage(CP865)),
        CodePageMark::CP866 => reader.set_encoding(LossyCodePage(CP866)),
        CodePageMark::CP874 => reader.set_encoding(LossyCodePage(CP874)),
        CodePageMark::CP1250 => reader.set_encoding(LossyCodePage(CP1250)),
        CodePageMark::CP1251 => reader.set_encoding(LossyCodePage(CP1251)),
        CodePageMark::CP1252 => reader.set_encoding(LossyCodePage(CP1252)),
        CodePageMark::CP1253 => reader.set_encoding(LossyCodePage(CP1253)),
        CodePageMark::CP1254 => reader.set_encoding(LossyCodePage(CP1254)),
        CodePageMark::CP1255 => reader.set_encoding(LossyCodePage(CP1255)),
        CodePageMark::CP1256 => reader.set_encoding(LossyCodePage(CP1256)),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(label: &str) -> Option<u8> {
        from_label(label).map(u8::from)
    }

    #[test]
    fn test_esri_labels() {
        assert_eq!(code("UTF-8"), Some(0xF0));
        assert_eq!(code("65001"), Some(0xF0));
        assert_eq!(code("ANSI 1252"), Some(0x03));
        assert_eq!(code("1252\r\n"), Some(0x03));
        assert_eq!(code("OEM 850"), Some(0x02));
    }

    #[test]
    fn test_whatwg_labels() {
        // ISO-8859-1 et latin1 sont décodés comme Windows-1252
        assert_eq!(code("ISO-8859-1"), Some(0x03));
        assert_eq!(code("latin1"), Some(0x03));
        assert_eq!(code("windows-1251"), Some(0xC9));
    }

    #[test]
    fn test_unknown_labels() {
        assert_eq!(code("ISO-8859-15"), None);
        assert_eq!(code("not an encoding"), None);
        assert_eq!(code(""), None);
    }
}
