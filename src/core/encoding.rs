//! Text encoding detection with a fixed fallback order
//!
//! Files are decoded as UTF-8 with a byte-order mark, then plain UTF-8, then
//! Latin-1. The encoding that succeeded is kept so the rewritten text goes
//! back to disk in the same form it came from.

use serde::Serialize;
use std::fmt;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encoding a document was read with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextEncoding {
    /// UTF-8 preceded by a byte-order mark
    #[serde(rename = "utf-8-sig")]
    Utf8Bom,
    #[serde(rename = "utf-8")]
    Utf8,
    /// ISO-8859-1, decodes any byte sequence
    #[serde(rename = "latin-1")]
    Latin1,
}

impl TextEncoding {
    /// Order in which decoding is attempted
    pub const FALLBACK_ORDER: [TextEncoding; 3] = [Self::Utf8Bom, Self::Utf8, Self::Latin1];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8Bom => "utf-8-sig",
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes`, or `None` if they are not valid in this encoding
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8Bom => {
                let rest = bytes.strip_prefix(UTF8_BOM)?;
                std::str::from_utf8(rest).ok().map(str::to_owned)
            }
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Encode `text`, or `None` if it holds characters this encoding lacks
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        match self {
            Self::Utf8Bom => {
                let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
                bytes.extend_from_slice(UTF8_BOM);
                bytes.extend_from_slice(text.as_bytes());
                Some(bytes)
            }
            Self::Utf8 => Some(text.as_bytes().to_vec()),
            Self::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect(),
        }
    }

    /// Try each encoding of [`Self::FALLBACK_ORDER`] and return the first hit
    pub fn detect(bytes: &[u8]) -> Option<(TextEncoding, String)> {
        Self::FALLBACK_ORDER
            .iter()
            .find_map(|encoding| encoding.decode(bytes).map(|text| (*encoding, text)))
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_plain_utf8() {
        let (encoding, text) = TextEncoding::detect("# Café\n".as_bytes()).unwrap();
        assert_eq!(encoding, TextEncoding::Utf8);
        assert_eq!(text, "# Café\n");
    }

    #[test]
    fn test_detect_bom_strips_marker() {
        let bytes = b"\xEF\xBB\xBF---\ntitle: x\n---\n";
        let (encoding, text) = TextEncoding::detect(bytes).unwrap();
        assert_eq!(encoding, TextEncoding::Utf8Bom);
        assert_eq!(text, "---\ntitle: x\n---\n");
        assert_eq!(encoding.encode(&text).unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_detect_latin1_fallback() {
        let bytes = b"# Caf\xE9\n";
        let (encoding, text) = TextEncoding::detect(bytes).unwrap();
        assert_eq!(encoding, TextEncoding::Latin1);
        assert_eq!(text, "# Café\n");
        assert_eq!(encoding.encode("## Café\n").unwrap(), b"## Caf\xE9\n".to_vec());
    }

    #[test]
    fn test_latin1_rejects_wide_chars() {
        assert_eq!(TextEncoding::Latin1.encode("✓"), None);
    }

    #[test]
    fn test_bom_with_invalid_body_falls_back() {
        let bytes = b"\xEF\xBB\xBF# \xFF\n";
        let (encoding, _) = TextEncoding::detect(bytes).unwrap();
        assert_eq!(encoding, TextEncoding::Latin1);
    }

    #[test]
    fn test_names() {
        assert_eq!(TextEncoding::Utf8Bom.to_string(), "utf-8-sig");
        assert_eq!(TextEncoding::Latin1.name(), "latin-1");
    }
}
