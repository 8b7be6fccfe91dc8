//! # Project File Text
//!
//! Visual Studio writes `.sln`/`.vcxproj` files as UTF-8 (often with a BOM)
//! and `.rc` resource scripts as UTF-16 LE with a BOM. To rewrite them without
//! corrupting anything we decode based on the BOM, do the replacement on a
//! `String`, and encode back to exactly the same encoding.
//!
//! Older resource scripts are ANSI (a Windows code page, e.g. a `©` stored as `0xA9`).
//! Those are kept as raw bytes and the ASCII keyword is swapped byte-for-byte,
//! so every other byte survives untouched.
//!
//! Line endings are never touched.

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
}

/// Decoded file contents together with what is needed to write them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextDocument {
    /// Text in one of the Unicode encodings.
    Unicode { encoding: TextEncoding, text: String },
    /// No BOM and not valid UTF-8: an ANSI code page we do not decode.
    Ansi(Vec<u8>),
}

impl TextDocument {
    /// Detects the encoding from the BOM and decodes the contents.
    ///
    /// Without a BOM, bytes that are not valid UTF-8 are kept as an ANSI document.
    /// A BOM followed by invalid data is an error.
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
            let text = std::str::from_utf8(rest).map_err(|e| e.to_string())?;
            return Ok(Self::unicode(TextEncoding::Utf8Bom, text.to_string()));
        }
        if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
            let text = decode_utf16(rest, u16::from_le_bytes)?;
            return Ok(Self::unicode(TextEncoding::Utf16Le, text));
        }
        if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
            let text = decode_utf16(rest, u16::from_be_bytes)?;
            return Ok(Self::unicode(TextEncoding::Utf16Be, text));
        }
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Self::unicode(TextEncoding::Utf8, text.to_string())),
            Err(_) => Ok(Self::Ansi(bytes.to_vec())),
        }
    }

    fn unicode(encoding: TextEncoding, text: String) -> Self {
        Self::Unicode { encoding, text }
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Unicode { encoding: TextEncoding::Utf8, text } => text.as_bytes().to_vec(),
            Self::Unicode { encoding: TextEncoding::Utf8Bom, text } => [UTF8_BOM, text.as_bytes()].concat(),
            Self::Unicode { encoding: TextEncoding::Utf16Le, text } => {
                let mut out = UTF16_LE_BOM.to_vec();
                out.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
                out
            }
            Self::Unicode { encoding: TextEncoding::Utf16Be, text } => {
                let mut out = UTF16_BE_BOM.to_vec();
                out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                out
            }
            Self::Ansi(bytes) => bytes.clone(),
        }
    }

    /// Replaces every occurrence of `from` with `to`. Returns the number of replacements.
    ///
    /// ANSI documents only accept ASCII names: their code page is unknown, so
    /// anything else could not be written back faithfully.
    pub fn replace_all(&mut self, from: &str, to: &str) -> Result<usize, String> {
        match self {
            Self::Unicode { text, .. } => {
                let count = count_occurrences(text, from);
                if count > 0 {
                    *text = text.replace(from, to);
                }
                Ok(count)
            }
            Self::Ansi(bytes) => {
                if !from.is_ascii() || !to.is_ascii() {
                    return Err(format!(
                        "file is not UTF-8 and {:?} -> {:?} is not plain ASCII",
                        from, to
                    ));
                }
                let (replaced, count) = replace_bytes(bytes, from.as_bytes(), to.as_bytes());
                *bytes = replaced;
                Ok(count)
            }
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        match self {
            Self::Unicode { text, .. } => text.contains(needle),
            Self::Ansi(bytes) => {
                let needle = needle.as_bytes();
                needle.is_empty() || bytes.windows(needle.len()).any(|w| w == needle)
            }
        }
    }
}

/// Counts matches the same way `str::replace` finds them.
///
/// An empty needle matches at every char boundary, including both ends.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        haystack.chars().count() + 1
    } else {
        haystack.matches(needle).count()
    }
}

/// Byte-level counterpart of `str::replace`: left to right, non-overlapping.
fn replace_bytes(haystack: &[u8], from: &[u8], to: &[u8]) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(haystack.len());
    let mut count = 0;

    if from.is_empty() {
        for &b in haystack {
            out.extend_from_slice(to);
            out.push(b);
        }
        out.extend_from_slice(to);
        return (out, haystack.len() + 1);
    }

    let mut i = 0;
    while i < haystack.len() {
        if haystack[i..].starts_with(from) {
            out.extend_from_slice(to);
            i += from.len();
            count += 1;
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }
    (out, count)
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err("odd number of bytes in UTF-16 text".to_string());
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| e.to_string())
}
