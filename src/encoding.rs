//! Text encodings for string accessors.

use core::fmt;
use core::str::FromStr;

use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::{alphabet, Engine};

use crate::{Error, Result};

/// Accepts base64 input with or without padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A text encoding understood by the string accessors.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum TextEncoding {
    /// UTF-8. Invalid sequences decode to U+FFFD.
    #[default]
    Utf8,
    /// UTF-16, little-endian code units.
    Utf16Le,
    /// One byte per character; encoding keeps the low byte of each code point.
    Latin1,
    /// Like `Latin1`, but decoding clears the high bit.
    Ascii,
    /// Lowercase hexadecimal digits, two per byte.
    Hex,
    /// Standard base64 alphabet.
    Base64,
}

const NAMES: &[(&str, TextEncoding)] = &[
    ("utf8", TextEncoding::Utf8),
    ("utf-8", TextEncoding::Utf8),
    ("utf16le", TextEncoding::Utf16Le),
    ("utf-16le", TextEncoding::Utf16Le),
    ("ucs2", TextEncoding::Utf16Le),
    ("ucs-2", TextEncoding::Utf16Le),
    ("latin1", TextEncoding::Latin1),
    ("binary", TextEncoding::Latin1),
    ("ascii", TextEncoding::Ascii),
    ("hex", TextEncoding::Hex),
    ("base64", TextEncoding::Base64),
];

impl TextEncoding {
    /// The canonical name of the encoding.
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Utf16Le => "utf16le",
            Self::Latin1 => "latin1",
            Self::Ascii => "ascii",
            Self::Hex => "hex",
            Self::Base64 => "base64",
        }
    }

    /// Decodes `bytes` into a string. Decoding never fails; malformed input is replaced.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Utf16Le => {
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Self::Ascii => bytes.iter().map(|&b| char::from(b & 0x7f)).collect(),
            Self::Hex => hex::encode(bytes),
            Self::Base64 => STANDARD.encode(bytes),
        }
    }

    /// Encodes the whole of `text`.
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        self.encode_bounded(text, usize::MAX)
    }

    /// Encodes the longest prefix of `text` whose encoding fits in `max_len` bytes.
    ///
    /// For the character encodings the prefix always ends on a character boundary, so the
    /// result can be shorter than `max_len` even when `text` is longer. For `Hex` and `Base64`
    /// the text describes bytes, and the decoded bytes are truncated to `max_len`.
    pub fn encode_bounded(self, text: &str, max_len: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        match self {
            Self::Utf8 => {
                let mut buf = [0u8; 4];
                for c in text.chars() {
                    if !push_bounded(&mut out, c.encode_utf8(&mut buf).as_bytes(), max_len) {
                        break;
                    }
                }
            }
            Self::Utf16Le => {
                let mut units = [0u16; 2];
                for c in text.chars() {
                    let mut bytes = [0u8; 4];
                    let encoded = c.encode_utf16(&mut units);
                    for (i, unit) in encoded.iter().enumerate() {
                        bytes[2 * i..2 * i + 2].copy_from_slice(&unit.to_le_bytes());
                    }
                    if !push_bounded(&mut out, &bytes[..2 * encoded.len()], max_len) {
                        break;
                    }
                }
            }
            Self::Latin1 | Self::Ascii => {
                out.extend(text.chars().take(max_len).map(|c| c as u32 as u8));
            }
            Self::Hex => {
                out = hex::decode(text).map_err(|e| Error::InvalidText {
                    encoding: self.name(),
                    reason: e.to_string(),
                })?;
                out.truncate(max_len);
            }
            Self::Base64 => {
                let trimmed: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
                out = LENIENT_BASE64.decode(trimmed).map_err(|e| Error::InvalidText {
                    encoding: self.name(),
                    reason: e.to_string(),
                })?;
                out.truncate(max_len);
            }
        }
        Ok(out)
    }
}

/// Appends `bytes` if they fit under `max_len`; returns false once they do not.
fn push_bounded(out: &mut Vec<u8>, bytes: &[u8], max_len: usize) -> bool {
    if max_len - out.len() < bytes.len() {
        return false;
    }
    out.extend_from_slice(bytes);
    true
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, encoding)| encoding)
            .ok_or_else(|| Error::UnknownEncoding(s.to_string()))
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
