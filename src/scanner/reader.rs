//! Encoding-tolerant source reading
//!
//! Python sources in the wild are not reliably UTF-8. Files are read as raw
//! bytes and decoded UTF-8 first; on failure the bytes are run through
//! `chardetng` and decoded with the detected `encoding_rs` encoding. A file
//! that still malforms (or looks binary outright) is skipped by the caller.

use chardetng::EncodingDetector;
use std::fmt;
use std::path::Path;

/// Why a source file could not be turned into text
#[derive(Debug)]
pub enum DecodeError {
    Io(std::io::Error),
    /// Contains NUL bytes; not a text file
    Binary,
    /// Decoding failed even with the detected encoding
    Undecodable { encoding: &'static str },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Io(err) => write!(f, "{err}"),
            DecodeError::Binary => write!(f, "file looks binary"),
            DecodeError::Undecodable { encoding } => {
                write!(f, "not valid UTF-8 and decoding as {encoding} failed")
            }
        }
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        DecodeError::Io(err)
    }
}

/// Read a source file as text, detecting the encoding if it is not UTF-8
pub fn read_source(path: &Path) -> Result<String, DecodeError> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

fn decode(bytes: &[u8]) -> Result<String, DecodeError> {
    if bytes.contains(&0) {
        return Err(DecodeError::Binary);
    }

    // Common case: already UTF-8 (optionally with a BOM)
    let without_bom = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(without_bom) {
        return Ok(text.to_string());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::Undecodable {
            encoding: encoding.name(),
        });
    }
    Ok(text.into_owned())
}
