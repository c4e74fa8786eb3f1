//! Import-name to package-name mapping
//!
//! Combines a built-in table of well-known discrepancies with a
//! user-editable JSON override file. The override table wins on key
//! collisions. A missing override file is non-fatal (built-ins alone are
//! used); a malformed one aborts the run, since scanning without a
//! trustworthy resolution policy would produce a misleading manifest.

use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{PyreqsError, Result};

/// Default override file name, looked up in the scan root
pub const DEFAULT_MAPPING_FILE: &str = "package_mapping.json";

/// Import names whose pip distribution is published under a different name
const BUILT_IN: &[(&str, &str)] = &[
    ("attr", "attrs"),
    ("bs4", "beautifulsoup4"),
    ("cairo", "pycairo"),
    ("Crypto", "pycryptodome"),
    ("cv2", "opencv-python"),
    ("dateutil", "python-dateutil"),
    ("docx", "python-docx"),
    ("dotenv", "python-dotenv"),
    ("fitz", "PyMuPDF"),
    ("gi", "PyGObject"),
    ("github", "PyGithub"),
    ("jwt", "PyJWT"),
    ("magic", "python-magic"),
    ("OpenSSL", "pyOpenSSL"),
    ("PIL", "Pillow"),
    ("pptx", "python-pptx"),
    ("serial", "pyserial"),
    ("skimage", "scikit-image"),
    ("sklearn", "scikit-learn"),
    ("slugify", "python-slugify"),
    ("usb", "pyusb"),
    ("yaml", "PyYAML"),
];

/// Raw override entries in file order. A plain map would silently keep the
/// last value for a duplicate key; keeping every entry lets validation
/// reject duplicates case-sensitively.
struct RawTable(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for RawTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = RawTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object of import-name to package-name strings")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(RawTable(entries))
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// String values only, no empty names, no duplicate keys
fn validate(entries: Vec<(String, serde_json::Value)>) -> Result<BTreeMap<String, String>> {
    let mut table = BTreeMap::new();
    for (key, value) in entries {
        let value = value.as_str().ok_or_else(|| PyreqsError::MappingInvalid {
            message: format!("value for '{key}' must be a string"),
        })?;
        if key.is_empty() || value.is_empty() {
            return Err(PyreqsError::MappingInvalid {
                message: format!("empty name in entry '{key}': '{value}'"),
            });
        }
        if table.insert(key.clone(), value.to_string()).is_some() {
            return Err(PyreqsError::MappingInvalid {
                message: format!("duplicate key '{key}'"),
            });
        }
    }
    Ok(table)
}

/// Loaded mapping: user overrides layered over the built-in table
#[derive(Debug)]
pub struct PackageMapping {
    overrides: BTreeMap<String, String>,
}

impl PackageMapping {
    /// Mapping with no user overrides
    pub fn built_in() -> Self {
        Self {
            overrides: BTreeMap::new(),
        }
    }

    /// Load user overrides from a JSON file on top of the built-in table
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| PyreqsError::IoError {
            message: format!("{}: {err}", path.display()),
        })?;
        let raw: RawTable =
            serde_json::from_str(&content).map_err(|err| PyreqsError::MappingParseFailed {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            overrides: validate(raw.0)?,
        })
    }

    /// Exact match in the user override table
    pub fn lookup_override(&self, import_name: &str) -> Option<&str> {
        self.overrides.get(import_name).map(String::as_str)
    }

    /// Exact match in the built-in discrepancy table
    pub fn lookup_built_in(&self, import_name: &str) -> Option<&str> {
        BUILT_IN
            .iter()
            .find(|(import, _)| *import == import_name)
            .map(|(_, package)| *package)
    }
}
