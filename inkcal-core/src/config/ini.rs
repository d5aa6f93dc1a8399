//! Reading and writing the flat two-section INI layout.
//!
//! Every persisted field is described once below. Loading looks each one up
//! with its fallback default; saving writes them in `FIELDS` order.

use std::collections::HashMap;
use std::io::Write;

use ::ini::{Ini, ParseOption};

use crate::error::{InkCalError, InkCalResult};

pub(crate) const API_KEYS: &str = "API_KEYS";
pub(crate) const CONFIG: &str = "CONFIG";

/// Location and fallback of one persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Field {
    pub section: &'static str,
    pub key: &'static str,
    pub default: &'static str,
}

pub(crate) const OWM: Field = Field { section: API_KEYS, key: "OWM", default: "" };
pub(crate) const GOOGLE_TOKEN: Field = Field { section: API_KEYS, key: "Google_Token", default: "" };
pub(crate) const GOOGLE_REFRESH_TOKEN: Field =
    Field { section: API_KEYS, key: "Google_Refresh_Token", default: "" };
pub(crate) const GOOGLE_CLIENT_ID: Field =
    Field { section: API_KEYS, key: "Google_Client_Id", default: "" };
// Misspelling is part of the on-disk format.
pub(crate) const GOOGLE_CLIENT_SECRET: Field =
    Field { section: API_KEYS, key: "Google_Client_Secrete", default: "" };
pub(crate) const CITY_ID: Field = Field { section: CONFIG, key: "City_Id", default: "0" };
pub(crate) const UNITS: Field = Field { section: CONFIG, key: "Units", default: "celsius" };
pub(crate) const SELECTED_CALENDARS: Field =
    Field { section: CONFIG, key: "Selected_Calendars", default: "" };

/// All persisted fields, in the order they are written.
pub(crate) const FIELDS: [Field; 8] = [
    OWM,
    GOOGLE_TOKEN,
    GOOGLE_REFRESH_TOKEN,
    GOOGLE_CLIENT_ID,
    GOOGLE_CLIENT_SECRET,
    CITY_ID,
    UNITS,
    SELECTED_CALENDARS,
];

/// Parsed file contents: section -> key -> raw string value.
///
/// Section and key names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSections {
    sections: HashMap<String, HashMap<String, String>>,
}

impl IniSections {
    /// Parse INI text. Malformed syntax fails the whole parse.
    ///
    /// Values are taken verbatim: quotes and backslashes are not interpreted,
    /// matching what `write_sections` emits.
    pub fn parse(text: &str) -> InkCalResult<Self> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let parsed =
            Ini::load_from_str_opt(text, options).map_err(|e| InkCalError::Parse(e.to_string()))?;

        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        for (name, properties) in parsed.iter() {
            // Keys outside any section are ignored.
            let Some(name) = name else {
                continue;
            };

            let entries = sections.entry(name.to_lowercase()).or_default();
            for (key, value) in properties.iter() {
                entries.insert(key.to_lowercase(), value.to_string());
            }
        }

        Ok(IniSections { sections })
    }

    /// Build from an in-memory mapping, e.g. one assembled by a caller.
    pub fn from_map(map: HashMap<String, HashMap<String, String>>) -> Self {
        let sections = map
            .into_iter()
            .map(|(section, entries)| {
                let entries = entries
                    .into_iter()
                    .map(|(key, value)| (key.to_lowercase(), value))
                    .collect();
                (section.to_lowercase(), entries)
            })
            .collect();

        IniSections { sections }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section.to_lowercase())?
            .get(&key.to_lowercase())
            .map(String::as_str)
    }

    pub(crate) fn get_or_default(&self, field: &Field) -> &str {
        self.get(field.section, field.key).unwrap_or(field.default)
    }
}

/// Write `(field, value)` pairs grouped into sections, in the given order.
pub(crate) fn write_sections<W: Write>(out: &mut W, entries: &[(Field, String)]) -> std::io::Result<()> {
    let mut current: Option<&str> = None;

    for (field, value) in entries {
        if current != Some(field.section) {
            if current.is_some() {
                writeln!(out)?;
            }
            writeln!(out, "[{}]", field.section)?;
            current = Some(field.section);
        }
        writeln!(out, "{}={}", field.key, value)?;
    }

    Ok(())
}
