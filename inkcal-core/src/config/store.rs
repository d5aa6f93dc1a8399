use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use super::ini::{self, Field, IniSections};
use crate::credentials::GoogleCredentials;
use crate::error::{InkCalError, InkCalResult};
use crate::units::Units;

/// All settings the display needs, as read from or written to the config file.
///
/// Every string field defaults to empty so that saving always writes every key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    owm_token: String,
    google_token: String,
    google_refresh_token: String,
    google_client_id: String,
    google_client_secret: String,
    units: String,
    city_id: i64,
    selected_calendars: Vec<String>,
    debug_save_path: String,
}

impl Default for ConfigStore {
    fn default() -> Self {
        ConfigStore {
            owm_token: ini::OWM.default.to_string(),
            google_token: ini::GOOGLE_TOKEN.default.to_string(),
            google_refresh_token: ini::GOOGLE_REFRESH_TOKEN.default.to_string(),
            google_client_id: ini::GOOGLE_CLIENT_ID.default.to_string(),
            google_client_secret: ini::GOOGLE_CLIENT_SECRET.default.to_string(),
            units: ini::UNITS.default.to_string(),
            city_id: 0,
            selected_calendars: Vec::new(),
            debug_save_path: String::new(),
        }
    }
}

impl ConfigStore {
    /// A store with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate from parsed sections, falling back to defaults for anything absent.
    ///
    /// Only a `City_Id` that is present but not an integer is an error.
    pub fn from_sections(sections: &IniSections) -> InkCalResult<Self> {
        let get = |field: &Field| sections.get_or_default(field).to_string();

        let raw_city_id = sections.get_or_default(&ini::CITY_ID).trim();
        let city_id = raw_city_id.parse::<i64>().map_err(|_| {
            InkCalError::Parse(format!("City_Id must be an integer, got '{raw_city_id}'"))
        })?;

        let selected_calendars = sections
            .get_or_default(&ini::SELECTED_CALENDARS)
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect();

        Ok(ConfigStore {
            owm_token: get(&ini::OWM),
            google_token: get(&ini::GOOGLE_TOKEN),
            google_refresh_token: get(&ini::GOOGLE_REFRESH_TOKEN),
            google_client_id: get(&ini::GOOGLE_CLIENT_ID),
            google_client_secret: get(&ini::GOOGLE_CLIENT_SECRET),
            units: get(&ini::UNITS),
            city_id,
            selected_calendars,
            debug_save_path: String::new(),
        })
    }

    /// Parse config file text.
    pub fn parse(text: &str) -> InkCalResult<Self> {
        Self::from_sections(&IniSections::parse(text)?)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> InkCalResult<Self> {
        info!(event = "core.config.load_started", path = %path.display());

        let text = std::fs::read_to_string(path)?;
        let store = Self::parse(&text)?;

        info!(
            event = "core.config.load_completed",
            path = %path.display(),
            calendars = store.selected_calendars.len()
        );
        Ok(store)
    }

    /// Write every field to `path`, replacing any existing file.
    ///
    /// Values are written verbatim. A calendar id containing `,` will not
    /// survive a reload, and empty calendar ids are dropped on reload.
    pub fn save(&self, path: &Path) -> InkCalResult<()> {
        info!(event = "core.config.save_started", path = %path.display());

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        ini::write_sections(&mut writer, &self.entries())?;
        writer.flush()?;

        // Owner-only (0600): the file contains OAuth secrets.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        info!(event = "core.config.save_completed", path = %path.display());
        Ok(())
    }

    fn entries(&self) -> Vec<(Field, String)> {
        // Same order as `ini::FIELDS`.
        let values = [
            self.owm_token.clone(),
            self.google_token.clone(),
            self.google_refresh_token.clone(),
            self.google_client_id.clone(),
            self.google_client_secret.clone(),
            self.city_id.to_string(),
            self.units.clone(),
            self.selected_calendars.join(","),
        ];

        ini::FIELDS.into_iter().zip(values).collect()
    }

    pub fn owm_token(&self) -> &str {
        &self.owm_token
    }

    pub fn set_owm_token(&mut self, token: impl Into<String>) {
        self.owm_token = token.into();
    }

    pub fn google_token(&self) -> &str {
        &self.google_token
    }

    pub fn set_google_token(&mut self, token: impl Into<String>) {
        self.google_token = token.into();
    }

    pub fn google_refresh_token(&self) -> &str {
        &self.google_refresh_token
    }

    pub fn set_google_refresh_token(&mut self, token: impl Into<String>) {
        self.google_refresh_token = token.into();
    }

    pub fn google_client_id(&self) -> &str {
        &self.google_client_id
    }

    pub fn set_google_client_id(&mut self, client_id: impl Into<String>) {
        self.google_client_id = client_id.into();
    }

    pub fn google_client_secret(&self) -> &str {
        &self.google_client_secret
    }

    pub fn set_google_client_secret(&mut self, client_secret: impl Into<String>) {
        self.google_client_secret = client_secret.into();
    }

    /// Raw units string. Not validated here; see `parsed_units`.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// The units, if they are one of the accepted literals.
    pub fn parsed_units(&self) -> Option<Units> {
        self.units.parse().ok()
    }

    pub fn set_units(&mut self, units: impl Into<String>) {
        self.units = units.into();
    }

    pub fn city_id(&self) -> i64 {
        self.city_id
    }

    pub fn set_city_id(&mut self, city_id: i64) {
        self.city_id = city_id;
    }

    pub fn selected_calendars(&self) -> &[String] {
        &self.selected_calendars
    }

    /// Append a calendar id. Duplicates are kept.
    pub fn add_selected_calendar(&mut self, calendar_id: impl Into<String>) {
        let calendar_id = calendar_id.into();
        debug!(event = "core.config.calendar_added", calendar_id = %calendar_id);
        self.selected_calendars.push(calendar_id);
    }

    pub fn debug_save_path(&self) -> &str {
        &self.debug_save_path
    }

    pub fn set_debug_save_path(&mut self, path: impl Into<String>) {
        self.debug_save_path = path.into();
    }

    pub fn is_debug(&self) -> bool {
        !self.debug_save_path.is_empty()
    }

    /// Credentials assembled from the current Google fields.
    pub fn google_credentials(&self) -> GoogleCredentials {
        GoogleCredentials::new(
            self.google_token.clone(),
            self.google_refresh_token.clone(),
            self.google_client_id.clone(),
            self.google_client_secret.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::GOOGLE_TOKEN_URI;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn populated_store() -> ConfigStore {
        let mut store = ConfigStore::new();
        store.set_owm_token("owm-123");
        store.set_google_token("ya29.access");
        store.set_google_refresh_token("1//refresh");
        store.set_google_client_id("client.apps.googleusercontent.com");
        store.set_google_client_secret("s3cret");
        store.set_units("fahrenheit");
        store.set_city_id(5128581);
        store.add_selected_calendar("primary");
        store.add_selected_calendar("team@group.calendar.google.com");
        store
    }

    #[test]
    fn fresh_store_has_defaults() {
        let store = ConfigStore::new();
        assert_eq!(store.units(), "celsius");
        assert_eq!(store.city_id(), 0);
        assert_eq!(store.owm_token(), "");
        assert_eq!(store.google_token(), "");
        assert_eq!(store.google_refresh_token(), "");
        assert_eq!(store.google_client_id(), "");
        assert_eq!(store.google_client_secret(), "");
        assert!(store.selected_calendars().is_empty());
        assert!(!store.is_debug());
    }

    #[test]
    fn empty_text_matches_fresh_store() {
        assert_eq!(ConfigStore::parse("").unwrap(), ConfigStore::new());
    }

    #[test]
    fn missing_api_keys_section_uses_defaults() {
        let store =
            ConfigStore::parse("[CONFIG]\nCity_Id=2643743\nUnits=fahrenheit\nSelected_Calendars=a,b\n")
                .unwrap();

        assert_eq!(store.owm_token(), "");
        assert_eq!(store.google_token(), "");
        assert_eq!(store.google_client_secret(), "");
        assert_eq!(store.city_id(), 2643743);
        assert_eq!(store.units(), "fahrenheit");
        assert_eq!(store.selected_calendars(), ["a", "b"]);
    }

    #[test]
    fn unknown_sections_and_keys_are_ignored() {
        let store = ConfigStore::parse(
            "[API_KEYS]\nOWM=abc\nSomething_Else=1\n\n[EXTRA]\nfoo=bar\n",
        )
        .unwrap();
        assert_eq!(store.owm_token(), "abc");
        assert_eq!(store.units(), "celsius");
    }

    #[test]
    fn selected_calendars_are_trimmed() {
        let store = ConfigStore::parse("[CONFIG]\nSelected_Calendars= a , b,c \n").unwrap();
        assert_eq!(store.selected_calendars(), ["a", "b", "c"]);
    }

    #[test]
    fn blank_selected_calendars_is_empty() {
        let store = ConfigStore::parse("[CONFIG]\nSelected_Calendars=\n").unwrap();
        assert!(store.selected_calendars().is_empty());
    }

    #[test]
    fn non_numeric_city_id_is_parse_error() {
        let result = ConfigStore::parse("[CONFIG]\nCity_Id=london\n");
        assert!(matches!(result, Err(InkCalError::Parse(_))));
    }

    #[test]
    fn from_sections_accepts_nested_map() {
        let mut api_keys = HashMap::new();
        api_keys.insert("Google_Token".to_string(), "tok".to_string());
        let mut map = HashMap::new();
        map.insert("API_KEYS".to_string(), api_keys);

        let store = ConfigStore::from_sections(&IniSections::from_map(map)).unwrap();
        assert_eq!(store.google_token(), "tok");
        assert_eq!(store.city_id(), 0);
    }

    #[test]
    fn save_writes_exact_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        populated_store().save(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "[API_KEYS]\n\
             OWM=owm-123\n\
             Google_Token=ya29.access\n\
             Google_Refresh_Token=1//refresh\n\
             Google_Client_Id=client.apps.googleusercontent.com\n\
             Google_Client_Secrete=s3cret\n\
             \n\
             [CONFIG]\n\
             City_Id=5128581\n\
             Units=fahrenheit\n\
             Selected_Calendars=primary,team@group.calendar.google.com\n"
        );
    }

    #[test]
    fn save_writes_every_key_for_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        ConfigStore::new().save(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("OWM=\n"));
        assert!(contents.contains("City_Id=0\n"));
        assert!(contents.contains("Units=celsius\n"));
        assert!(contents.ends_with("Selected_Calendars=\n"));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        let store = populated_store();

        store.save(&path).unwrap();
        let loaded = ConfigStore::load(&path).unwrap();

        assert_eq!(loaded, store);
    }

    #[test]
    fn save_then_load_keeps_backslashes_and_quotes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        let mut store = populated_store();
        store.set_owm_token(r"ab\tcd\\x");
        store.set_google_client_secret("\"quoted\"");
        store.set_google_refresh_token(r"C:\renders\out");
        store.add_selected_calendar("en.usa#holiday@group.v.calendar.google.com");

        store.save(&path).unwrap();
        let loaded = ConfigStore::load(&path).unwrap();

        assert_eq!(loaded.owm_token(), r"ab\tcd\\x");
        assert_eq!(loaded.google_client_secret(), "\"quoted\"");
        assert_eq!(loaded.google_refresh_token(), r"C:\renders\out");
        assert_eq!(loaded, store);
    }

    #[test]
    fn empty_calendar_id_is_dropped_on_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        let mut store = ConfigStore::new();
        store.add_selected_calendar("");

        store.save(&path).unwrap();
        assert!(ConfigStore::load(&path).unwrap().selected_calendars().is_empty());
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("config.ini");

        let result = ConfigStore::new().save(&path);
        assert!(matches!(result, Err(InkCalError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        ConfigStore::new().save(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = ConfigStore::load(&dir.path().join("nope.ini"));
        assert!(matches!(result, Err(InkCalError::Io(_))));
    }

    #[test]
    fn add_selected_calendar_keeps_order_and_duplicates() {
        let mut store = ConfigStore::new();
        store.add_selected_calendar("b");
        store.add_selected_calendar("a");
        store.add_selected_calendar("b");
        assert_eq!(store.selected_calendars(), ["b", "a", "b"]);
    }

    #[test]
    fn is_debug_follows_debug_save_path() {
        let mut store = ConfigStore::new();
        store.set_debug_save_path("/tmp/render");
        assert!(store.is_debug());
        store.set_debug_save_path("");
        assert!(!store.is_debug());
    }

    #[test]
    fn credentials_reflect_latest_values() {
        let mut store = populated_store();
        assert_eq!(store.google_credentials().access_token, "ya29.access");

        store.set_google_token("ya29.rotated");
        let creds = store.google_credentials();
        assert_eq!(creds.access_token, "ya29.rotated");
        assert_eq!(creds.refresh_token, "1//refresh");
        assert_eq!(creds.client_id, "client.apps.googleusercontent.com");
        assert_eq!(creds.client_secret, "s3cret");
        assert_eq!(creds.token_uri, GOOGLE_TOKEN_URI);
    }

    #[test]
    fn parsed_units_rejects_unknown_values() {
        let mut store = ConfigStore::new();
        assert_eq!(store.parsed_units(), Some(Units::Celsius));
        store.set_units("kelvin");
        assert_eq!(store.parsed_units(), None);
    }
}
