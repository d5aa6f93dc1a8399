//! First-run configuration wizard.
//!
//! Loads an existing config file when one is given, otherwise walks the user
//! through every setting, fetches their calendars to choose from, and saves
//! the result.

use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

use inkcal_core::{CalendarLister, ConfigStore, InkCalError, InkCalResult, ListedCalendar, Units};
use tracing::{debug, info};

use crate::prompt::Prompter;

const TOKEN_VIDEO_URL: &str = "https://www.youtube.com/watch?v=hfWe1gPCnzc";

const SELECT_CALENDARS_PROMPT: &str =
    "Select one or more calendars by listing out their index. Separated by ','";
const INVALID_INDEX_PROMPT: &str = "Invalid index. Try again";
const UNITS_PROMPT: &str = "Now select the unit for temperature. Either \"fahrenheit\" or \"celsius\"";
const INVALID_UNITS_PROMPT: &str = "Invalid selection. Try again";

/// Outcome of one line entered at the calendar selection prompt.
#[derive(Debug, PartialEq, Eq)]
enum Selection {
    /// Every index was in range. Order and duplicates are as entered.
    Accepted(Vec<usize>),
    /// The first out-of-range index, as typed; the whole line is discarded.
    Rejected(String),
}

/// Load `config_path` if it exists, otherwise create a config interactively.
///
/// `debug_path`, when given, is applied to the result either way.
pub fn load_or_create<P: Prompter, L: CalendarLister>(
    config_path: Option<&Path>,
    debug_path: Option<&str>,
    prompter: &mut P,
    lister: &L,
) -> InkCalResult<ConfigStore> {
    let mut store = match config_path {
        Some(path) if path.is_file() => ConfigStore::load(path)?,
        Some(path) => {
            info!(
                event = "cli.wizard.config_missing",
                path = %path.display(),
                "Config file not found, starting interactive setup"
            );
            create(prompter, lister)?
        }
        None => create(prompter, lister)?,
    };

    if let Some(debug_path) = debug_path {
        store.set_debug_save_path(debug_path);
    }

    Ok(store)
}

/// Prompt for every setting, save the file, and return the populated store.
///
/// Nothing is written unless every step succeeds.
pub fn create<P: Prompter, L: CalendarLister>(
    prompter: &mut P,
    lister: &L,
) -> InkCalResult<ConfigStore> {
    info!(event = "cli.wizard.create_started");

    let mut store = ConfigStore::new();

    store.set_owm_token(prompter.ask("Paste in the Open Weather Map Token:")?);

    prompter.say(&format!(
        "To generate Google API tokens, see the video {}",
        TOKEN_VIDEO_URL
    ))?;
    store.set_google_token(prompter.ask_secret("Paste in the Access Token:")?);
    store.set_google_refresh_token(prompter.ask_secret("Paste in the Refresh Token:")?);
    store.set_google_client_id(prompter.ask("Paste in the Client ID:")?);
    store.set_google_client_secret(prompter.ask_secret("Paste in the Client Secret:")?);

    let credentials = store.google_credentials();
    let calendars =
        prompter.with_progress("Retrieving calendars ...", || lister.list_calendars(&credentials))?;

    if calendars.is_empty() {
        return Err(InkCalError::NoCalendars);
    }

    for (index, calendar) in calendars.iter().enumerate() {
        prompter.say(&format!("{}) {}", index, calendar.name))?;
    }

    for calendar_id in select_calendars(prompter, &calendars)? {
        store.add_selected_calendar(calendar_id);
    }

    let city_id = prompter.ask(
        "Paste in the city id for retrieving weather. \
         The city id could be found on Open Weather Map website:",
    )?;
    store.set_city_id(parse_city_id(&city_id)?);

    store.set_units(select_units(prompter)?.as_str());

    let saving_path = PathBuf::from(prompter.ask("Now provide a path for saving the config")?);
    store.save(&saving_path)?;

    let absolute_path = std::path::absolute(&saving_path)?;
    prompter.say(&format!(
        "Congratulations, configuration is done. The file has been saved to {path}. \
         Later runs should specify the arguments: -c {path}",
        path = absolute_path.display()
    ))?;

    info!(
        event = "cli.wizard.create_completed",
        path = %absolute_path.display(),
        calendars = store.selected_calendars().len()
    );
    Ok(store)
}

/// Keep asking until one full line of indices is valid, then return their ids.
fn select_calendars<P: Prompter>(
    prompter: &mut P,
    calendars: &[ListedCalendar],
) -> InkCalResult<Vec<String>> {
    let mut prompt = SELECT_CALENDARS_PROMPT;

    loop {
        let line = prompter.ask(prompt)?;

        match parse_selection(&line, calendars.len())? {
            Selection::Accepted(indices) => {
                return Ok(indices
                    .into_iter()
                    .map(|index| calendars[index].id.clone())
                    .collect());
            }
            Selection::Rejected(index) => {
                debug!(
                    event = "cli.wizard.selection_rejected",
                    index = %index,
                    available = calendars.len()
                );
                prompt = INVALID_INDEX_PROMPT;
            }
        }
    }
}

/// Parse a comma separated list of indices into `0..count`.
///
/// Tokens are checked left to right: the first out-of-range index rejects
/// the line before later tokens are parsed. A token that is not an integer
/// is an error rather than a rejection.
fn parse_selection(line: &str, count: usize) -> InkCalResult<Selection> {
    let mut indices = Vec::new();

    for token in line.split(',').map(str::trim) {
        let index = match token.parse::<i64>() {
            Ok(index) => index,
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                return Ok(Selection::Rejected(token.to_string()));
            }
            Err(_) => {
                return Err(InkCalError::InvalidInput(format!(
                    "'{}' is not a calendar index",
                    token
                )));
            }
        };

        match usize::try_from(index) {
            Ok(index) if index < count => indices.push(index),
            _ => return Ok(Selection::Rejected(token.to_string())),
        }
    }

    Ok(Selection::Accepted(indices))
}

fn parse_city_id(input: &str) -> InkCalResult<i64> {
    input
        .trim()
        .parse()
        .map_err(|_| InkCalError::InvalidInput(format!("City id must be an integer, got '{}'", input)))
}

/// Keep asking until the answer is exactly one of the accepted unit names.
fn select_units<P: Prompter>(prompter: &mut P) -> InkCalResult<Units> {
    let mut prompt = UNITS_PROMPT;

    loop {
        let answer = prompter.ask(prompt)?;

        match answer.parse::<Units>() {
            Ok(units) => return Ok(units),
            Err(reason) => {
                debug!(event = "cli.wizard.units_rejected", reason = %reason);
                prompt = INVALID_UNITS_PROMPT;
            }
        }
    }
}
