//! The calendar listing seam.
//!
//! The wizard only needs an ordered list of `(id, name)` pairs to offer the
//! user. Where that list comes from is up to the implementor.

use crate::credentials::GoogleCredentials;
use crate::error::InkCalResult;

/// A calendar the user can subscribe the display to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedCalendar {
    pub id: String,
    pub name: String,
}

impl ListedCalendar {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        ListedCalendar {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Fetches the calendars visible to a set of credentials.
///
/// Implementations report rejected credentials as `InkCalError::Auth` and
/// transport failures as `InkCalError::Network`. Order of the returned list
/// is preserved all the way to the selection prompt.
pub trait CalendarLister {
    fn list_calendars(&self, credentials: &GoogleCredentials) -> InkCalResult<Vec<ListedCalendar>>;
}
