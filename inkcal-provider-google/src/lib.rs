//! Google Calendar implementation of `CalendarLister`.
//!
//! The wizard is synchronous, so the lister owns a small current-thread
//! runtime and blocks on the API call.

use google_calendar::Client;
use google_calendar::types::MinAccessRole;
use inkcal_core::{CalendarLister, GoogleCredentials, InkCalError, InkCalResult, ListedCalendar};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

pub struct GoogleCalendarLister {
    runtime: Runtime,
}

impl GoogleCalendarLister {
    pub fn new() -> InkCalResult<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(GoogleCalendarLister { runtime })
    }
}

impl CalendarLister for GoogleCalendarLister {
    fn list_calendars(&self, credentials: &GoogleCredentials) -> InkCalResult<Vec<ListedCalendar>> {
        if credentials.access_token.is_empty() && credentials.refresh_token.is_empty() {
            return Err(InkCalError::Auth(
                "Neither an access token nor a refresh token was provided".to_string(),
            ));
        }

        info!(event = "provider.google.list_calendars_started");

        let client = Client::new(
            credentials.client_id.clone(),
            credentials.client_secret.clone(),
            String::new(),
            credentials.access_token.clone(),
            credentials.refresh_token.clone(),
        );

        let google_calendars = self
            .runtime
            .block_on(async {
                client
                    .calendar_list()
                    .list_all(MinAccessRole::default(), false, false)
                    .await
            })
            .map_err(|e| {
                let err = classify_error(&e.to_string());
                warn!(event = "provider.google.list_calendars_failed", error = %err);
                err
            })?
            .body;

        let calendars: Vec<ListedCalendar> = google_calendars
            .into_iter()
            .map(|cal| ListedCalendar::new(cal.id, cal.summary))
            .collect();

        debug!(
            event = "provider.google.list_calendars_completed",
            count = calendars.len()
        );
        Ok(calendars)
    }
}

/// Split API failures into rejected credentials and everything else.
fn classify_error(message: &str) -> InkCalError {
    let lowered = message.to_lowercase();
    let is_auth = ["401", "403", "unauthorized", "invalid_grant", "invalid_client"]
        .iter()
        .any(|marker| lowered.contains(marker));

    if is_auth {
        InkCalError::Auth(message.to_string())
    } else {
        InkCalError::Network(message.to_string())
    }
}
