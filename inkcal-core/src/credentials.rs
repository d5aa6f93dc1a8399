//! OAuth credential projection used to talk to Google.

use serde::Serialize;

/// Token refresh endpoint. Not configurable.
pub const GOOGLE_TOKEN_URI: &str = "https://accounts.google.com/o/oauth2/token";

/// Everything a Google client needs to authorize (and later refresh) a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleCredentials {
    pub access_token: String,
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub token_uri: String,
}

impl GoogleCredentials {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        GoogleCredentials {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_uri: GOOGLE_TOKEN_URI.to_string(),
        }
    }
}
