//! Core types for inkcal.
//!
//! This crate holds everything that does not touch the console:
//! - `ConfigStore` and its INI-style file format
//! - `GoogleCredentials`, the OAuth projection handed to calendar listers
//! - `CalendarLister`, the seam for fetching the user's calendars

pub mod calendar;
pub mod config;
pub mod credentials;
pub mod error;
pub mod units;

pub use calendar::{CalendarLister, ListedCalendar};
pub use config::ConfigStore;
pub use credentials::{GoogleCredentials, GOOGLE_TOKEN_URI};
pub use error::{InkCalError, InkCalResult};
pub use units::Units;
