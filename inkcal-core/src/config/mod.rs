//! Persisted inkcal configuration.

mod ini;
mod store;

pub use ini::IniSections;
pub use store::ConfigStore;
