//! Core library for the `dataspace` demo client.
//!
//! This crate defines:
//! - Runtime configuration (file + environment)
//! - The data product API client and its HTTP implementation
//! - Domain models and value formatting
//! - Stateless text components and the stateful weather/person views
//!
//! It is used by `dataspace-cli`, but the views can be driven by any frontend.

pub mod api;
pub mod app;
pub mod component;
pub mod config;
pub mod container;
pub mod error;
pub mod format;
pub mod lifecycle;
pub mod location;
pub mod model;

#[cfg(test)]
mod testing;

pub use api::{DataProductApi, client_from_settings};
pub use app::App;
pub use config::Settings;
pub use container::{FetchOutcome, PersonState, PersonView, WeatherState, WeatherView};
pub use error::{ApiError, ViewError};
pub use lifecycle::Lifecycle;
pub use model::{Coordinates, PersonDetails, UserSession, WeatherReading};
