//! Stateful views: each owns its state, calls the API and renders through
//! the stateless components.

pub mod person;
pub mod weather;

pub use person::{PersonState, PersonView};
pub use weather::{WeatherState, WeatherView};

/// How an async container operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Every response was applied to the view state.
    Completed,
    /// The view was torn down first; the pending request was dropped.
    Cancelled,
}
