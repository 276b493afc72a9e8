use serde::{Deserialize, Serialize};

/// Weather product served under the signature-protected path.
pub const WEATHER_DEFINITION: &str = "Weather/Current/Metric_v1.0";

/// Profile product served under the cookie-session path.
pub const PERSON_DEFINITION: &str = "draft/Person/Details";

/// A latitude/longitude pair. Serialises to the `{"lat", "lon"}` request body
/// expected by the weather product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    /// Degrees Celsius.
    pub temp: f64,
    /// Metres per second.
    pub wind_speed: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    pub rain: bool,
}

/// Response of the "who am I" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub logged_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}
