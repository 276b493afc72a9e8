use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    ApiError, DataProductApi, Settings, ViewError, WeatherReading,
    component::{data_product_link, titled_box, weather_readout},
    lifecycle::Lifecycle,
    location,
    model::{Coordinates, WEATHER_DEFINITION},
};

use super::FetchOutcome;

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherState {
    /// Nothing requested yet.
    Idle,
    Fetching,
    Loaded(WeatherReading),
    Failed(String),
}

/// City picker plus coordinate form, fetching the current weather over the
/// signature-protected path.
#[derive(Debug)]
pub struct WeatherView {
    city: String,
    coordinates: Coordinates,
    state: WeatherState,
    lifecycle: Lifecycle,
}

impl Default for WeatherView {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherView {
    pub fn new() -> Self {
        Self::with_lifecycle(Lifecycle::new())
    }

    pub fn with_lifecycle(lifecycle: Lifecycle) -> Self {
        let default = location::default_location();
        Self {
            city: default.name.to_string(),
            coordinates: default.coordinates,
            state: WeatherState::Idle,
            lifecycle,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }

    /// Resets both coordinates to the named city's pair.
    pub fn select_city(&mut self, name: &str) -> Result<(), ViewError> {
        let loc = location::find(name).ok_or_else(|| ViewError::UnknownCity(name.to_string()))?;
        debug!(city = loc.name, "city selected");
        self.city = loc.name.to_string();
        self.coordinates = loc.coordinates;
        Ok(())
    }

    /// Overrides the latitude only. The selected city label is kept.
    pub fn set_latitude(&mut self, input: &str) -> Result<(), ViewError> {
        self.coordinates.lat = parse_axis("latitude", input)?;
        Ok(())
    }

    /// Overrides the longitude only. The selected city label is kept.
    pub fn set_longitude(&mut self, input: &str) -> Result<(), ViewError> {
        self.coordinates.lon = parse_axis("longitude", input)?;
        Ok(())
    }

    /// Submits the form: moves to `Fetching` and returns the request body.
    /// Only one request may be in flight at a time.
    pub fn begin_fetch(&mut self) -> Result<Value, ViewError> {
        if self.lifecycle.is_torn_down() {
            return Err(ViewError::Unmounted);
        }
        if self.state == WeatherState::Fetching {
            return Err(ViewError::AlreadyFetching);
        }

        let params = serde_json::json!({
            "lat": self.coordinates.lat,
            "lon": self.coordinates.lon,
        });
        self.state = WeatherState::Fetching;
        Ok(params)
    }

    /// Applies the response of the request started by `begin_fetch`. Ignored
    /// when no request is in flight or the view has been torn down.
    pub fn finish_fetch(&mut self, result: Result<Value, ApiError>) {
        if self.lifecycle.is_torn_down() || self.state != WeatherState::Fetching {
            debug!("dropping stale weather response");
            return;
        }

        let reading = result
            .and_then(|body| serde_json::from_value::<WeatherReading>(body).map_err(ApiError::from));
        self.state = match reading {
            Ok(reading) => {
                info!(city = %self.city, temp = reading.temp, "weather loaded");
                WeatherState::Loaded(reading)
            }
            Err(err) => {
                warn!(city = %self.city, error = %err, "weather fetch failed");
                WeatherState::Failed(err.to_string())
            }
        };
    }

    /// Fetches the weather for the current coordinates. If the view is torn
    /// down while the request is in flight, the request is dropped and the
    /// state is left untouched.
    pub async fn fetch(&mut self, api: &dyn DataProductApi) -> Result<FetchOutcome, ViewError> {
        let params = self.begin_fetch()?;

        let result = self
            .lifecycle
            .run(api.fetch_data_product_with_http_sig(WEATHER_DEFINITION, &params))
            .await;

        match result {
            Some(result) => {
                self.finish_fetch(result);
                Ok(FetchOutcome::Completed)
            }
            None => {
                debug!("weather fetch cancelled by teardown");
                Ok(FetchOutcome::Cancelled)
            }
        }
    }

    pub fn render(&self, settings: &Settings) -> String {
        let mut body = format!(
            "Location: {}\nLatitude: {}\nLongitude: {}\n",
            self.city, self.coordinates.lat, self.coordinates.lon
        );
        body.push_str(match self.state {
            WeatherState::Fetching => "[Fetch] (disabled while loading)\n",
            _ => "[Fetch]\n",
        });
        body.push('\n');

        match &self.state {
            WeatherState::Idle => {}
            WeatherState::Fetching => body.push_str("Loading...\n\n"),
            WeatherState::Loaded(reading) => {
                body.push_str(&weather_readout(reading));
                body.push('\n');
            }
            WeatherState::Failed(message) => {
                body.push_str(&format!("Error: {message}\n\n"));
            }
        }

        body.push_str(
            "This request is signed using HTTP Message Signatures by an application key.\n\n",
        );
        body.push_str(&format!(
            "By clicking \"Fetch\", you will request data from {}\n",
            data_product_link(settings, WEATHER_DEFINITION, &settings.http_sig_source)
        ));

        titled_box("HTTP Message signatures", &body)
    }
}

fn parse_axis(axis: &'static str, input: &str) -> Result<f64, ViewError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ViewError::InvalidCoordinate { axis, input: input.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use serde_json::json;
    use std::time::Duration;

    fn helsinki_weather() -> Value {
        json!({ "temp": 21.25, "humidity": 54.6, "pressure": 1012, "rain": false, "windSpeed": 3.14, "windDirection": 90 })
    }

    #[test]
    fn starts_idle_at_default_city() {
        let view = WeatherView::new();
        assert_eq!(view.city(), "Helsinki");
        assert_eq!(view.coordinates(), Coordinates::new(60.1699, 24.9384));
        assert_eq!(view.state(), &WeatherState::Idle);
    }

    #[test]
    fn selecting_a_city_sets_its_exact_pair() {
        let mut view = WeatherView::new();
        view.set_latitude("1.5").unwrap();

        for loc in location::all() {
            view.select_city(loc.name).unwrap();
            assert_eq!(view.city(), loc.name);
            assert_eq!(view.coordinates(), loc.coordinates);
        }
    }

    #[test]
    fn unknown_city_changes_nothing() {
        let mut view = WeatherView::new();
        view.select_city("Tokyo").unwrap();

        let err = view.select_city("Atlantis").unwrap_err();
        assert_eq!(err, ViewError::UnknownCity("Atlantis".into()));
        assert_eq!(view.city(), "Tokyo");
        assert_eq!(view.coordinates(), Coordinates::new(35.6762, 139.6503));
    }

    #[test]
    fn editing_one_axis_leaves_the_other() {
        let mut view = WeatherView::new();

        for input in ["0", "-90", " 12.5 ", "1e2", "123456.789"] {
            let before = view.coordinates();
            view.set_latitude(input).unwrap();
            assert_eq!(view.coordinates().lon, before.lon);
            assert_eq!(view.coordinates().lat, input.trim().parse::<f64>().unwrap());

            let before = view.coordinates();
            view.set_longitude(input).unwrap();
            assert_eq!(view.coordinates().lat, before.lat);
            assert_eq!(view.coordinates().lon, input.trim().parse::<f64>().unwrap());
        }
        assert_eq!(view.city(), "Helsinki");
    }

    #[test]
    fn invalid_axis_input_is_rejected() {
        let mut view = WeatherView::new();
        let before = view.coordinates();

        for input in ["", "north", "NaN", "inf"] {
            let err = view.set_longitude(input).unwrap_err();
            assert!(matches!(err, ViewError::InvalidCoordinate { axis: "longitude", .. }));
        }
        assert_eq!(view.coordinates(), before);
    }

    #[test]
    fn loading_shows_only_between_submit_and_resolution() {
        let settings = Settings::default();
        let mut view = WeatherView::new();

        let idle = view.render(&settings);
        assert!(!idle.contains("Loading..."));
        assert!(!idle.contains("Temp:"));

        let params = view.begin_fetch().unwrap();
        assert_eq!(params, json!({ "lat": 60.1699, "lon": 24.9384 }));
        let fetching = view.render(&settings);
        assert!(fetching.contains("Loading..."));
        assert!(!fetching.contains("Temp:"));

        view.finish_fetch(Ok(helsinki_weather()));
        let loaded = view.render(&settings);
        assert!(!loaded.contains("Loading..."));
        assert!(loaded.contains("Temp: +21.3 °C"));
        assert!(loaded.contains("Humidity: 55%"));
        assert!(loaded.contains("Wind: 3.1 m/s"));
        assert!(loaded.contains("No rain"));

        // Refetching hides the previous reading until the new one arrives.
        view.begin_fetch().unwrap();
        let refetching = view.render(&settings);
        assert!(refetching.contains("Loading..."));
        assert!(!refetching.contains("Temp:"));
    }

    #[test]
    fn double_submit_is_rejected() {
        let mut view = WeatherView::new();
        view.begin_fetch().unwrap();
        assert_eq!(view.begin_fetch().unwrap_err(), ViewError::AlreadyFetching);
    }

    #[test]
    fn failure_is_shown_and_form_stays_usable() {
        let settings = Settings::default();
        let mut view = WeatherView::new();

        view.begin_fetch().unwrap();
        view.finish_fetch(Err(ApiError::RequestFailed { operation: "a data product" }));

        assert_eq!(view.state(), &WeatherState::Failed("Failed to fetch a data product".into()));
        let out = view.render(&settings);
        assert!(out.contains("Error: Failed to fetch a data product"));
        assert!(!out.contains("Loading..."));

        assert!(view.begin_fetch().is_ok());
    }

    #[test]
    fn malformed_reading_is_a_failure() {
        let mut view = WeatherView::new();
        view.begin_fetch().unwrap();
        view.finish_fetch(Ok(json!({ "temp": "warm" })));

        assert!(matches!(view.state(), WeatherState::Failed(msg) if msg.starts_with("Malformed response body")));
    }

    #[test]
    fn stale_response_is_ignored() {
        let mut view = WeatherView::new();
        view.finish_fetch(Ok(helsinki_weather()));
        assert_eq!(view.state(), &WeatherState::Idle);
    }

    #[test]
    fn render_links_weather_product_under_signature_source() {
        let settings = Settings { http_sig_source: "my_company".into(), ..Settings::default() };
        let out = WeatherView::new().render(&settings);

        assert!(out.starts_with("== HTTP Message signatures demo ==\n"));
        assert!(out.contains("Weather/Current/Metric_v1.0"));
        assert!(out.contains("under my_company source"));
    }

    #[tokio::test]
    async fn fetch_posts_current_coordinates() {
        let api = FakeApi { weather: Some(helsinki_weather()), ..FakeApi::default() };
        let mut view = WeatherView::new();
        view.select_city("Lisbon").unwrap();
        view.set_longitude("-9.5").unwrap();

        let outcome = view.fetch(&api).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Completed);
        assert_eq!(api.call_names(), vec!["weather"]);
        assert_eq!(api.last_params(), Some(json!({ "lat": 38.7223, "lon": -9.5 })));
        assert!(matches!(view.state(), WeatherState::Loaded(r) if r.temp == 21.25));
    }

    #[tokio::test]
    async fn fetch_failure_lands_in_failed_state() {
        let api = FakeApi::default();
        let mut view = WeatherView::new();

        assert_eq!(view.fetch(&api).await.unwrap(), FetchOutcome::Completed);
        assert!(matches!(view.state(), WeatherState::Failed(_)));
    }

    #[tokio::test]
    async fn teardown_cancels_in_flight_fetch() {
        let api = FakeApi { hang: true, ..FakeApi::default() };
        let mut view = WeatherView::new();
        let lifecycle = view.lifecycle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            lifecycle.teardown();
        });

        let outcome = view.fetch(&api).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Cancelled);

        view.finish_fetch(Ok(helsinki_weather()));
        assert_eq!(view.state(), &WeatherState::Fetching);
        assert_eq!(view.begin_fetch().unwrap_err(), ViewError::Unmounted);
    }
}
