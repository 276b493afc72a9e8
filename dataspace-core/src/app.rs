use crate::{
    DataProductApi, Settings, ViewError,
    container::{FetchOutcome, PersonView, WeatherView},
    lifecycle::Lifecycle,
};

/// Root composition of the two independent views. They share nothing but
/// the lifecycle, so tearing down the app tears down both.
#[derive(Debug)]
pub struct App {
    pub weather: WeatherView,
    pub person: PersonView,
    lifecycle: Lifecycle,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        let lifecycle = Lifecycle::new();
        Self {
            weather: WeatherView::with_lifecycle(lifecycle.clone()),
            person: PersonView::with_lifecycle(lifecycle.clone()),
            lifecycle,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    /// Runs the mount-time work: the session check and profile fetch. The
    /// weather view stays idle until it is submitted.
    pub async fn mount(&mut self, api: &dyn DataProductApi) -> Result<FetchOutcome, ViewError> {
        self.person.load(api).await
    }

    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }

    pub fn render(&self, settings: &Settings) -> String {
        format!("{}\n{}", self.weather.render(settings), self.person.render(settings))
    }
}
