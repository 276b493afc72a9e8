use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dataspace_core::{
    App, FetchOutcome, Lifecycle, PersonView, Settings, WeatherView, client_from_settings,
    location,
};
use inquire::Text;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "dataspace", version, about = "Dataspace data product demo")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively edit the backend URL, link targets and session cookie.
    Configure,

    /// List the named locations.
    Cities,

    /// Fetch the current weather through the signed data product path.
    Weather(WeatherForm),

    /// Show the logged-in user and their profile.
    Person,

    /// Render the whole demo: weather form and authentication panel.
    Show {
        /// Also submit the weather form.
        #[arg(long)]
        fetch_weather: bool,

        #[command(flatten)]
        form: WeatherForm,
    },
}

/// Weather form input. Coordinates override the selected city's pair axis
/// by axis.
#[derive(Debug, Args)]
pub struct WeatherForm {
    /// Named location, e.g. "Tokyo" or "New York".
    #[arg(long)]
    city: Option<String>,

    /// Latitude override.
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,

    /// Longitude override.
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,
}

impl WeatherForm {
    fn apply(&self, view: &mut WeatherView) -> anyhow::Result<()> {
        if let Some(city) = &self.city {
            view.select_city(city)?;
        }
        if let Some(lat) = &self.lat {
            view.set_latitude(lat)?;
        }
        if let Some(lon) = &self.lon {
            view.set_longitude(lon)?;
        }
        Ok(())
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Cities => {
                for loc in location::all() {
                    println!("{:<10} {:>9} {:>9}", loc.name, loc.coordinates.lat, loc.coordinates.lon);
                }
                Ok(())
            }
            Command::Weather(form) => {
                let settings = Settings::load()?;
                let api = client_from_settings(&settings)?;

                let mut view = WeatherView::new();
                form.apply(&mut view)?;
                cancel_on_ctrl_c(view.lifecycle());

                if view.fetch(api.as_ref()).await? == FetchOutcome::Cancelled {
                    eprintln!("Cancelled.");
                    return Ok(());
                }
                println!("{}", view.render(&settings));
                Ok(())
            }
            Command::Person => {
                let settings = Settings::load()?;
                let api = client_from_settings(&settings)?;

                let mut view = PersonView::new();
                cancel_on_ctrl_c(view.lifecycle());

                if view.load(api.as_ref()).await? == FetchOutcome::Cancelled {
                    eprintln!("Cancelled.");
                    return Ok(());
                }
                println!("{}", view.render(&settings));
                Ok(())
            }
            Command::Show { fetch_weather, form } => {
                let settings = Settings::load()?;
                let api = client_from_settings(&settings)?;

                let mut app = App::new();
                form.apply(&mut app.weather)?;
                cancel_on_ctrl_c(app.lifecycle());

                let mut outcome = app.mount(api.as_ref()).await?;
                if fetch_weather && outcome == FetchOutcome::Completed {
                    outcome = app.weather.fetch(api.as_ref()).await?;
                }
                if outcome == FetchOutcome::Cancelled {
                    eprintln!("Cancelled.");
                    return Ok(());
                }
                println!("{}", app.render(&settings));
                Ok(())
            }
        }
    }
}

/// Tears the views down on Ctrl-C so pending requests are dropped.
fn cancel_on_ctrl_c(lifecycle: Lifecycle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling pending requests");
            lifecycle.teardown();
        }
    });
}

fn configure() -> anyhow::Result<()> {
    let path = Settings::config_file_path()?;
    // Start from the file only, so environment overrides are not persisted.
    let mut settings = Settings::load_from(&path)?;

    settings.api_base_url = prompt("Backend base URL:", &settings.api_base_url)?;
    settings.data_definition_viewer_url =
        prompt("Data definition viewer URL:", &settings.data_definition_viewer_url)?;
    settings.sandbox_dataspace_url =
        prompt("Sandbox dataspace URL:", &settings.sandbox_dataspace_url)?;
    settings.http_sig_source =
        prompt("Source for signed requests:", &settings.http_sig_source)?;

    let cookie = Text::new("Session cookie (e.g. id_token=...):")
        .with_default(settings.session_cookie.as_deref().unwrap_or_default())
        .with_help_message("Leave empty when not logged in")
        .prompt()
        .context("Failed to read session cookie")?;
    settings.session_cookie = Some(cookie.trim().to_string()).filter(|c| !c.is_empty());

    let current_timeout = settings.request_timeout_secs.map(|s| s.to_string()).unwrap_or_default();
    let timeout = Text::new("Request timeout in seconds:")
        .with_default(&current_timeout)
        .with_help_message("Leave empty to wait indefinitely")
        .prompt()
        .context("Failed to read request timeout")?;
    settings.request_timeout_secs = match timeout.trim() {
        "" => None,
        secs => Some(
            secs.parse()
                .with_context(|| format!("Invalid timeout '{secs}': expected whole seconds"))?,
        ),
    };

    settings.save_to(&path)?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn prompt(message: &str, current: &str) -> anyhow::Result<String> {
    let value = Text::new(message)
        .with_default(current)
        .prompt()
        .with_context(|| format!("Failed to read '{message}'"))?;
    Ok(value.trim().to_string())
}
