//! Stateless renderers. Each one is a pure function of its arguments and
//! returns plain text for a terminal.

use crate::{
    Settings, WeatherReading,
    format::{format_humidity, format_rain, format_temp, format_wind},
};

/// Wraps `body` under a `"{title} demo"` header, indenting every body line.
pub fn titled_box(title: &str, body: &str) -> String {
    let mut out = format!("== {title} demo ==\n");
    for line in body.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

pub fn weather_readout(weather: &WeatherReading) -> String {
    format!(
        "Temp: {}\n{}\nHumidity: {}\nWind: {}\n",
        format_temp(weather.temp),
        format_rain(weather.rain),
        format_humidity(weather.humidity),
        format_wind(weather.wind_speed),
    )
}

/// Link to the definition viewer for `definition`, and to the sandbox
/// dataspace it is published on.
pub fn data_product_link(settings: &Settings, definition: &str, source: &str) -> String {
    let viewer = settings.data_definition_viewer_url.trim_end_matches('/');
    format!(
        "{definition} <{viewer}/definitions/{definition}> data product published under \
         {source} source on IOXIO Sandbox <{}> dataspace.",
        settings.sandbox_dataspace_url,
    )
}

pub fn login_prompt(login_url: &str) -> String {
    format!(
        "Some data sources require user to be authenticated before requesting the data.\n\
         \n\
         Authenticate yourself via Login Portal to see protected data. It doesn't\n\
         require registration and it was implemented only for demo purposes.\n\
         \n\
         Login: {login_url}\n"
    )
}
