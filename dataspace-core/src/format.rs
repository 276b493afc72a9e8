//! Human-readable formatting of weather values.

/// Rounds to one decimal place, halves away from zero.
///
/// `format!("{:.1}")` alone rounds ties to even (`21.25` → `21.2`), which is
/// not what a reader expects from a temperature display.
fn one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

/// Temperature with an explicit `+` for positive values, e.g. `+21.3 °C`.
pub fn format_temp(t: f64) -> String {
    let sign = if t > 0.0 { "+" } else { "" };
    format!("{sign}{} °C", one_decimal(t))
}

pub fn format_wind(ws: f64) -> String {
    format!("{} m/s", one_decimal(ws))
}

/// Nearest whole percent; halves round up.
pub fn format_humidity(h: f64) -> String {
    format!("{}%", (h + 0.5).floor() as i64)
}

pub fn format_rain(rain: bool) -> &'static str {
    if rain { "Rain" } else { "No rain" }
}
