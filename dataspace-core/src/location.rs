use crate::model::Coordinates;

/// A named entry of the city picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub name: &'static str,
    pub coordinates: Coordinates,
}

pub const DEFAULT_CITY: &str = "Helsinki";

const LOCATIONS: &[Location] = &[
    Location { name: "Helsinki", coordinates: Coordinates::new(60.1699, 24.9384) },
    Location { name: "Tokyo", coordinates: Coordinates::new(35.6762, 139.6503) },
    Location { name: "Lisbon", coordinates: Coordinates::new(38.7223, -9.1393) },
    Location { name: "New York", coordinates: Coordinates::new(40.7128, -74.006) },
];

/// All named locations, in picker order.
pub const fn all() -> &'static [Location] {
    LOCATIONS
}

/// Case-insensitive lookup by city name.
pub fn find(name: &str) -> Option<&'static Location> {
    let name = name.trim();
    LOCATIONS.iter().find(|loc| loc.name.eq_ignore_ascii_case(name))
}

pub fn default_location() -> &'static Location {
    &LOCATIONS[0]
}
