//! Value Objects - Immutable, identity-less domain primitives

mod catch_date;
mod geo_location;
mod noon_weather;
mod weather_key;

pub use catch_date::{date_from_parts, month_number, parse_date};
pub use geo_location::{GeoLocation, closest_location};
pub use noon_weather::{HourlySample, NOON_HOUR_INDEX, NOON_WEATHER_COLUMNS, NoonWeather};
pub use weather_key::WeatherKey;
