pub mod elevation;
pub mod error;
pub mod weather;

pub use elevation::{ElevationClient, DEFAULT_ELEVATION_ENDPOINT};
pub use error::{ElevationError, WeatherArchiveError};
pub use weather::{season_for, DailyWeather, WeatherArchive, DEFAULT_WEATHER_ENDPOINT};
