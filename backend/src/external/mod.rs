//! External API integrations

pub mod gemini;
pub mod nominatim;
pub mod open_meteo;
pub mod overpass;

pub use gemini::GeminiClient;
pub use nominatim::NominatimClient;
pub use open_meteo::{OpenMeteoApi, OpenMeteoClient};
pub use overpass::OverpassClient;
