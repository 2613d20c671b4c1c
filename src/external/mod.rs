pub mod gemini;
pub mod geolocation;
pub mod nominatim;
