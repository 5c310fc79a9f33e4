pub mod classifier;
pub mod openweathermap;

pub use classifier::{HttpClassifier, ImageClassifier};
pub use openweathermap::OpenWeatherMapClient;
