pub mod advisory;
pub mod calculations;
pub mod disease;
pub mod ranking;
pub mod rules;
pub mod soil;
pub mod suitability;

pub use disease::Diagnoser;
pub use ranking::RankingOptions;
pub use rules::FertilizerPlanner;
