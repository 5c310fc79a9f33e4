pub mod gauge;

pub use gauge::{confidence_gauge, ph_gauge};
