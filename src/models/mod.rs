pub mod advice;
pub mod conditions;
pub mod crop;
pub mod disease;
pub mod fertilizer;
pub mod record;
pub mod soil;
pub mod weather;

pub use advice::*;
pub use conditions::*;
pub use crop::*;
pub use disease::*;
pub use fertilizer::*;
pub use record::*;
pub use soil::*;
pub use weather::*;
