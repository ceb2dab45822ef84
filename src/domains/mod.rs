pub mod logger;
pub mod scanner_agent;
pub mod warehouse;

pub use logger::*;
pub use scanner_agent::*;
pub use warehouse::*;
