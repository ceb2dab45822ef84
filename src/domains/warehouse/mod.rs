pub mod catalog;
pub mod location;
pub mod observation;

pub use catalog::*;
pub use location::*;
pub use observation::*;
